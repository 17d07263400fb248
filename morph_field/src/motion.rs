//! Per-population motion policy.
//!
//! A [`MotionProfile`] bundles everything that differs between populations
//! once the blend factor is known: the ambient overlay on the scatter
//! endpoint (swirl and bob), the post-interpolation shimmer, the spin rule
//! and the scale rule.  Profiles are plain data so sessions can override
//! them from a config file.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{finite, ConfigError};

// ════════════════════════════════════════════════════════════════════════════
// Scatter-side overlays
// ════════════════════════════════════════════════════════════════════════════

/// Galaxy swirl: rotates the (x, z) projection about the vertical axis.
///
/// The angular offset grows with time and with planar distance from the
/// axis, so outer entities lead inner ones and the ball reads as a spiral.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Swirl {
    /// Radians per second added to every entity.
    pub orbit_speed: f32,
    /// Extra radians per unit of planar distance.
    pub twist:       f32,
}

impl Swirl {
    pub fn apply(&self, p: Vec3, time: f32) -> Vec3 {
        let dist  = (p.x * p.x + p.z * p.z).sqrt();
        let angle = p.z.atan2(p.x) + time * self.orbit_speed + dist * self.twist;
        Vec3::new(angle.cos() * dist, p.y, angle.sin() * dist)
    }
}

/// Where the phase of an entity's bob comes from.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum BobPhase {
    /// The entity's index in its population.
    Index,
    /// The (swirled) x coordinate times `scale`, giving a travelling wave.
    PositionX { scale: f32 },
}

/// Vertical sinusoidal bob.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bob {
    pub amplitude: f32,
    /// Angular frequency (radians per second).
    pub frequency: f32,
    pub phase:     BobPhase,
}

impl Bob {
    pub fn offset(&self, index: usize, p: Vec3, time: f32) -> f32 {
        let phase = match self.phase {
            BobPhase::Index               => index as f32,
            BobPhase::PositionX { scale } => p.x * scale,
        };
        (time * self.frequency + phase).sin() * self.amplitude
    }
}

/// Small high-frequency jitter added after interpolation while the field is
/// mostly scattered.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shimmer {
    pub amplitude: f32,
    /// Eased factor at and above which the shimmer switches off.
    pub cutoff:    f32,
}

impl Shimmer {
    pub fn offset(&self, seed: f32, time: f32, eased: f32) -> Vec3 {
        if eased >= self.cutoff {
            return Vec3::ZERO;
        }
        let phase = seed * 10.0;
        Vec3::new(
            (time * 5.0 + phase).sin() * self.amplitude,
            (time * 3.0 + phase).cos() * self.amplitude,
            0.0,
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Rotation and scale rules
// ════════════════════════════════════════════════════════════════════════════

/// Per-axis spin rates (radians per second).
///
/// `idle` always applies; `scattered` is weighted by `1 - eased`, so entities
/// tumble harder while scattered and settle as they assemble.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Spin {
    pub idle:      Vec3,
    pub scattered: Vec3,
}

impl Spin {
    pub fn rotation(&self, offset: Vec3, time: f32, eased: f32) -> Vec3 {
        offset + self.idle * time + self.scattered * (time * (1.0 - eased))
    }
}

/// Scale multipliers at the two endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleRule {
    pub scattered: f32,
    pub assembled: f32,
}

impl Default for ScaleRule {
    fn default() -> Self {
        ScaleRule { scattered: 1.0, assembled: 1.0 }
    }
}

impl ScaleRule {
    pub fn factor(&self, eased: f32) -> f32 {
        self.scattered + (self.assembled - self.scattered) * eased
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MotionProfile
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionProfile {
    pub swirl:   Option<Swirl>,
    pub bob:     Option<Bob>,
    pub shimmer: Option<Shimmer>,
    pub spin:    Spin,
    pub scale:   ScaleRule,
}

impl MotionProfile {
    /// No overlay, no spin, constant scale.
    pub fn still() -> Self {
        MotionProfile::default()
    }

    pub fn foliage() -> Self {
        MotionProfile {
            swirl:   Some(Swirl { orbit_speed: 0.1, twist: 0.05 }),
            bob:     Some(Bob {
                amplitude: 2.0,
                frequency: 0.5,
                phase:     BobPhase::PositionX { scale: 0.2 },
            }),
            shimmer: Some(Shimmer { amplitude: 0.05, cutoff: 0.9 }),
            ..MotionProfile::default()
        }
    }

    pub fn ornament() -> Self {
        MotionProfile {
            swirl: Some(Swirl { orbit_speed: 0.1, twist: 0.1 }),
            bob:   Some(Bob { amplitude: 1.0, frequency: 0.5, phase: BobPhase::Index }),
            spin:  Spin {
                idle:      Vec3::new(0.2, 0.2, 0.0),
                scattered: Vec3::new(0.3, 0.1, 0.0),
            },
            ..MotionProfile::default()
        }
    }

    pub fn star() -> Self {
        MotionProfile {
            spin:  Spin { idle: Vec3::new(0.0, 0.8, 0.0), scattered: Vec3::ZERO },
            scale: ScaleRule { scattered: 0.5, assembled: 1.2 },
            ..MotionProfile::default()
        }
    }

    /// The scatter endpoint for this tick: swirl first, then bob.
    pub fn scatter_pose(&self, index: usize, scatter: Vec3, time: f32) -> Vec3 {
        let mut p = match &self.swirl {
            Some(swirl) => swirl.apply(scatter, time),
            None        => scatter,
        };
        if let Some(bob) = &self.bob {
            p.y += bob.offset(index, p, time);
        }
        p
    }

    pub fn shimmer_offset(&self, seed: f32, time: f32, eased: f32) -> Vec3 {
        self.shimmer
            .map(|s| s.offset(seed, time, eased))
            .unwrap_or(Vec3::ZERO)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(s) = &self.swirl {
            finite("swirl.orbit_speed", s.orbit_speed)?;
            finite("swirl.twist", s.twist)?;
        }
        if let Some(b) = &self.bob {
            finite("bob.amplitude", b.amplitude)?;
            finite("bob.frequency", b.frequency)?;
        }
        if let Some(s) = &self.shimmer {
            finite("shimmer.amplitude", s.amplitude)?;
        }
        if !self.spin.idle.is_finite() || !self.spin.scattered.is_finite() {
            return Err(ConfigError::NonFinite { field: "spin" });
        }
        finite("scale.scattered", self.scale.scattered)?;
        finite("scale.assembled", self.scale.assembled)?;
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
