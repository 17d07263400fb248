//! Root rotation of the whole scene.
//!
//! The scene spins at a constant idle rate, slower while scattered and a
//! little faster once assembled, plus whatever velocity the hand signal
//! currently supplies.  The velocity is applied as given.

use glam::Mat4;
use serde::{Deserialize, Serialize};

use crate::error::{finite, ConfigError};
use crate::state::MorphState;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneRotationConfig {
    /// Idle spin while scattered (radians per second).
    pub idle_scattered: f32,
    /// Idle spin while assembled.
    pub idle_assembled: f32,
}

impl Default for SceneRotationConfig {
    fn default() -> Self {
        SceneRotationConfig { idle_scattered: 0.05, idle_assembled: 0.1 }
    }
}

impl SceneRotationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        finite("idle_scattered", self.idle_scattered)?;
        finite("idle_assembled", self.idle_assembled)?;
        Ok(())
    }

    pub fn idle(&self, state: MorphState) -> f32 {
        match state {
            MorphState::Scattered => self.idle_scattered,
            MorphState::Assembled => self.idle_assembled,
        }
    }
}

/// Integrated rotation angle about the vertical axis.
#[derive(Clone, Debug, Default)]
pub struct SceneRotation {
    config: SceneRotationConfig,
    angle:  f32,
}

impl SceneRotation {
    pub fn new(config: SceneRotationConfig) -> Self {
        SceneRotation { config, angle: 0.0 }
    }

    /// Integrate one tick and return the increment applied.
    pub fn advance(&mut self, delta: f32, state: MorphState, velocity: f32) -> f32 {
        if !(delta > 0.0) || !delta.is_finite() || !velocity.is_finite() {
            return 0.0;
        }
        let increment = delta * (self.config.idle(state) + velocity);
        self.angle = (self.angle + increment).rem_euclid(std::f32::consts::TAU);
        increment
    }

    /// Current angle in `[0, 2π)`.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.angle)
    }
}
