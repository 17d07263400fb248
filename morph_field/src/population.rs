//! Population specs and the entity sets built from them.
//!
//! A population is created once at startup from a [`PopulationSpec`] and a
//! session-wide [`ShapeConfig`]; its entity count is fixed for the session.

use std::f32::consts::PI;

use glam::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::ShapeConfig;
use crate::distribution::{cone_position, random_sphere_position};
use crate::entity::{
    blend, AnimatedEntity, BLACK_OBSIDIAN, EMERALD_DEEP, EMERALD_LIGHT, GOLD_METALLIC,
    GREEN_CHRISTMAS, RED_BRIGHT, RED_VELVET, WHITE_SNOW,
};
use crate::error::{positive, ConfigError};
use crate::motion::MotionProfile;

// ════════════════════════════════════════════════════════════════════════════
// Placement and palette policies
// ════════════════════════════════════════════════════════════════════════════

/// Where an entity's assembled target lies.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Placement {
    /// Golden-angle spiral on the cone, radius scaled by `radius_scale`.
    Cone { radius_scale: f32 },
    /// Every entity sits `lift` above the cone apex.
    Apex { lift: f32 },
}

/// How entity colours (and accent scale boosts) are drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Palette {
    /// Emerald gradient with occasional gold tips.
    Foliage,
    /// Half red, the rest from the full festive set; red entities get the boost.
    Boxes,
    /// Gold-weighted mix of gold, reds and snow.
    Baubles,
    /// Solid gold.
    Gold,
}

/// How the renderer draws each entity of a population.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Glyph {
    /// Single pixel or small splat.
    Point,
    #[default]
    Square,
    Disc,
    Star,
}

const BOX_COLORS: [u32; 6] = [
    RED_VELVET, RED_BRIGHT, GREEN_CHRISTMAS, WHITE_SNOW, BLACK_OBSIDIAN, GOLD_METALLIC,
];
const BAUBLE_COLORS: [u32; 5] = [
    GOLD_METALLIC, GOLD_METALLIC, RED_BRIGHT, RED_VELVET, WHITE_SNOW,
];

impl Palette {
    /// Draw a colour; returns it with the scale multiplier it earns.
    fn draw<R: Rng + ?Sized>(self, seed: f32, accent_boost: f32, rng: &mut R) -> (u32, f32) {
        match self {
            Palette::Foliage => {
                let base = blend(EMERALD_DEEP, EMERALD_LIGHT, seed);
                if seed > 0.85 {
                    (blend(base, GOLD_METALLIC, 0.9), 1.0)
                } else {
                    (base, 1.0)
                }
            }
            Palette::Boxes => {
                if rng.random::<f32>() > 0.5 {
                    let red = if rng.random::<bool>() { RED_VELVET } else { RED_BRIGHT };
                    (red, accent_boost)
                } else {
                    (BOX_COLORS[rng.random_range(0..BOX_COLORS.len())], 1.0)
                }
            }
            Palette::Baubles => (BAUBLE_COLORS[rng.random_range(0..BAUBLE_COLORS.len())], 1.0),
            Palette::Gold    => (GOLD_METALLIC, 1.0),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// PopulationSpec
// ════════════════════════════════════════════════════════════════════════════

/// Static description of one population.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopulationSpec {
    pub name:          String,
    pub count:         usize,
    /// Exponential approach rate of the blend factor (per second).
    pub approach_rate: f32,
    pub placement:     Placement,
    /// Multiplier on [`ShapeConfig::scatter_radius`].
    #[serde(default = "one")]
    pub scatter_scale: f32,
    /// Base scale is drawn uniformly from `[min_scale, max_scale)`.
    pub min_scale:     f32,
    pub max_scale:     f32,
    pub palette:       Palette,
    #[serde(default)]
    pub glyph:         Glyph,
    /// Scale multiplier for accent-coloured entities.
    #[serde(default = "one")]
    pub accent_boost:  f32,
    /// Random static orientation in `[0, π)` about x and y.
    #[serde(default)]
    pub random_orientation: bool,
    #[serde(default)]
    pub motion:        MotionProfile,
}

fn one() -> f32 {
    1.0
}

impl PopulationSpec {
    /// Point-sprite needles: the densest, fastest-responding layer.
    pub fn foliage() -> Self {
        PopulationSpec {
            name:          "foliage".to_string(),
            count:         12_000,
            // Full morph in roughly 1.5 s.
            approach_rate: 1.0 / (1.5 / 3.0),
            placement:     Placement::Cone { radius_scale: 1.0 },
            scatter_scale: 1.0,
            min_scale:     0.5,
            max_scale:     1.3,
            palette:       Palette::Foliage,
            glyph:         Glyph::Point,
            accent_boost:  1.0,
            random_orientation: false,
            motion:        MotionProfile::foliage(),
        }
    }

    /// Heavy gift boxes; slowest layer.
    pub fn boxes() -> Self {
        PopulationSpec {
            name:          "boxes".to_string(),
            count:         200,
            approach_rate: 0.6,
            placement:     Placement::Cone { radius_scale: 1.0 },
            scatter_scale: 0.8,
            min_scale:     0.2,
            max_scale:     0.5,
            palette:       Palette::Boxes,
            glyph:         Glyph::Square,
            accent_boost:  1.5,
            random_orientation: true,
            motion:        MotionProfile::ornament(),
        }
    }

    /// Baubles hang slightly outside the foliage.
    pub fn baubles() -> Self {
        PopulationSpec {
            name:          "baubles".to_string(),
            count:         300,
            approach_rate: 0.8,
            placement:     Placement::Cone { radius_scale: 1.15 },
            scatter_scale: 0.8,
            min_scale:     0.2,
            max_scale:     0.5,
            palette:       Palette::Baubles,
            glyph:         Glyph::Disc,
            accent_boost:  1.0,
            random_orientation: true,
            motion:        MotionProfile::ornament(),
        }
    }

    pub fn star() -> Self {
        PopulationSpec {
            name:          "star".to_string(),
            count:         1,
            approach_rate: 1.0,
            placement:     Placement::Apex { lift: 0.8 },
            scatter_scale: 1.0,
            min_scale:     1.0,
            max_scale:     1.0,
            palette:       Palette::Gold,
            glyph:         Glyph::Star,
            accent_boost:  1.0,
            random_orientation: false,
            motion:        MotionProfile::star(),
        }
    }

    /// The four populations of the default scene, lightest first.
    pub fn defaults() -> Vec<PopulationSpec> {
        vec![Self::foliage(), Self::boxes(), Self::baubles(), Self::star()]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::EmptyPopulation(self.name.clone()));
        }
        positive("approach_rate", self.approach_rate)?;
        positive("scatter_scale", self.scatter_scale)?;
        positive("min_scale", self.min_scale)?;
        positive("max_scale", self.max_scale)?;
        positive("accent_boost", self.accent_boost)?;
        if self.max_scale < self.min_scale {
            return Err(ConfigError::NonPositive {
                field: "max_scale - min_scale",
                value: self.max_scale - self.min_scale,
            });
        }
        match self.placement {
            Placement::Cone { radius_scale } => {
                positive("placement.radius_scale", radius_scale)?;
            }
            Placement::Apex { lift } => {
                if !lift.is_finite() {
                    return Err(ConfigError::NonFinite { field: "placement.lift" });
                }
            }
        }
        self.motion.validate()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Population
// ════════════════════════════════════════════════════════════════════════════

/// A generated entity set plus the policy its animator runs.
#[derive(Clone, Debug)]
pub struct Population {
    pub name:          String,
    pub entities:      Vec<AnimatedEntity>,
    pub approach_rate: f32,
    pub motion:        MotionProfile,
    pub glyph:         Glyph,
}

impl Population {
    /// Validate `spec` and `shape`, then compute every entity's targets.
    pub fn generate<R: Rng + ?Sized>(
        spec:  &PopulationSpec,
        shape: &ShapeConfig,
        rng:   &mut R,
    ) -> Result<Self, ConfigError> {
        shape.validate()?;
        spec.validate()?;

        let scatter_radius = shape.scatter_radius * spec.scatter_scale;
        let entities = (0..spec.count)
            .map(|i| {
                let assembled = match spec.placement {
                    Placement::Cone { radius_scale } => cone_position(
                        i,
                        spec.count,
                        shape.height,
                        shape.base_radius * radius_scale,
                        shape.jitter,
                        rng,
                    ),
                    Placement::Apex { lift } => Vec3::new(0.0, shape.height / 2.0 + lift, 0.0),
                };
                let scatter = random_sphere_position(scatter_radius, rng);

                let seed = rng.random::<f32>();
                let span = spec.max_scale - spec.min_scale;
                let base_scale = spec.min_scale + rng.random::<f32>() * span;
                let (color, boost) = spec.palette.draw(seed, spec.accent_boost, rng);

                let rotation = if spec.random_orientation {
                    Vec3::new(rng.random::<f32>() * PI, rng.random::<f32>() * PI, 0.0)
                } else {
                    Vec3::ZERO
                };

                AnimatedEntity {
                    scatter,
                    assembled,
                    seed,
                    scale: base_scale * boost,
                    color,
                    rotation,
                }
            })
            .collect::<Vec<_>>();

        log::debug!(
            "generated population `{}`: {} entities, scatter radius {:.1}",
            spec.name,
            entities.len(),
            scatter_radius
        );

        Ok(Population {
            name:          spec.name.clone(),
            entities,
            approach_rate: spec.approach_rate,
            motion:        spec.motion.clone(),
            glyph:         spec.glyph,
        })
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
