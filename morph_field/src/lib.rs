//! # morph_field
//!
//! Procedural dual-state fields of particles and instances.  Every entity
//! owns two fixed targets, a volumetric **scatter** position and an
//! **assembled** position on a cone, and each population eases between
//! them at its own rate, driven by a single authoritative [`MorphState`].
//!
//! ## Quick start
//!
//! ```rust
//! use morph_field::{MorphAnimator, MorphController, MorphState, Population, PopulationSpec, ShapeConfig};
//! use rand_chacha::ChaCha8Rng;
//! use rand_chacha::rand_core::SeedableRng;
//!
//! let mut rng = ChaCha8Rng::seed_from_u64(7);
//! let shape = ShapeConfig::default();
//! let boxes = Population::generate(&PopulationSpec::boxes(), &shape, &mut rng).unwrap();
//! let mut animator = MorphAnimator::for_population(&boxes);
//!
//! let mut controller = MorphController::default();
//! controller.toggle();
//! assert_eq!(controller.current(), MorphState::Assembled);
//!
//! animator.advance(1.0 / 60.0, controller.current());
//! let matrices: Vec<_> = animator.transforms(&boxes.entities).map(|t| t.matrix()).collect();
//! assert_eq!(matrices.len(), boxes.len());
//! ```
//!
//! ## Structure
//!
//! | Module | Role |
//! |---|---|
//! | [`distribution`] | cone (golden-angle spiral) and volume-uniform ball sampling |
//! | [`easing`] | cubic ease-in-out |
//! | [`state`] | [`MorphState`] and its single writer [`MorphController`] |
//! | [`entity`] | [`AnimatedEntity`] and the colour palette |
//! | [`motion`] | per-population overlay policy (swirl, bob, shimmer, spin, scale) |
//! | [`population`] | [`PopulationSpec`] → [`Population`] construction |
//! | [`animator`] | [`BlendFactor`] smoothing and per-entity transforms |
//! | [`scene`] | root rotation combining idle spin with the hand signal |

pub mod animator;
pub mod config;
pub mod distribution;
pub mod easing;
pub mod entity;
pub mod error;
pub mod motion;
pub mod population;
pub mod scene;
pub mod state;

pub use animator::{BlendFactor, EntityTransform, MorphAnimator};
pub use config::ShapeConfig;
pub use distribution::{cone_point, cone_position, random_sphere_position, GOLDEN_ANGLE};
pub use easing::ease_in_out_cubic;
pub use entity::AnimatedEntity;
pub use error::ConfigError;
pub use motion::MotionProfile;
pub use population::{Glyph, Palette, Placement, Population, PopulationSpec};
pub use scene::{SceneRotation, SceneRotationConfig};
pub use state::{MorphController, MorphState};
