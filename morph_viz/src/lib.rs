//! # morph_viz
//!
//! Viewer for the morph field: twelve thousand foliage particles, boxes,
//! baubles and a star drifting in a scattered cloud, assembling into a cone
//! when the tracked hand closes into a fist and scattering again on an open
//! palm.  Wrist position left or right of centre spins the scene.
//!
//! ## Gesture → Action mapping
//!
//! | Gesture | Action |
//! |---|---|
//! | Closed fist (extension ratio < 0.9) | Assemble |
//! | Open palm (extension ratio > 1.3) | Scatter |
//! | Wrist off centre (outside ±0.1) | Spin the scene, 3 rad/s per unit offset |
//! | No hand | Stop hand-driven spin |
//!
//! Accepted morph gestures are at least one second apart.
//!
//! ## Feature flags
//!
//! * default: **Simulation mode**, keyboard and mouse drive a synthetic hand.
//! * `leap`: **Hardware mode**, landmarks from a LeapMotion controller via LeapC.
//!
//! ### Simulation controls
//!
//! | Key | Effect |
//! |---|---|
//! | `Space` | Toggle assembled / scattered directly |
//! | `H` | Hide / show the hand |
//! | hold `F` | Fist |
//! | hold `O` | Open palm |
//! | mouse x | Wrist position |
//! | `Q` / `Escape` | Quit |

pub mod app;
pub mod capture;
pub mod config;
pub mod error;
pub mod replay;
pub mod visualizer;

pub use app::{run, run_headless, AppState, GestureStatus, HeadlessSummary, RunOptions};
pub use capture::{CaptureSession, LandmarkSource, SourceEvent, StopToken};
pub use config::SessionConfig;
pub use error::AppError;
