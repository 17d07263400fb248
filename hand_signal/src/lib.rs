//! # hand_signal
//!
//! Control signals from a single tracked hand.  One [`LandmarkFrame`] (21
//! normalised keypoints, or `None` when no hand is visible) yields:
//!
//! * a **morph request** from [`GestureClassifier::classify`], closed fist
//!   asks for [`MorphState::Assembled`], open palm for
//!   [`MorphState::Scattered`], with a dead band between the two thresholds
//!   and a debounce window between accepted transitions;
//! * a **rotation velocity** from [`RotationMapper::map`], wrist position
//!   left or right of centre, with a dead zone around the middle.
//!
//! Both are pure functions of the frame plus the classifier's last
//! acceptance time, so they run on synthetic frames in tests just as on a
//! live tracker.
//!
//! ```rust
//! use std::time::Duration;
//! use hand_signal::{GestureClassifier, LandmarkFrame, RotationMapper};
//! use morph_field::MorphState;
//!
//! let mut classifier = GestureClassifier::default();
//! let fist = LandmarkFrame::posed(0.5, 0.5);
//! assert_eq!(
//!     classifier.classify(&fist, MorphState::Scattered, Duration::ZERO),
//!     Some(MorphState::Assembled),
//! );
//!
//! let mapper = RotationMapper::default();
//! assert_eq!(mapper.map(Some(&LandmarkFrame::posed(0.0, 1.0))), 1.5);
//! assert_eq!(mapper.map(None), 0.0);
//! ```

pub mod classifier;
pub mod error;
pub mod landmarks;
pub mod rotation;

pub use classifier::{extension_ratio, ClassifierConfig, Gesture, GestureClassifier};
pub use error::SignalConfigError;
pub use landmarks::{Landmark, LandmarkFrame, LANDMARK_COUNT};
pub use rotation::{RotationConfig, RotationMapper};

pub use morph_field::MorphState;
