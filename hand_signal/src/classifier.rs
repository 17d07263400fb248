//! Gesture classification.
//!
//! The hand's openness is measured as the mean planar distance from the
//! wrist to the four fingertips, divided by the wrist-to-middle-knuckle
//! distance (the palm length).  Dividing by the palm makes the ratio
//! independent of how far the hand is from the camera.
//!
//! ```text
//!   ratio < fist_ratio   → Fist → Assembled
//!   ratio > open_ratio   → Open → Scattered
//!   otherwise            → None (dead band, no request)
//! ```
//!
//! Accepted transitions are rate-limited: after one is emitted, every
//! frame inside the debounce window yields nothing, whatever its pose.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use morph_field::MorphState;

use crate::error::SignalConfigError;
use crate::landmarks::{LandmarkFrame, FINGERTIPS, MIDDLE_MCP, WRIST};

// ════════════════════════════════════════════════════════════════════════════
// Gesture
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gesture {
    Open,
    Fist,
    #[default]
    None,
}

impl Gesture {
    /// The morph state this gesture asks for.
    pub fn requested_state(self) -> Option<MorphState> {
        match self {
            Gesture::Fist => Some(MorphState::Assembled),
            Gesture::Open => Some(MorphState::Scattered),
            Gesture::None => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Gesture::Open => "open",
            Gesture::Fist => "fist",
            Gesture::None => "none",
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Configuration
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Minimum time between accepted transitions.
    pub debounce_ms: u64,
    /// Ratios strictly below this read as a fist.
    pub fist_ratio:  f32,
    /// Ratios strictly above this read as an open palm.
    pub open_ratio:  f32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        ClassifierConfig { debounce_ms: 1_000, fist_ratio: 0.9, open_ratio: 1.3 }
    }
}

impl ClassifierConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn validate(&self) -> Result<(), SignalConfigError> {
        for (field, value) in [("fist_ratio", self.fist_ratio), ("open_ratio", self.open_ratio)] {
            if !value.is_finite() {
                return Err(SignalConfigError::NonFinite { field });
            }
            if value <= 0.0 {
                return Err(SignalConfigError::NonPositive { field, value });
            }
        }
        if self.fist_ratio >= self.open_ratio {
            return Err(SignalConfigError::InvertedThresholds {
                fist: self.fist_ratio,
                open: self.open_ratio,
            });
        }
        Ok(())
    }

    /// Map an extension ratio onto a gesture.
    pub fn gesture_for(&self, ratio: f32) -> Gesture {
        if ratio < self.fist_ratio {
            Gesture::Fist
        } else if ratio > self.open_ratio {
            Gesture::Open
        } else {
            Gesture::None
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Extension ratio
// ════════════════════════════════════════════════════════════════════════════

/// Mean wrist→fingertip distance over the palm length.
///
/// `None` when a required keypoint is missing or non-finite, or when the
/// palm length is degenerate.
pub fn extension_ratio(frame: &LandmarkFrame) -> Option<f32> {
    let wrist = frame.get(WRIST)?;
    let palm = wrist.planar_distance(frame.get(MIDDLE_MCP)?);
    if !(palm > f32::EPSILON) {
        return None;
    }

    let mut reach = 0.0;
    for &tip in &FINGERTIPS {
        reach += wrist.planar_distance(frame.get(tip)?);
    }
    let ratio = reach / FINGERTIPS.len() as f32 / palm;
    ratio.is_finite().then_some(ratio)
}

// ════════════════════════════════════════════════════════════════════════════
// GestureClassifier
// ════════════════════════════════════════════════════════════════════════════

/// Debounced fist / open-palm detector.
///
/// Timestamps are offsets from any fixed origin (session start in the
/// viewer), so tests drive the clock directly.
#[derive(Clone, Debug, Default)]
pub struct GestureClassifier {
    config:        ClassifierConfig,
    last_accepted: Option<Duration>,
    gesture:       Gesture,
}

impl GestureClassifier {
    pub fn new(config: ClassifierConfig) -> Result<Self, SignalConfigError> {
        config.validate()?;
        Ok(GestureClassifier { config, last_accepted: None, gesture: Gesture::None })
    }

    /// Classify one frame.
    ///
    /// Returns the state to request, only when it differs from `current`
    /// and the debounce window since the last accepted transition has
    /// elapsed.  An emitted request restarts the window.
    pub fn classify(
        &mut self,
        frame:   &LandmarkFrame,
        current: MorphState,
        now:     Duration,
    ) -> Option<MorphState> {
        let Some(ratio) = extension_ratio(frame) else {
            log::debug!("skipping malformed frame ({} points)", frame.len());
            return None;
        };
        self.gesture = self.config.gesture_for(ratio);

        if let Some(last) = self.last_accepted {
            if now.saturating_sub(last) < self.config.debounce() {
                return None;
            }
        }

        let target = self.gesture.requested_state()?;
        if target == current {
            return None;
        }
        log::debug!(
            "gesture {} (ratio {ratio:.2}) requests {target} at {:.3}s",
            self.gesture.name(),
            now.as_secs_f32()
        );
        self.last_accepted = Some(now);
        Some(target)
    }

    /// Most recent gesture read from an evaluated frame.
    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn last_accepted(&self) -> Option<Duration> {
        self.last_accepted
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
