//! Wrist position → scene rotation velocity.
//!
//! The viewer's image is mirrored, so a wrist left of centre in camera
//! coordinates (small `x`) turns the scene positively.

use serde::{Deserialize, Serialize};

use crate::error::SignalConfigError;
use crate::landmarks::LandmarkFrame;

const CENTRE: f32 = 0.5;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    /// Half-width of the band around centre that maps to zero.
    pub dead_zone: f32,
    /// Radians per second per unit of offset from centre.
    pub gain:      f32,
}

impl Default for RotationConfig {
    fn default() -> Self {
        RotationConfig { dead_zone: 0.1, gain: 3.0 }
    }
}

impl RotationConfig {
    pub fn validate(&self) -> Result<(), SignalConfigError> {
        if !self.dead_zone.is_finite() {
            return Err(SignalConfigError::NonFinite { field: "dead_zone" });
        }
        if self.dead_zone < 0.0 {
            return Err(SignalConfigError::Negative { field: "dead_zone", value: self.dead_zone });
        }
        if !self.gain.is_finite() {
            return Err(SignalConfigError::NonFinite { field: "gain" });
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct RotationMapper {
    config: RotationConfig,
}

impl RotationMapper {
    pub fn new(config: RotationConfig) -> Result<Self, SignalConfigError> {
        config.validate()?;
        Ok(RotationMapper { config })
    }

    /// Rotation velocity for the current frame; zero with no hand.
    pub fn map(&self, frame: Option<&LandmarkFrame>) -> f32 {
        let Some(wrist) = frame.and_then(LandmarkFrame::wrist) else {
            return 0.0;
        };
        let offset = CENTRE - wrist.x;
        if offset.abs() <= self.config.dead_zone {
            0.0
        } else {
            offset * self.config.gain
        }
    }

    pub fn config(&self) -> &RotationConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::Landmark;

    fn wrist_at(x: f32) -> LandmarkFrame {
        LandmarkFrame::posed(x, 1.0)
    }

    #[test]
    fn centre_and_dead_zone_are_still() {
        let m = RotationMapper::default();
        assert_eq!(m.map(Some(&wrist_at(0.5))), 0.0);
        assert_eq!(m.map(Some(&wrist_at(0.45))), 0.0);
        assert_eq!(m.map(Some(&wrist_at(0.55))), 0.0);
    }

    #[test]
    fn far_left_turns_positively() {
        let m = RotationMapper::default();
        assert_eq!(m.map(Some(&wrist_at(0.0))), 1.5);
        assert_eq!(m.map(Some(&wrist_at(1.0))), -1.5);
    }

    #[test]
    fn outside_dead_zone_is_linear() {
        let m = RotationMapper::default();
        let v = m.map(Some(&wrist_at(0.3)));
        assert!((v - 0.6).abs() < 1e-5);
    }

    #[test]
    fn absent_hand_is_zero() {
        assert_eq!(RotationMapper::default().map(None), 0.0);
    }

    #[test]
    fn missing_or_nan_wrist_is_zero() {
        let m = RotationMapper::default();
        assert_eq!(m.map(Some(&LandmarkFrame::new(Vec::new()))), 0.0);
        let nan = LandmarkFrame::new(vec![Landmark::new(f32::NAN, 0.5, 0.0)]);
        assert_eq!(m.map(Some(&nan)), 0.0);
    }

    #[test]
    fn config_validation() {
        assert!(RotationConfig::default().validate().is_ok());
        let bad = RotationConfig { dead_zone: -0.1, ..Default::default() };
        assert!(matches!(bad.validate(), Err(SignalConfigError::Negative { .. })));
        assert!(RotationMapper::new(RotationConfig { gain: f32::INFINITY, ..Default::default() }).is_err());
    }
}
