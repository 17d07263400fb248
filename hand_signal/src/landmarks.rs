//! Hand landmark frames.
//!
//! Keypoints follow the usual 21-point hand scheme: wrist at 0, four points
//! per digit from thumb to pinky.  `x` and `y` are normalised image
//! coordinates in `[0, 1]` (y grows downward), `z` is depth relative to the
//! wrist.

use serde::{Deserialize, Serialize};

// ════════════════════════════════════════════════════════════════════════════
// Landmark indices
// ════════════════════════════════════════════════════════════════════════════

pub const WRIST:      usize = 0;
pub const THUMB_CMC:  usize = 1;
pub const THUMB_MCP:  usize = 2;
pub const THUMB_IP:   usize = 3;
pub const THUMB_TIP:  usize = 4;
pub const INDEX_MCP:  usize = 5;
pub const INDEX_TIP:  usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP:   usize = 13;
pub const RING_TIP:   usize = 16;
pub const PINKY_MCP:  usize = 17;
pub const PINKY_TIP:  usize = 20;

/// Number of keypoints in a complete frame.
pub const LANDMARK_COUNT: usize = 21;

/// Tips of the four fingers (thumb excluded).
pub const FINGERTIPS: [usize; 4] = [INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

// ════════════════════════════════════════════════════════════════════════════
// Landmark
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Landmark { x, y, z }
    }

    /// Distance in the image plane; depth is ignored.
    pub fn planar_distance(&self, other: &Landmark) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// LandmarkFrame
// ════════════════════════════════════════════════════════════════════════════

/// One frame of keypoints for one hand.
///
/// Frames from an external tracker may be short or contain garbage, so
/// lookups go through [`LandmarkFrame::get`], which treats missing and
/// non-finite points alike.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkFrame {
    points: Vec<Landmark>,
}

impl LandmarkFrame {
    pub fn new(points: Vec<Landmark>) -> Self {
        LandmarkFrame { points }
    }

    /// The keypoint at `index`, if present and finite.
    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index).filter(|p| p.is_finite())
    }

    pub fn wrist(&self) -> Option<&Landmark> {
        self.get(WRIST)
    }

    pub fn points(&self) -> &[Landmark] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All 21 keypoints present and finite.
    pub fn is_complete(&self) -> bool {
        self.points.len() >= LANDMARK_COUNT && self.points.iter().all(Landmark::is_finite)
    }

    /// A synthetic upright hand with its wrist at `wrist_x`.
    ///
    /// Every fingertip sits `extension_ratio` palm-lengths from the wrist,
    /// so [`crate::extension_ratio`] of the result is `extension_ratio`
    /// up to rounding.  Used by the keyboard simulator and by tests.
    pub fn posed(wrist_x: f32, extension_ratio: f32) -> Self {
        const WRIST_Y: f32 = 0.75;
        const PALM:    f32 = 0.12;

        let wrist = Landmark::new(wrist_x, WRIST_Y, 0.0);
        // Direction of each digit, radians from straight up (negative = left).
        let spread = [-0.9f32, -0.25, 0.0, 0.2, 0.4];

        let mut points = vec![wrist; LANDMARK_COUNT];
        for (digit, &angle) in spread.iter().enumerate() {
            let (sin, cos) = angle.sin_cos();
            let at = |reach: f32, depth: f32| {
                Landmark::new(wrist_x + sin * reach, WRIST_Y - cos * reach, depth)
            };
            let mcp_reach = if digit == 0 { PALM * 0.4 } else { PALM };
            let tip_reach = if digit == 0 {
                PALM * (0.4 + 0.5 * extension_ratio)
            } else {
                PALM * extension_ratio
            };
            let base = 1 + digit * 4;
            points[base]     = at(mcp_reach, -0.01);
            points[base + 1] = at(mcp_reach + (tip_reach - mcp_reach) * 0.4, -0.02);
            points[base + 2] = at(mcp_reach + (tip_reach - mcp_reach) * 0.7, -0.03);
            points[base + 3] = at(tip_reach, -0.04);
        }
        LandmarkFrame { points }
    }
}

impl From<Vec<Landmark>> for LandmarkFrame {
    fn from(points: Vec<Landmark>) -> Self {
        LandmarkFrame::new(points)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posed_hand_is_complete() {
        let f = LandmarkFrame::posed(0.3, 1.2);
        assert_eq!(f.len(), LANDMARK_COUNT);
        assert!(f.is_complete());
        assert_eq!(f.wrist().map(|w| w.x), Some(0.3));
    }

    #[test]
    fn posed_middle_knuckle_is_one_palm_up() {
        let f = LandmarkFrame::posed(0.5, 1.0);
        let d = f.get(WRIST).unwrap().planar_distance(f.get(MIDDLE_MCP).unwrap());
        assert!((d - 0.12).abs() < 1e-6);
    }

    #[test]
    fn get_skips_missing_and_nan() {
        let mut pts = vec![Landmark::default(); 5];
        pts[2].y = f32::NAN;
        let f = LandmarkFrame::new(pts);
        assert!(f.get(1).is_some());
        assert!(f.get(2).is_none());
        assert!(f.get(9).is_none());
        assert!(!f.is_complete());
    }

    #[test]
    fn planar_distance_ignores_depth() {
        let a = Landmark::new(0.0, 0.0, 0.0);
        let b = Landmark::new(0.3, 0.4, 9.0);
        assert!((a.planar_distance(&b) - 0.5).abs() < 1e-6);
    }
}
