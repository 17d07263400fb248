//! Animated entities and the colour palette they draw from.

use glam::Vec3;

// ════════════════════════════════════════════════════════════════════════════
// Palette: packed ARGB (0xAARRGGBB, A=0xFF)
// ════════════════════════════════════════════════════════════════════════════

pub const EMERALD_DEEP:    u32 = 0xFF002816;
pub const EMERALD_LIGHT:   u32 = 0xFF006B3C;
pub const GOLD_METALLIC:   u32 = 0xFFFFD700;
pub const RED_VELVET:      u32 = 0xFF8A0303;
pub const RED_BRIGHT:      u32 = 0xFFD42424;
pub const WHITE_SNOW:      u32 = 0xFFF5F5F5;
pub const BLACK_OBSIDIAN:  u32 = 0xFF1A1A1A;
pub const GREEN_CHRISTMAS: u32 = 0xFF0B4F28;

/// Linear blend of two ARGB colours. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
pub fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0 - t) + cb as f32 * t).round() as u32;
    let channel = |c: u32, shift: u32| (c >> shift) & 0xFF;
    0xFF000000
        | (lerp(channel(a, 16), channel(b, 16)) << 16)
        | (lerp(channel(a, 8), channel(b, 8)) << 8)
        | lerp(channel(a, 0), channel(b, 0))
}

// ════════════════════════════════════════════════════════════════════════════
// AnimatedEntity
// ════════════════════════════════════════════════════════════════════════════

/// One particle or instance.
///
/// Built once when its population is generated and never mutated; only the
/// per-tick transform derived from it changes.
#[derive(Clone, Debug, PartialEq)]
pub struct AnimatedEntity {
    /// Target inside the scatter ball.
    pub scatter:   Vec3,
    /// Target on the assembled shape.
    pub assembled: Vec3,
    /// Uniform random value in `[0, 1)` feeding per-entity phase offsets.
    pub seed:      f32,
    /// Base scale (point size for particles).
    pub scale:     f32,
    /// Packed ARGB colour.
    pub color:     u32,
    /// Static Euler rotation offset (XYZ, radians).
    pub rotation:  Vec3,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(EMERALD_DEEP, GOLD_METALLIC, 0.0), EMERALD_DEEP);
        assert_eq!(blend(EMERALD_DEEP, GOLD_METALLIC, 1.0), GOLD_METALLIC);
    }

    #[test]
    fn blend_is_opaque_and_clamped() {
        let c = blend(RED_VELVET, WHITE_SNOW, 7.0);
        assert_eq!(c, WHITE_SNOW);
        assert_eq!(blend(0x00000000, 0x00000000, 0.5) >> 24, 0xFF);
    }

    #[test]
    fn blend_midpoint_channels() {
        let mid = blend(0xFF000000, 0xFF0000FF, 0.5);
        assert_eq!(mid & 0xFF, 128);
    }
}
