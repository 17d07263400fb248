//! Per-population morph animation.
//!
//! Each [`MorphAnimator`] owns one [`BlendFactor`] and eases it toward the
//! target implied by the current [`MorphState`] at its population's own
//! rate.  Populations therefore drift out of step during a transition; the
//! layering comes from those differing rates, not from any shared clock.

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::easing::ease_in_out_cubic;
use crate::entity::AnimatedEntity;
use crate::motion::MotionProfile;
use crate::population::Population;
use crate::state::MorphState;

// ════════════════════════════════════════════════════════════════════════════
// BlendFactor
// ════════════════════════════════════════════════════════════════════════════

/// Raw (un-eased) blend between scatter (0.0) and assembled (1.0).
///
/// Accumulated in `f64` so the approach keeps closing the gap after it
/// falls below `f32` resolution; [`BlendFactor::value`] then reads exactly
/// 0.0 or 1.0 once settled.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BlendFactor(f64);

impl BlendFactor {
    pub fn new(value: f32) -> Self {
        BlendFactor(f64::from(value.clamp(0.0, 1.0)))
    }

    pub fn value(self) -> f32 {
        self.0 as f32
    }

    /// One exponential-approach step toward `target`.
    ///
    /// The step fraction `delta * rate` is capped at 1.0, so a long stall
    /// lands exactly on the target instead of overshooting.  Non-positive or
    /// non-finite `delta` leaves the factor unchanged.
    pub fn approach(&mut self, target: f32, delta: f32, rate: f32) -> f32 {
        if !(delta > 0.0) || !delta.is_finite() {
            return self.value();
        }
        let target = f64::from(target.clamp(0.0, 1.0));
        let step = (f64::from(delta) * f64::from(rate)).clamp(0.0, 1.0);
        self.0 = (self.0 + (target - self.0) * step).clamp(0.0, 1.0);
        self.value()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// EntityTransform
// ════════════════════════════════════════════════════════════════════════════

/// The per-tick transform handed to the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityTransform {
    pub position: Vec3,
    /// Euler angles, XYZ order.
    pub rotation: Vec3,
    pub scale:    f32,
}

impl EntityTransform {
    pub fn matrix(&self) -> Mat4 {
        let rot = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), rot, self.position)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MorphAnimator
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct MorphAnimator {
    blend:  BlendFactor,
    rate:   f32,
    motion: MotionProfile,
    /// Seconds of animation time accumulated from positive ticks.
    time:   f32,
}

impl MorphAnimator {
    pub fn new(rate: f32, motion: MotionProfile) -> Self {
        MorphAnimator { blend: BlendFactor::default(), rate, motion, time: 0.0 }
    }

    pub fn for_population(population: &Population) -> Self {
        Self::new(population.approach_rate, population.motion.clone())
    }

    /// Start from `state` already reached (factor 0 or 1).
    pub fn settled(mut self, state: MorphState) -> Self {
        self.blend = BlendFactor::new(state.target_factor());
        self
    }

    /// Advance by `delta` seconds toward `state`; returns the raw factor.
    pub fn advance(&mut self, delta: f32, state: MorphState) -> f32 {
        if delta > 0.0 && delta.is_finite() {
            self.time += delta;
        }
        self.blend.approach(state.target_factor(), delta, self.rate)
    }

    pub fn factor(&self) -> f32 {
        self.blend.value()
    }

    pub fn eased(&self) -> f32 {
        ease_in_out_cubic(self.blend.value())
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Transform of the `index`-th entity at the current factor and time.
    pub fn transform(&self, index: usize, entity: &AnimatedEntity) -> EntityTransform {
        let eased = self.eased();
        let t     = self.time;

        let scatter  = self.motion.scatter_pose(index, entity.scatter, t);
        let position = scatter.lerp(entity.assembled, eased)
            + self.motion.shimmer_offset(entity.seed, t, eased);

        EntityTransform {
            position,
            rotation: self.motion.spin.rotation(entity.rotation, t, eased),
            scale:    entity.scale * self.motion.scale.factor(eased),
        }
    }

    pub fn transforms<'a>(
        &'a self,
        entities: &'a [AnimatedEntity],
    ) -> impl Iterator<Item = EntityTransform> + 'a {
        entities.iter().enumerate().map(move |(i, e)| self.transform(i, e))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn entity() -> AnimatedEntity {
        AnimatedEntity {
            scatter:   Vec3::new(8.0, -3.0, 5.0),
            assembled: Vec3::new(1.0, 2.0, 0.5),
            seed:      0.4,
            scale:     0.3,
            color:     0xFFFFFFFF,
            rotation:  Vec3::new(0.5, 1.0, 0.0),
        }
    }

    #[test]
    fn approach_is_exponential() {
        let mut b = BlendFactor::default();
        b.approach(1.0, 0.1, 2.0);
        assert!((b.value() - 0.2).abs() < 1e-6);
        b.approach(1.0, 0.1, 2.0);
        assert!((b.value() - 0.36).abs() < 1e-6);
    }

    #[test]
    fn delta_spike_clamps_to_target() {
        let mut b = BlendFactor::new(0.3);
        assert_eq!(b.approach(1.0, 30.0, 2.0), 1.0);
        assert_eq!(b.approach(0.0, 1e9, 0.6), 0.0);
    }

    #[test]
    fn slow_approach_reaches_target_exactly() {
        let mut b = BlendFactor::default();
        for _ in 0..36_000 {
            b.approach(1.0, 1.0 / 60.0, 0.6);
        }
        assert_eq!(b.value(), 1.0);
        for _ in 0..36_000 {
            b.approach(0.0, 1.0 / 60.0, 2.0);
        }
        assert_eq!(b.value(), 0.0);
    }

    #[test]
    fn bad_delta_is_ignored() {
        let mut b = BlendFactor::new(0.5);
        assert_eq!(b.approach(1.0, -1.0, 2.0), 0.5);
        assert_eq!(b.approach(1.0, f32::NAN, 2.0), 0.5);
        assert_eq!(b.approach(1.0, f32::INFINITY, 2.0), 0.5);
    }

    #[test]
    fn heavier_populations_lag() {
        let mut light = MorphAnimator::new(2.0, MotionProfile::still());
        let mut heavy = MorphAnimator::new(0.6, MotionProfile::still());
        for _ in 0..30 {
            light.advance(1.0 / 60.0, MorphState::Assembled);
            heavy.advance(1.0 / 60.0, MorphState::Assembled);
        }
        assert!(light.factor() > heavy.factor());
    }

    #[test]
    fn scattered_pose_at_time_zero_is_scatter_target() {
        let anim = MorphAnimator::new(1.0, MotionProfile::still());
        let t = anim.transform(0, &entity());
        assert_eq!(t.position, entity().scatter);
        assert_eq!(t.scale, 0.3);
        assert_eq!(t.rotation, entity().rotation);
    }

    #[test]
    fn assembled_pose_drops_overlay() {
        let mut anim = MorphAnimator::new(0.8, MotionProfile::ornament());
        anim.advance(100.0, MorphState::Assembled);
        assert_eq!(anim.factor(), 1.0);
        let t = anim.transform(7, &entity());
        assert!((t.position - entity().assembled).length() < 1e-5);
        // Only idle spin remains.
        let expected = entity().rotation + Vec3::new(0.2, 0.2, 0.0) * 100.0;
        assert!((t.rotation - expected).length() < 1e-3);
    }

    #[test]
    fn scatter_overlay_moves_over_time() {
        let mut anim = MorphAnimator::new(1.0, MotionProfile::foliage());
        let before = anim.transform(0, &entity()).position;
        anim.advance(2.0, MorphState::Scattered);
        let after = anim.transform(0, &entity()).position;
        assert!((after - before).length() > 0.01);
        assert_eq!(anim.factor(), 0.0);
    }

    #[test]
    fn settled_animator_starts_at_target() {
        let anim = MorphAnimator::new(1.0, MotionProfile::star()).settled(MorphState::Assembled);
        assert_eq!(anim.factor(), 1.0);
        let t = anim.transform(0, &entity());
        assert!((t.scale - 0.36).abs() < 1e-6);
    }

    #[test]
    fn matrix_places_translation() {
        let t = EntityTransform { position: Vec3::new(1.0, 2.0, 3.0), rotation: Vec3::ZERO, scale: 2.0 };
        let m = t.matrix();
        assert_eq!(m.w_axis.truncate(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(m.transform_point3(Vec3::X), Vec3::new(3.0, 2.0, 3.0));
    }

    proptest! {
        #[test]
        fn blend_stays_bounded_and_monotonic(
            deltas in proptest::collection::vec(1e-4f32..5.0, 1..200),
            rate in 0.05f32..10.0,
        ) {
            let mut b = BlendFactor::default();
            let mut last = 0.0;
            for d in deltas {
                let v = b.approach(1.0, d, rate);
                prop_assert!(v >= last);
                prop_assert!((0.0..=1.0).contains(&v));
                last = v;
            }
        }

        #[test]
        fn blend_descends_without_undershoot(
            deltas in proptest::collection::vec(1e-4f32..5.0, 1..200),
            start in 0.0f32..=1.0,
        ) {
            let mut b = BlendFactor::new(start);
            let mut last = b.value();
            for d in deltas {
                let v = b.approach(0.0, d, 1.5);
                prop_assert!(v <= last);
                prop_assert!(v >= 0.0);
                last = v;
            }
        }
    }
}
