//! Target-position generators.
//!
//! Both functions are O(1) per entity and are called once per entity when a
//! population is built.  Randomness is always drawn from the caller's RNG so
//! a seeded session reproduces the same field.

use std::f64::consts::TAU;

use glam::Vec3;
use rand::Rng;

/// Golden angle in radians (≈ 137.5°).
pub const GOLDEN_ANGLE: f64 = 2.39996;

// ════════════════════════════════════════════════════════════════════════════
// Cone surface
// ════════════════════════════════════════════════════════════════════════════

/// Position of entity `index` of `total` on the cone surface, without jitter.
///
/// Height is linear in `index / total` and centred on the origin; the radius
/// shrinks linearly from `base_radius` at the bottom to zero at the apex.
/// Successive entities advance by the golden angle, which keeps the spiral
/// free of visible bands for any `total`.
pub fn cone_point(index: usize, total: usize, height: f32, base_radius: f32) -> Vec3 {
    let y_norm = index as f32 / total.max(1) as f32;
    let y      = (y_norm - 0.5) * height;
    let radius = base_radius * (1.0 - y_norm);

    // Reduce in f64 first; index * 2.4 loses precision in f32 for large fields.
    let angle = (index as f64 * GOLDEN_ANGLE).rem_euclid(TAU) as f32;

    Vec3::new(radius * angle.cos(), y, radius * angle.sin())
}

/// [`cone_point`] plus uniform horizontal jitter in `[-jitter/2, jitter/2)`.
pub fn cone_position<R: Rng + ?Sized>(
    index:       usize,
    total:       usize,
    height:      f32,
    base_radius: f32,
    jitter:      f32,
    rng:         &mut R,
) -> Vec3 {
    let p  = cone_point(index, total, height, base_radius);
    let jx = (rng.random::<f32>() - 0.5) * jitter;
    let jz = (rng.random::<f32>() - 0.5) * jitter;
    Vec3::new(p.x + jx, p.y, p.z + jz)
}

// ════════════════════════════════════════════════════════════════════════════
// Ball volume
// ════════════════════════════════════════════════════════════════════════════

/// Uniform sample inside a ball of `radius`.
///
/// The radius is the cube root of a uniform variable and the polar angle is
/// `acos(2v - 1)`, so density is uniform in volume rather than bunched at
/// the centre.
pub fn random_sphere_position<R: Rng + ?Sized>(radius: f32, rng: &mut R) -> Vec3 {
    let u: f32 = rng.random();
    let v: f32 = rng.random();
    let theta  = std::f32::consts::TAU * u;
    let phi    = (2.0 * v - 1.0).clamp(-1.0, 1.0).acos();
    let r      = rng.random::<f32>().cbrt() * radius;

    Vec3::new(
        r * phi.sin() * theta.cos(),
        r * phi.sin() * theta.sin(),
        r * phi.cos(),
    )
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn planar(p: Vec3) -> f32 {
        (p.x * p.x + p.z * p.z).sqrt()
    }

    #[test]
    fn cone_spans_height_centred() {
        let bottom = cone_point(0, 100, 12.0, 4.5);
        assert!((bottom.y + 6.0).abs() < 1e-6);
        assert!((planar(bottom) - 4.5).abs() < 1e-5);

        let top = cone_point(99, 100, 12.0, 4.5);
        assert!(top.y < 6.0 && top.y > 5.8);
    }

    #[test]
    fn cone_radius_shrinks_toward_apex() {
        let total = 1000;
        let mut last = f32::INFINITY;
        for i in 0..total {
            let r = planar(cone_point(i, total, 12.0, 4.5));
            assert!(r < last + 1e-4, "radius grew at {}", i);
            last = r;
        }
        assert!(last < 0.01);
    }

    #[test]
    fn golden_angle_does_not_repeat() {
        // Consecutive points never share an angle.
        let a = cone_point(10, 50, 1.0, 1.0);
        let b = cone_point(11, 50, 1.0, 1.0);
        let angle_a = a.z.atan2(a.x);
        let angle_b = b.z.atan2(b.x);
        assert!((angle_a - angle_b).abs() > 0.1);
    }

    #[test]
    fn jitter_stays_within_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        for i in 0..500 {
            let exact    = cone_point(i, 500, 12.0, 4.5);
            let jittered = cone_position(i, 500, 12.0, 4.5, 0.2, &mut rng);
            assert_eq!(exact.y, jittered.y);
            assert!((exact.x - jittered.x).abs() <= 0.1 + 1e-6);
            assert!((exact.z - jittered.z).abs() <= 0.1 + 1e-6);
        }
    }

    #[test]
    fn seeded_sampling_is_reproducible() {
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);
        for _ in 0..32 {
            assert_eq!(random_sphere_position(5.0, &mut a), random_sphere_position(5.0, &mut b));
        }
    }

    #[test]
    fn sphere_samples_inside_ball() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..2000 {
            assert!(random_sphere_position(25.0, &mut rng).length() <= 25.0 + 1e-3);
        }
    }

    #[test]
    fn sphere_density_is_volume_uniform() {
        // Under a volume-uniform law P(|p| < r/2) = 1/8; a naive uniform
        // radius would put half of the samples there.
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let n = 20_000;
        let radius = 10.0;
        let mut inner = 0usize;
        let mut mean = 0.0f64;
        for _ in 0..n {
            let rho = random_sphere_position(radius, &mut rng).length();
            if rho < radius / 2.0 { inner += 1; }
            mean += (rho / radius) as f64;
        }
        let inner_frac = inner as f64 / n as f64;
        mean /= n as f64;
        assert!((inner_frac - 0.125).abs() < 0.015, "inner fraction {}", inner_frac);
        // E[rho/R] = 3/4 for density ∝ rho².
        assert!((mean - 0.75).abs() < 0.01, "mean {}", mean);
    }

    #[test]
    fn sphere_direction_is_isotropic() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let n = 20_000;
        let mut upper = 0usize;
        let mut centroid = Vec3::ZERO;
        for _ in 0..n {
            let p = random_sphere_position(1.0, &mut rng);
            if p.z > 0.0 { upper += 1; }
            centroid += p;
        }
        let frac = upper as f32 / n as f32;
        assert!((frac - 0.5).abs() < 0.02);
        assert!((centroid / n as f32).length() < 0.02);
    }

    proptest! {
        #[test]
        fn cone_height_non_decreasing(total in 1usize..5000, fa in 0.0f64..1.0, fb in 0.0f64..1.0) {
            let pick = |f: f64| ((f * total as f64) as usize).min(total - 1);
            let (lo, hi) = if fa <= fb { (pick(fa), pick(fb)) } else { (pick(fb), pick(fa)) };
            let p_lo = cone_point(lo, total, 12.0, 4.5);
            let p_hi = cone_point(hi, total, 12.0, 4.5);
            prop_assert!(p_lo.y <= p_hi.y);
            prop_assert!(planar(p_lo) + 1e-4 >= planar(p_hi));
        }
    }
}
