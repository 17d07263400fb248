/// End-to-end: build a field, toggle to assembled, run the animator for a
/// long time and check every entity lands on its cone target.

use morph_field::{
    MorphAnimator, MorphController, MorphState, Population, PopulationSpec, ShapeConfig,
};
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn hundred(spec: PopulationSpec) -> Population {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let spec = PopulationSpec { count: 100, ..spec };
    Population::generate(&spec, &ShapeConfig::default(), &mut rng).unwrap()
}

#[test]
fn toggled_field_lands_on_assembled_targets() {
    for spec in [PopulationSpec::foliage(), PopulationSpec::boxes(), PopulationSpec::baubles()] {
        let pop = hundred(spec);
        let mut animator = MorphAnimator::for_population(&pop);
        let mut controller = MorphController::default();
        assert_eq!(controller.current(), MorphState::Scattered);

        // A second of scattered drift first so the overlay is active.
        for _ in 0..60 {
            animator.advance(1.0 / 60.0, controller.current());
        }
        controller.toggle();

        // One large step clamps straight to the target.
        animator.advance(1_000.0, controller.current());
        assert_eq!(animator.factor(), 1.0);

        for (t, e) in animator.transforms(&pop.entities).zip(&pop.entities) {
            assert!(
                (t.position - e.assembled).length() < 1e-4,
                "{}: {:?} vs {:?}",
                pop.name,
                t.position,
                e.assembled
            );
        }
    }
}

#[test]
fn many_small_ticks_converge_without_overshoot() {
    let pop = hundred(PopulationSpec::boxes());
    let mut animator = MorphAnimator::for_population(&pop);
    let mut last = 0.0;
    for _ in 0..(60 * 120) {
        let f = animator.advance(1.0 / 60.0, MorphState::Assembled);
        assert!(f >= last && f <= 1.0);
        last = f;
    }
    assert_eq!(animator.factor(), 1.0);
    for (t, e) in animator.transforms(&pop.entities).zip(&pop.entities) {
        assert!((t.position - e.assembled).length() < 1e-3);
    }
}

#[test]
fn populations_desynchronise_mid_transition() {
    let foliage = hundred(PopulationSpec::foliage());
    let boxes   = hundred(PopulationSpec::boxes());
    let mut a = MorphAnimator::for_population(&foliage);
    let mut b = MorphAnimator::for_population(&boxes);
    for _ in 0..30 {
        a.advance(1.0 / 60.0, MorphState::Assembled);
        b.advance(1.0 / 60.0, MorphState::Assembled);
    }
    assert!(a.factor() > 2.0 * b.factor());
}
