use proptest::prelude::*;

use crate::domain::evaluate::{evaluate, proximity_hint, ProximityHint, WIN_TOLERANCE};

fn hint_rank(hint: ProximityHint) -> u8 {
    match hint {
        ProximityHint::Exact => 0,
        ProximityHint::VeryVeryClose => 1,
        ProximityHint::VeryClose => 2,
        ProximityHint::Close => 3,
        ProximityHint::Medium => 4,
        ProximityHint::Far => 5,
        ProximityHint::VeryFar => 6,
    }
}

#[test]
fn win_is_strictly_inside_tolerance() {
    assert!(evaluate(19.99, 19.99).won);
    assert!(evaluate(19.995, 19.99).won);
    assert!(!evaluate(19.99 + WIN_TOLERANCE, 19.99).won);
    assert!(!evaluate(25.0, 19.99).won);
}

#[test]
fn win_is_symmetric_around_the_price() {
    assert!(evaluate(100.005, 100.0).won);
    assert!(evaluate(99.995, 100.0).won);
    assert!(!evaluate(100.02, 100.0).won);
    assert!(!evaluate(99.98, 100.0).won);
}

#[test]
fn bucket_upper_bounds_are_inclusive() {
    assert_eq!(proximity_hint(0.0), ProximityHint::Exact);
    assert_eq!(proximity_hint(5.0), ProximityHint::VeryVeryClose);
    assert_eq!(proximity_hint(10.0), ProximityHint::VeryClose);
    assert_eq!(proximity_hint(20.0), ProximityHint::Close);
    assert_eq!(proximity_hint(50.0), ProximityHint::Medium);
    assert_eq!(proximity_hint(100.0), ProximityHint::Far);
    assert_eq!(proximity_hint(100.01), ProximityHint::VeryFar);
}

#[test]
fn bucket_lower_edges_fall_into_the_next_bucket() {
    assert_eq!(proximity_hint(0.5), ProximityHint::VeryVeryClose);
    assert_eq!(proximity_hint(5.01), ProximityHint::VeryClose);
    assert_eq!(proximity_hint(10.5), ProximityHint::Close);
    assert_eq!(proximity_hint(20.5), ProximityHint::Medium);
    assert_eq!(proximity_hint(50.5), ProximityHint::Far);
}

#[test]
fn guess_25_against_19_99_is_very_close() {
    // |25 - 19.99| = 5.01, just past the "very very close" bound.
    let eval = evaluate(25.0, 19.99);
    assert!(!eval.won);
    assert_eq!(eval.hint, ProximityHint::VeryClose);
}

proptest! {
    #[test]
    fn won_iff_within_tolerance(guess in -10_000.0..10_000.0f64, price in 0.0..10_000.0f64) {
        let eval = evaluate(guess, price);
        prop_assert_eq!(eval.won, (guess - price).abs() < WIN_TOLERANCE);
    }

    #[test]
    fn hint_is_monotone_in_distance(a in 0.0..500.0f64, b in 0.0..500.0f64) {
        let (near, far) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(hint_rank(proximity_hint(near)) <= hint_rank(proximity_hint(far)));
    }
}
