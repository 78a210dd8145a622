use serde::{Deserialize, Serialize};

/// A guess wins when its absolute distance to the true price is below this.
/// Prices are floats, so winning is an epsilon comparison, never equality.
pub const WIN_TOLERANCE: f64 = 0.01;

/// Qualitative feedback bucket for a losing guess.
///
/// Buckets are checked in ascending order of distance; upper bounds are
/// inclusive, so a distance of exactly 10.0 is still `VeryClose`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum ProximityHint {
    #[serde(rename = "exact")]
    Exact,
    #[serde(rename = "very very close")]
    VeryVeryClose,
    #[serde(rename = "very close")]
    VeryClose,
    #[serde(rename = "close")]
    Close,
    #[serde(rename = "medium")]
    Medium,
    #[serde(rename = "far")]
    Far,
    #[serde(rename = "very far")]
    VeryFar,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub won: bool,
    pub hint: ProximityHint,
}

/// Bucket an absolute price distance.
pub fn proximity_hint(diff: f64) -> ProximityHint {
    if diff < f64::EPSILON {
        ProximityHint::Exact
    } else if diff <= 5.0 {
        ProximityHint::VeryVeryClose
    } else if diff <= 10.0 {
        ProximityHint::VeryClose
    } else if diff <= 20.0 {
        ProximityHint::Close
    } else if diff <= 50.0 {
        ProximityHint::Medium
    } else if diff <= 100.0 {
        ProximityHint::Far
    } else {
        ProximityHint::VeryFar
    }
}

/// Evaluate a guess against the true price.
pub fn evaluate(guess: f64, price: f64) -> Evaluation {
    let diff = (guess - price).abs();
    Evaluation {
        won: diff < WIN_TOLERANCE,
        hint: proximity_hint(diff),
    }
}
