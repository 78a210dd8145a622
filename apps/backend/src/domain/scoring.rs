use crate::domain::session::GuessRecord;

const BASE_SCORE: i64 = 1000;
const PENALTY_PER_GUESS: i64 = 50;
const MIN_SCORE: i64 = 100;

/// Final score for the winner: 1000 minus 50 per guess beyond their first,
/// floored at 100. Only the winner's own guesses count against them.
///
/// A winner with no guesses on record (a win by disconnect) scores as if
/// they had guessed once.
pub fn final_score(history: &[GuessRecord], winner: &str) -> i64 {
    let own_guesses = history
        .iter()
        .filter(|g| g.participant == winner)
        .count()
        .max(1) as i64;
    (BASE_SCORE - (own_guesses - 1) * PENALTY_PER_GUESS).max(MIN_SCORE)
}
