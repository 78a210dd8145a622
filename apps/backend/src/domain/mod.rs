//! Domain layer: pure game logic types and helpers.

pub mod evaluate;
pub mod scoring;
pub mod session;

#[cfg(test)]
mod tests_evaluate;
#[cfg(test)]
mod tests_scoring;
#[cfg(test)]
mod tests_session;

// Re-exports for ergonomics
pub use evaluate::{evaluate, Evaluation, ProximityHint, WIN_TOLERANCE};
pub use scoring::final_score;
pub use session::{GameId, GameStatus, GuessRecord, Item, JoinOutcome, ParticipantId, Session};
