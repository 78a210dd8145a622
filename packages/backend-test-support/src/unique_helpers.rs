//! Helpers for generating unique test identifiers
//!
//! Game and participant identifiers are externally assigned opaque strings,
//! so tests mint fresh ones per run to stay isolated from each other.

use uuid::Uuid;

/// Generate a unique string in the format `{prefix}-{uuid}`.
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}

/// Generate a unique game identifier.
pub fn unique_game_id() -> String {
    unique_str("game")
}

/// Generate a unique participant identifier.
pub fn unique_participant_id() -> String {
    unique_str("player")
}
