use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::debug;

use crate::domain::session::{GameId, ParticipantId, Session};
use crate::error::AppError;

/// Handle to one session; the per-game mutex is the critical section that
/// linearizes all events for that game id.
pub type SessionHandle = Arc<Mutex<Session>>;

/// Concurrency-safe map of live sessions, keyed by game id, plus a
/// participant index for O(1) disconnect lookup.
///
/// The registry exclusively owns all sessions. Operations on distinct game
/// ids never block each other; operations on the same id serialize on the
/// session's own mutex, which callers acquire through the returned handle.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<GameId, SessionHandle>,
    by_participant: DashMap<ParticipantId, HashSet<GameId>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            by_participant: DashMap::new(),
        }
    }

    /// Fetch the session for `game_id`, creating it in `WaitingForPlayers`
    /// if absent.
    pub fn get_or_create(&self, game_id: &str) -> SessionHandle {
        self.sessions
            .entry(game_id.to_string())
            .or_insert_with(|| {
                debug!(game_id, "creating session");
                Arc::new(Mutex::new(Session::new(game_id.to_string())))
            })
            .clone()
    }

    /// Fetch an existing session; non-creating calls on unknown ids fail.
    pub fn get(&self, game_id: &str) -> Result<SessionHandle, AppError> {
        self.sessions
            .get(game_id)
            .map(|entry| entry.clone())
            .ok_or_else(|| AppError::game_not_found(game_id))
    }

    /// Evict a session and drop it from every participant's index entry.
    pub fn remove(&self, game_id: &str) -> Option<SessionHandle> {
        let removed = self.sessions.remove(game_id).map(|(_, handle)| handle);
        if removed.is_some() {
            self.by_participant.retain(|_, games| {
                games.remove(game_id);
                !games.is_empty()
            });
            debug!(game_id, "session evicted");
        }
        removed
    }

    /// Record that `participant` plays in `game_id`.
    pub fn index_participant(&self, participant: &str, game_id: &str) {
        self.by_participant
            .entry(participant.to_string())
            .or_default()
            .insert(game_id.to_string());
    }

    /// All games the participant is on the roster of.
    pub fn games_for(&self, participant: &str) -> Vec<GameId> {
        self.by_participant
            .get(participant)
            .map(|games| games.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Drop the participant's index entry entirely (on disconnect).
    pub fn forget_participant(&self, participant: &str) {
        self.by_participant.remove(participant);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::session::GameStatus;

    #[tokio::test]
    async fn get_or_create_is_idempotent_per_id() {
        let registry = SessionRegistry::new();
        let first = registry.get_or_create("g1");
        let second = registry.get_or_create("g1");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len(), 1);

        let session = first.lock().await;
        assert_eq!(session.status, GameStatus::WaitingForPlayers);
    }

    #[tokio::test]
    async fn get_on_unknown_id_reports_not_found() {
        let registry = SessionRegistry::new();
        let err = registry.get("missing").unwrap_err();
        assert!(matches!(err, AppError::GameNotFound { .. }));
    }

    #[tokio::test]
    async fn remove_clears_session_and_participant_index() {
        let registry = SessionRegistry::new();
        registry.get_or_create("g1");
        registry.index_participant("p1", "g1");
        assert_eq!(registry.games_for("p1"), vec!["g1".to_string()]);

        registry.remove("g1");
        assert!(registry.get("g1").is_err());
        assert!(registry.games_for("p1").is_empty());
    }

    #[tokio::test]
    async fn participant_index_tracks_multiple_games() {
        let registry = SessionRegistry::new();
        registry.get_or_create("g1");
        registry.get_or_create("g2");
        registry.index_participant("p1", "g1");
        registry.index_participant("p1", "g2");

        let mut games = registry.games_for("p1");
        games.sort();
        assert_eq!(games, vec!["g1".to_string(), "g2".to_string()]);

        registry.forget_participant("p1");
        assert!(registry.games_for("p1").is_empty());
    }
}
