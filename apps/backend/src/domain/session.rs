use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::evaluate::ProximityHint;

/// Externally assigned, stable for the lifetime of one game.
pub type GameId = String;
/// Stable identifier of a connected player.
pub type ParticipantId = String;

/// At most two players per session; the first entrant is the creator.
pub const MAX_PLAYERS: usize = 2;

/// The priced object both players are guessing at. Immutable once set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub name: String,
    pub image_url: String,
    pub price: f64,
}

/// Overall session progression.
///
/// "Ready" is not a stored state: it is `WaitingForPlayers` with a full
/// roster, and the transition out of it requires an explicit start event
/// from the creator.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GameStatus {
    WaitingForPlayers,
    InProgress,
    Finished,
}

/// One entry of the append-only guess history.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessRecord {
    pub participant: ParticipantId,
    pub guess: f64,
    /// Unix milliseconds at the moment the guess was accepted.
    pub timestamp_ms: i64,
}

impl GuessRecord {
    pub fn now(participant: ParticipantId, guess: f64) -> Self {
        let timestamp_ms = (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as i64;
        Self {
            participant,
            guess,
            timestamp_ms,
        }
    }
}

/// Outcome of an attempt to add a participant to the roster.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum JoinOutcome {
    /// Appended to the roster.
    Joined,
    /// Already on the roster; caller should resync, not re-announce.
    AlreadyPresent,
    /// Roster already holds two players.
    Full,
}

/// Per-game state. Owned exclusively by the session registry; the
/// coordinator locks one session per event and releases it after
/// broadcasting.
#[derive(Debug, Clone)]
pub struct Session {
    pub game_id: GameId,
    /// Insertion order = join order; `players[0]` is the creator.
    pub players: Vec<ParticipantId>,
    pub status: GameStatus,
    /// Present only once the game starts.
    pub item: Option<Item>,
    /// Whose guess is currently accepted; unset before start.
    pub current_turn: Option<ParticipantId>,
    /// Incremented each time the turn passes.
    pub round: u32,
    pub guess_history: Vec<GuessRecord>,
    /// Most recent non-winning guess, kept for late-joiner resync.
    pub last_guess: Option<f64>,
    /// Feedback for `last_guess`, replayed alongside it on resync.
    pub last_hint: Option<ProximityHint>,
    /// Set exactly once; terminal.
    pub winner: Option<ParticipantId>,
}

impl Session {
    pub fn new(game_id: GameId) -> Self {
        Self {
            game_id,
            players: Vec::with_capacity(MAX_PLAYERS),
            status: GameStatus::WaitingForPlayers,
            item: None,
            current_turn: None,
            round: 0,
            guess_history: Vec::new(),
            last_guess: None,
            last_hint: None,
            winner: None,
        }
    }

    pub fn creator(&self) -> Option<&ParticipantId> {
        self.players.first()
    }

    pub fn contains(&self, participant: &str) -> bool {
        self.players.iter().any(|p| p == participant)
    }

    /// True while guesses are being accepted.
    pub fn in_progress(&self) -> bool {
        self.status == GameStatus::InProgress && self.winner.is_none()
    }

    pub fn try_join(&mut self, participant: &str) -> JoinOutcome {
        if self.contains(participant) {
            return JoinOutcome::AlreadyPresent;
        }
        if self.players.len() >= MAX_PLAYERS {
            return JoinOutcome::Full;
        }
        self.players.push(participant.to_string());
        JoinOutcome::Joined
    }

    /// The participant after `current` in join order, round-robin.
    ///
    /// Written against the roster length rather than a literal 2 so the
    /// rotation stays correct for any future roster size.
    pub fn next_player(&self, current: &str) -> Option<&ParticipantId> {
        let idx = self.players.iter().position(|p| p == current)?;
        self.players.get((idx + 1) % self.players.len())
    }

    /// Rotate the turn to the other player and bump the round counter.
    ///
    /// Returns the new turn holder. No-op (returns None) when no turn is
    /// set or the current holder is not on the roster.
    pub fn advance_turn(&mut self) -> Option<ParticipantId> {
        let current = self.current_turn.clone()?;
        let next = self.next_player(&current)?.clone();
        self.current_turn = Some(next.clone());
        self.round += 1;
        Some(next)
    }
}
