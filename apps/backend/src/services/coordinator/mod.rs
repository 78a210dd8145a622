//! Session coordinator: the event-driven state machine behind every live
//! game. All client events (join, start, guess, timeout, disconnect) enter
//! here, and this is the only component that mutates a session.
//!
//! Events for one game id are linearized on the session's own mutex; events
//! for different game ids proceed independently. The item fetch and record
//! store writes are the only suspension points, and neither holds the
//! session lock while awaiting.

mod lifecycle;
mod play;

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::adapters::{GameRecordStore, ItemSource};
use crate::domain::session::GuessRecord;
use crate::services::registry::SessionRegistry;
use crate::services::scheduler::{DeadlineExpiry, TurnScheduler};
use crate::ws::hub::ConnectionHub;

pub struct SessionCoordinator {
    registry: Arc<SessionRegistry>,
    scheduler: Arc<TurnScheduler>,
    hub: Arc<ConnectionHub>,
    items: Arc<dyn ItemSource>,
    records: Arc<dyn GameRecordStore>,
    turn_timeout: Duration,
    finished_linger: Duration,
}

impl SessionCoordinator {
    pub fn new(
        registry: Arc<SessionRegistry>,
        scheduler: Arc<TurnScheduler>,
        hub: Arc<ConnectionHub>,
        items: Arc<dyn ItemSource>,
        records: Arc<dyn GameRecordStore>,
        turn_timeout: Duration,
        finished_linger: Duration,
    ) -> Self {
        Self {
            registry,
            scheduler,
            hub,
            items,
            records,
            turn_timeout,
            finished_linger,
        }
    }

    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Consume scheduler expiries on a dedicated task. Must be spawned once
    /// per coordinator, before any game starts.
    pub fn spawn_deadline_pump(
        coordinator: Arc<Self>,
        mut expiry_rx: mpsc::UnboundedReceiver<DeadlineExpiry>,
    ) {
        tokio::spawn(async move {
            while let Some(expiry) = expiry_rx.recv().await {
                coordinator
                    .expire_deadline(&expiry.game_id, expiry.generation)
                    .await;
            }
            info!("deadline pump stopped");
        });
    }

    /// Evict a finished session after the linger window, cancelling any
    /// outstanding deadline so nothing fires against a removed session.
    pub(super) fn schedule_eviction(&self, game_id: &str) {
        let registry = self.registry.clone();
        let scheduler = self.scheduler.clone();
        let hub = self.hub.clone();
        let linger = self.finished_linger;
        let game_id = game_id.to_string();
        tokio::spawn(async move {
            sleep(linger).await;
            scheduler.cancel(&game_id);
            hub.drop_topic(&game_id);
            if registry.remove(&game_id).is_some() {
                debug!(%game_id, "finished session evicted");
            }
        });
    }

    /// Best-effort durable record of a start; a failure is logged and the
    /// in-memory game proceeds regardless.
    pub(super) fn spawn_record_start(
        &self,
        game_id: &str,
        creator: &str,
        current_turn: &str,
        auth_token: Option<String>,
    ) {
        let records = self.records.clone();
        let game_id = game_id.to_string();
        let creator = creator.to_string();
        let current_turn = current_turn.to_string();
        tokio::spawn(async move {
            if let Err(err) = records
                .record_start(&game_id, &creator, &current_turn, auth_token.as_deref())
                .await
            {
                warn!(%game_id, error = %err, "record store start write failed");
            }
        });
    }

    /// Best-effort durable record of a finish; never blocks or reverses the
    /// already-applied in-memory transition.
    pub(super) fn spawn_record_finish(
        &self,
        game_id: &str,
        winner: &str,
        score: i64,
        guesses: Vec<GuessRecord>,
        auth_token: Option<String>,
    ) {
        let records = self.records.clone();
        let game_id = game_id.to_string();
        let winner = winner.to_string();
        tokio::spawn(async move {
            if let Err(err) = records
                .record_finish(&game_id, &winner, score, &guesses, auth_token.as_deref())
                .await
            {
                warn!(%game_id, error = %err, "record store finish write failed");
            }
        });
    }
}
