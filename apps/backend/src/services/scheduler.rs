use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::domain::session::GameId;

/// Emitted when a turn countdown runs out. The generation lets the
/// coordinator drop expiries that lost a race against a guess that
/// re-armed (or cancelled) the timer after this one fired.
#[derive(Debug)]
pub struct DeadlineExpiry {
    pub game_id: GameId,
    pub generation: u64,
}

struct ArmedTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

/// Owns the per-session turn countdowns. At most one countdown is active
/// per game id: arming always cancels the previous one first.
///
/// Expiries are not acted on here; they are pushed into a channel that a
/// single coordinator pump consumes, so timer callbacks never touch
/// session state directly.
pub struct TurnScheduler {
    timers: DashMap<GameId, ArmedTimer>,
    expiry_tx: mpsc::UnboundedSender<DeadlineExpiry>,
    next_generation: AtomicU64,
}

impl TurnScheduler {
    pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<DeadlineExpiry>) {
        let (expiry_tx, expiry_rx) = mpsc::unbounded_channel();
        let scheduler = Arc::new(Self {
            timers: DashMap::new(),
            expiry_tx,
            next_generation: AtomicU64::new(1),
        });
        (scheduler, expiry_rx)
    }

    /// Start (or restart) the countdown for a game. Returns the generation
    /// the new countdown will report on expiry.
    pub fn arm(&self, game_id: &str, duration: Duration) -> u64 {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let tx = self.expiry_tx.clone();
        let expiry_game_id = game_id.to_string();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(duration).await;
            // Receiver gone means the process is shutting down.
            let _ = tx.send(DeadlineExpiry {
                game_id: expiry_game_id,
                generation,
            });
        });

        if let Some(previous) = self.timers.insert(
            game_id.to_string(),
            ArmedTimer {
                generation,
                handle,
            },
        ) {
            previous.handle.abort();
        }
        debug!(game_id, generation, "turn deadline armed");
        generation
    }

    /// Cancel any active countdown. Idempotent; a no-op if none is armed.
    pub fn cancel(&self, game_id: &str) {
        if let Some((_, timer)) = self.timers.remove(game_id) {
            timer.handle.abort();
            debug!(game_id, generation = timer.generation, "turn deadline cancelled");
        }
    }

    /// Consume the armed countdown if (and only if) it still matches the
    /// expired generation. A false return means the expiry is stale: the
    /// turn already advanced through a guess or a newer deadline.
    pub fn claim(&self, game_id: &str, generation: u64) -> bool {
        self.timers
            .remove_if(game_id, |_, timer| timer.generation == generation)
            .is_some()
    }

    pub fn is_armed(&self, game_id: &str) -> bool {
        self.timers.contains_key(game_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::timeout;

    const EXPIRY_WAIT: Duration = Duration::from_secs(2);

    #[tokio::test]
    async fn armed_timer_expires_and_is_claimable_once() {
        let (scheduler, mut expiry_rx) = TurnScheduler::new();
        let generation = scheduler.arm("g1", Duration::from_millis(20));

        let expiry = timeout(EXPIRY_WAIT, expiry_rx.recv())
            .await
            .expect("deadline should fire")
            .expect("channel open");
        assert_eq!(expiry.game_id, "g1");
        assert_eq!(expiry.generation, generation);

        assert!(scheduler.claim("g1", generation));
        assert!(!scheduler.claim("g1", generation));
        assert!(!scheduler.is_armed("g1"));
    }

    #[tokio::test]
    async fn cancel_prevents_expiry() {
        let (scheduler, mut expiry_rx) = TurnScheduler::new();
        scheduler.arm("g1", Duration::from_millis(50));
        scheduler.cancel("g1");
        assert!(!scheduler.is_armed("g1"));

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(expiry_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn cancel_without_an_armed_timer_is_a_noop() {
        let (scheduler, _expiry_rx) = TurnScheduler::new();
        scheduler.cancel("g1");
        scheduler.cancel("g1");
    }

    #[tokio::test]
    async fn rearming_invalidates_the_previous_generation() {
        let (scheduler, mut expiry_rx) = TurnScheduler::new();
        let first = scheduler.arm("g1", Duration::from_millis(20));
        let second = scheduler.arm("g1", Duration::from_millis(20));
        assert_ne!(first, second);

        let expiry = timeout(EXPIRY_WAIT, expiry_rx.recv())
            .await
            .expect("second deadline should fire")
            .expect("channel open");
        assert_eq!(expiry.generation, second);

        // A stale expiry from the first arm can never be claimed.
        assert!(!scheduler.claim("g1", first));
        assert!(scheduler.claim("g1", second));
    }

    #[tokio::test]
    async fn timers_for_distinct_games_are_independent() {
        let (scheduler, mut expiry_rx) = TurnScheduler::new();
        scheduler.arm("g1", Duration::from_millis(20));
        scheduler.arm("g2", Duration::from_millis(20));
        scheduler.cancel("g1");

        let expiry = timeout(EXPIRY_WAIT, expiry_rx.recv())
            .await
            .expect("g2 deadline should fire")
            .expect("channel open");
        assert_eq!(expiry.game_id, "g2");
    }
}
