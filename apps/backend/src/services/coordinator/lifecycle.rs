use tracing::{debug, info, warn};
use uuid::Uuid;

use super::SessionCoordinator;
use crate::domain::session::{GameStatus, Session, MAX_PLAYERS};
use crate::ws::protocol::ServerMsg;

impl SessionCoordinator {
    /// Handle a join event. Creates the session on first contact with an
    /// unknown game id; re-joins and spectator joins resync without
    /// touching the roster.
    pub async fn join_game(&self, game_id: &str, participant: &str, conn_id: Uuid) {
        let handle = self.registry.get_or_create(game_id);
        // Subscribe the socket before inspecting the roster so late
        // subscribers see every broadcast from here on.
        self.hub.join_topic(game_id, conn_id);

        let mut session = handle.lock().await;
        use crate::domain::session::JoinOutcome;
        match session.try_join(participant) {
            JoinOutcome::Joined => {
                self.registry.index_participant(participant, game_id);
                info!(%game_id, participant_id = %participant, "player joined");
                self.hub.broadcast(
                    game_id,
                    &ServerMsg::PlayerJoined {
                        participant_id: participant.to_string(),
                    },
                );
                self.hub.broadcast(
                    game_id,
                    &ServerMsg::PlayersUpdate {
                        players: session.players.clone(),
                    },
                );
            }
            JoinOutcome::AlreadyPresent => {
                debug!(%game_id, participant_id = %participant, "rejoin, resync only");
            }
            JoinOutcome::Full => {
                debug!(%game_id, participant_id = %participant, "join refused, game full");
            }
        }

        if let Some(creator) = session.creator() {
            self.hub.send_to(
                conn_id,
                ServerMsg::IsGameCreator {
                    creator_id: creator.clone(),
                },
            );
        }

        // Late subscribers to a running game get the current state replayed
        // on their own socket only, including the feedback for the standing
        // guess so a reconnect does not lose the hint.
        if session.status == GameStatus::InProgress {
            if let (Some(item), Some(current_turn)) = (&session.item, &session.current_turn) {
                self.hub.send_to(
                    conn_id,
                    ServerMsg::GameStarted {
                        item: item.clone(),
                        current_turn: current_turn.clone(),
                        last_guess: session.last_guess,
                    },
                );
            }
            if let (Some(last_guess), Some(hint)) = (session.last_guess, session.last_hint) {
                self.hub.send_to(
                    conn_id,
                    ServerMsg::GameUpdate {
                        last_guess,
                        proximity_hint: hint,
                    },
                );
            }
        }
    }

    /// Handle a start event from the session creator.
    ///
    /// The item fetch happens outside the session lock; the start
    /// conditions are revalidated after re-acquiring it, so a concurrent
    /// start or disconnect observed meanwhile wins cleanly.
    pub async fn start_game(&self, game_id: &str, requester: &str, auth_token: Option<String>) {
        let handle = match self.registry.get(game_id) {
            Ok(handle) => handle,
            Err(_) => {
                debug!(%game_id, "start for unknown game dropped");
                return;
            }
        };

        {
            let session = handle.lock().await;
            if !can_start(&session, requester) {
                debug!(%game_id, requester = %requester, "start conditions not met, dropped");
                return;
            }
        }

        let item = match self.items.fetch_random_item().await {
            Ok(item) => item,
            Err(err) => {
                warn!(%game_id, error = %err, "item fetch failed, game not started");
                self.hub.broadcast(
                    game_id,
                    &ServerMsg::GameError {
                        message: "Failed to start the game".to_string(),
                    },
                );
                return;
            }
        };

        let mut session = handle.lock().await;
        if !can_start(&session, requester) {
            debug!(%game_id, "state changed during item fetch, start dropped");
            return;
        }

        session.item = Some(item.clone());
        session.status = GameStatus::InProgress;
        session.current_turn = Some(requester.to_string());
        session.round = 1;
        info!(%game_id, current_turn = %requester, price = item.price, "game started");

        self.hub.broadcast(
            game_id,
            &ServerMsg::GameStarted {
                item,
                current_turn: requester.to_string(),
                last_guess: None,
            },
        );
        self.hub.broadcast(
            game_id,
            &ServerMsg::TurnUpdate {
                current_turn: requester.to_string(),
            },
        );
        self.scheduler.arm(game_id, self.turn_timeout);
        drop(session);

        self.spawn_record_start(game_id, requester, requester, auth_token);
    }
}

fn can_start(session: &Session, requester: &str) -> bool {
    session.status == GameStatus::WaitingForPlayers
        && session.players.len() == MAX_PLAYERS
        && session.creator().map(String::as_str) == Some(requester)
}
