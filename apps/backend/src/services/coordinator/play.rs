use tracing::{debug, error, info};

use super::SessionCoordinator;
use crate::domain::evaluate::evaluate;
use crate::domain::scoring::final_score;
use crate::domain::session::{GameStatus, GuessRecord, Session};
use crate::ws::protocol::{FinishReason, ServerMsg};

impl SessionCoordinator {
    /// Handle a guess. Anything out of turn, duplicated, or aimed at a
    /// finished game is a silent no-op: stale events from a losing race
    /// are expected and must not surface errors.
    pub async fn make_guess(
        &self,
        game_id: &str,
        participant: &str,
        guess: f64,
        auth_token: Option<String>,
    ) {
        let handle = match self.registry.get(game_id) {
            Ok(handle) => handle,
            Err(_) => {
                debug!(%game_id, "guess for unknown game dropped");
                return;
            }
        };

        let mut session = handle.lock().await;
        if !session.in_progress() || session.current_turn.as_deref() != Some(participant) {
            debug!(%game_id, participant_id = %participant, "guess out of turn, dropped");
            return;
        }

        self.scheduler.cancel(game_id);
        session
            .guess_history
            .push(GuessRecord::now(participant.to_string(), guess));

        let Some(price) = session.item.as_ref().map(|item| item.price) else {
            error!(%game_id, "in-progress session without an item");
            return;
        };
        let evaluation = evaluate(guess, price);

        if evaluation.won {
            session.winner = Some(participant.to_string());
            session.status = GameStatus::Finished;
            let score = final_score(&session.guess_history, participant);
            info!(%game_id, winner = %participant, score, "winning guess");

            self.hub.broadcast(
                game_id,
                &ServerMsg::GameFinished {
                    winner: participant.to_string(),
                    final_price: Some(price),
                    score: Some(score),
                    reason: None,
                },
            );

            let guesses = session.guess_history.clone();
            drop(session);
            self.spawn_record_finish(game_id, participant, score, guesses, auth_token);
            self.schedule_eviction(game_id);
        } else {
            let Some(next) = session.advance_turn() else {
                error!(%game_id, "turn holder missing from roster");
                return;
            };
            session.last_guess = Some(guess);
            session.last_hint = Some(evaluation.hint);
            debug!(%game_id, guess, hint = ?evaluation.hint, next_turn = %next, "guess missed");

            self.hub.broadcast(
                game_id,
                &ServerMsg::GameUpdate {
                    last_guess: guess,
                    proximity_hint: evaluation.hint,
                },
            );
            self.hub.broadcast(
                game_id,
                &ServerMsg::TurnUpdate { current_turn: next },
            );
            self.scheduler.arm(game_id, self.turn_timeout);
        }
    }

    /// Client-initiated timeout event. Goes through the same validated
    /// advancement as a server-side deadline expiry.
    pub async fn timeout_turn(&self, game_id: &str) {
        let handle = match self.registry.get(game_id) {
            Ok(handle) => handle,
            Err(_) => {
                debug!(%game_id, "timeout for unknown game dropped");
                return;
            }
        };
        let mut session = handle.lock().await;
        self.advance_on_timeout(game_id, &mut session);
    }

    /// Server-side deadline expiry. The generation check drops expiries
    /// that lost a race against a guess or a newer deadline, so one turn
    /// can never double-advance.
    ///
    /// The claim happens under the session lock: every arm and cancel also
    /// runs under that lock, so an expiry that lost the race to a guess
    /// always observes the cancelled (or re-armed) timer and drops out.
    pub(super) async fn expire_deadline(&self, game_id: &str, generation: u64) {
        let handle = match self.registry.get(game_id) {
            Ok(handle) => handle,
            Err(_) => return,
        };
        let mut session = handle.lock().await;
        if !self.scheduler.claim(game_id, generation) {
            debug!(%game_id, generation, "stale deadline expiry dropped");
            return;
        }
        self.advance_on_timeout(game_id, &mut session);
    }

    /// Advance the turn without a guess: no history entry, no `gameUpdate`,
    /// only `turnUpdate`, then a fresh deadline.
    fn advance_on_timeout(&self, game_id: &str, session: &mut Session) {
        if !session.in_progress() {
            debug!(%game_id, "timeout on inactive session dropped");
            return;
        }
        self.scheduler.cancel(game_id);
        let Some(next) = session.advance_turn() else {
            error!(%game_id, "turn holder missing from roster");
            return;
        };
        info!(%game_id, next_turn = %next, round = session.round, "turn timed out");

        self.hub.broadcast(
            game_id,
            &ServerMsg::TurnUpdate { current_turn: next },
        );
        self.scheduler.arm(game_id, self.turn_timeout);
    }

    /// Resolve a participant disconnect across every session they play in.
    /// Mid-game, the remaining player wins by forfeit; before start, the
    /// roster shrinks and an emptied session is dropped immediately.
    pub async fn disconnect(&self, participant: &str) {
        for game_id in self.registry.games_for(participant) {
            let Ok(handle) = self.registry.get(&game_id) else {
                continue;
            };
            let mut session = handle.lock().await;
            info!(game_id = %game_id, participant_id = %participant, "player left");
            self.hub.broadcast(
                &game_id,
                &ServerMsg::PlayerLeft {
                    participant_id: participant.to_string(),
                },
            );

            match session.status {
                GameStatus::InProgress if session.winner.is_none() => {
                    self.scheduler.cancel(&game_id);
                    let remaining = session
                        .players
                        .iter()
                        .find(|p| p.as_str() != participant)
                        .cloned();
                    if let Some(winner) = remaining {
                        session.winner = Some(winner.clone());
                        session.status = GameStatus::Finished;
                        info!(game_id = %game_id, winner = %winner, "game finished by disconnect");

                        self.hub.broadcast(
                            &game_id,
                            &ServerMsg::GameFinished {
                                winner: winner.clone(),
                                final_price: None,
                                score: None,
                                reason: Some(FinishReason::Disconnect),
                            },
                        );

                        let score = final_score(&session.guess_history, &winner);
                        let guesses = session.guess_history.clone();
                        drop(session);
                        self.spawn_record_finish(&game_id, &winner, score, guesses, None);
                        self.schedule_eviction(&game_id);
                    }
                }
                GameStatus::WaitingForPlayers => {
                    session.players.retain(|p| p != participant);
                    if session.players.is_empty() {
                        drop(session);
                        self.scheduler.cancel(&game_id);
                        self.hub.drop_topic(&game_id);
                        self.registry.remove(&game_id);
                        debug!(game_id = %game_id, "empty waiting session removed");
                    } else {
                        self.hub.broadcast(
                            &game_id,
                            &ServerMsg::PlayersUpdate {
                                players: session.players.clone(),
                            },
                        );
                    }
                }
                _ => {}
            }
        }
        self.registry.forget_participant(participant);
    }
}
