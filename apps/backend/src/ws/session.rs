use std::time::{Duration, Instant};

use actix::prelude::*;
use actix_web::{web, Error, HttpRequest, HttpResponse};
use actix_web_actors::ws;
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::session::ParticipantId;
use crate::state::app_state::AppState;
use crate::ws::protocol::{ClientMsg, ServerMsg};

const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(20);
const CLIENT_TIMEOUT: Duration = Duration::from_secs(40);

#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    /// Opaque auth token, forwarded to the record store as a bearer token.
    pub token: Option<String>,
}

pub async fn upgrade(
    req: HttpRequest,
    stream: web::Payload,
    query: web::Query<ConnectQuery>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, Error> {
    let session = WsSession::new(app_state, query.into_inner().token);
    ws::start(session, &req, stream)
}

pub struct WsSession {
    conn_id: Uuid,
    app_state: web::Data<AppState>,
    auth_token: Option<String>,
    /// Set on the first join from this socket; used on disconnect.
    participant: Option<ParticipantId>,
    last_heartbeat: Instant,
}

impl WsSession {
    fn new(app_state: web::Data<AppState>, auth_token: Option<String>) -> Self {
        Self {
            conn_id: Uuid::new_v4(),
            app_state,
            auth_token,
            participant: None,
            last_heartbeat: Instant::now(),
        }
    }

    fn send_json(ctx: &mut ws::WebsocketContext<Self>, msg: &ServerMsg) {
        match serde_json::to_string(msg) {
            Ok(payload) => ctx.text(payload),
            Err(err) => warn!(error = %err, "[WS SESSION] failed to serialize outbound message"),
        }
    }

    fn send_error_and_close(&self, ctx: &mut ws::WebsocketContext<Self>, message: &str) {
        Self::send_json(
            ctx,
            &ServerMsg::GameError {
                message: message.to_string(),
            },
        );
        ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
        ctx.stop();
    }

    fn start_heartbeat(&mut self, ctx: &mut ws::WebsocketContext<Self>) {
        ctx.run_interval(HEARTBEAT_INTERVAL, |actor, ctx| {
            if Instant::now().duration_since(actor.last_heartbeat) > CLIENT_TIMEOUT {
                warn!(
                    conn_id = %actor.conn_id,
                    "[WS SESSION] heartbeat timed out"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Normal)));
                ctx.stop();
                return;
            }
            ctx.ping(b"keepalive");
        });
    }

    fn dispatch(&mut self, cmd: ClientMsg, ctx: &mut ws::WebsocketContext<Self>) {
        let coordinator = self.app_state.coordinator().clone();
        match cmd {
            ClientMsg::JoinGame {
                game_id,
                participant_id,
            } => {
                if self.participant.is_none() {
                    self.participant = Some(participant_id.clone());
                }
                let conn_id = self.conn_id;
                ctx.spawn(
                    async move {
                        coordinator
                            .join_game(&game_id, &participant_id, conn_id)
                            .await;
                    }
                    .into_actor(self),
                );
            }
            ClientMsg::StartGame { game_id } => {
                let Some(requester) = self.participant.clone() else {
                    debug!(conn_id = %self.conn_id, "[WS SESSION] start before join, dropped");
                    return;
                };
                let auth_token = self.auth_token.clone();
                ctx.spawn(
                    async move {
                        coordinator.start_game(&game_id, &requester, auth_token).await;
                    }
                    .into_actor(self),
                );
            }
            ClientMsg::MakeGuess {
                game_id,
                guess,
                participant_id,
                auth_token,
            } => {
                let auth_token = auth_token.or_else(|| self.auth_token.clone());
                ctx.spawn(
                    async move {
                        coordinator
                            .make_guess(&game_id, &participant_id, guess, auth_token)
                            .await;
                    }
                    .into_actor(self),
                );
            }
            ClientMsg::TimeoutTurn { game_id } => {
                ctx.spawn(
                    async move {
                        coordinator.timeout_turn(&game_id).await;
                    }
                    .into_actor(self),
                );
            }
        }
    }
}

impl Actor for WsSession {
    type Context = ws::WebsocketContext<Self>;

    fn started(&mut self, ctx: &mut Self::Context) {
        info!(conn_id = %self.conn_id, "[WS SESSION] started");

        let (tx, rx) = mpsc::unbounded_channel();
        self.app_state.hub().register_connection(self.conn_id, tx);
        ctx.add_stream(UnboundedReceiverStream::new(rx));

        self.start_heartbeat(ctx);
    }

    fn stopped(&mut self, _ctx: &mut Self::Context) {
        self.app_state.hub().unregister_connection(self.conn_id);
        if let Some(participant) = self.participant.take() {
            let coordinator = self.app_state.coordinator().clone();
            actix::spawn(async move {
                coordinator.disconnect(&participant).await;
            });
        }
        info!(conn_id = %self.conn_id, "[WS SESSION] stopped");
    }
}

/// Outbound half: hub events flow from the connection's channel straight
/// onto the socket, preserving the order the coordinator produced.
impl StreamHandler<ServerMsg> for WsSession {
    fn handle(&mut self, msg: ServerMsg, ctx: &mut Self::Context) {
        Self::send_json(ctx, &msg);
    }
}

impl StreamHandler<Result<ws::Message, ws::ProtocolError>> for WsSession {
    fn handle(&mut self, msg: Result<ws::Message, ws::ProtocolError>, ctx: &mut Self::Context) {
        match msg {
            Ok(ws::Message::Ping(payload)) => {
                self.last_heartbeat = Instant::now();
                ctx.pong(&payload);
            }
            Ok(ws::Message::Pong(_)) => {
                self.last_heartbeat = Instant::now();
            }
            Ok(ws::Message::Text(text)) => {
                self.last_heartbeat = Instant::now();

                let parsed: Result<ClientMsg, _> = serde_json::from_str(&text);
                let Ok(cmd) = parsed else {
                    self.send_error_and_close(ctx, "Malformed JSON");
                    return;
                };
                self.dispatch(cmd, ctx);
            }
            Ok(ws::Message::Binary(_)) => {
                self.last_heartbeat = Instant::now();
                self.send_error_and_close(ctx, "Binary not supported");
            }
            Ok(ws::Message::Close(reason)) => {
                ctx.close(reason);
                ctx.stop();
            }
            Ok(ws::Message::Continuation(_)) | Ok(ws::Message::Nop) => {
                self.last_heartbeat = Instant::now();
            }
            Err(err) => {
                warn!(
                    conn_id = %self.conn_id,
                    error = %err,
                    "[WS SESSION] protocol error"
                );
                ctx.close(Some(ws::CloseReason::from(ws::CloseCode::Error)));
                ctx.stop();
            }
        }
    }
}
