use std::collections::HashSet;

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use crate::domain::session::GameId;
use crate::ws::protocol::ServerMsg;

/// Fan-out hub: maps connections to outbound channels and game ids to the
/// connections subscribed to them.
///
/// Each connection is one FIFO channel, so a sequence of broadcasts made
/// under a session's critical section reaches every subscriber in the
/// order the coordinator produced it.
#[derive(Default)]
pub struct ConnectionHub {
    conns: DashMap<Uuid, mpsc::UnboundedSender<ServerMsg>>,
    topics: DashMap<GameId, HashSet<Uuid>>,
}

impl ConnectionHub {
    pub fn new() -> Self {
        Self {
            conns: DashMap::new(),
            topics: DashMap::new(),
        }
    }

    pub fn register_connection(&self, conn_id: Uuid, tx: mpsc::UnboundedSender<ServerMsg>) {
        self.conns.insert(conn_id, tx);
    }

    /// Drop a connection and remove it from every topic it joined.
    pub fn unregister_connection(&self, conn_id: Uuid) {
        self.conns.remove(&conn_id);
        self.topics.retain(|_, members| {
            members.remove(&conn_id);
            !members.is_empty()
        });
    }

    /// Subscribe a connection to a game's broadcasts.
    pub fn join_topic(&self, game_id: &str, conn_id: Uuid) {
        self.topics
            .entry(game_id.to_string())
            .or_default()
            .insert(conn_id);
    }

    /// Remove a whole topic (on session eviction). Connections stay
    /// registered; they may be subscribed to other games.
    pub fn drop_topic(&self, game_id: &str) {
        self.topics.remove(game_id);
    }

    /// Deliver to a single connection.
    pub fn send_to(&self, conn_id: Uuid, msg: ServerMsg) {
        if let Some(tx) = self.conns.get(&conn_id) {
            if tx.send(msg).is_err() {
                debug!(%conn_id, "dropping message for closed connection");
            }
        }
    }

    /// Deliver to every connection subscribed to the game.
    pub fn broadcast(&self, game_id: &str, msg: &ServerMsg) {
        let Some(members) = self.topics.get(game_id) else {
            return;
        };
        for conn_id in members.iter() {
            if let Some(tx) = self.conns.get(conn_id) {
                if tx.send(msg.clone()).is_err() {
                    debug!(conn_id = %conn_id, game_id, "dropping broadcast for closed connection");
                }
            }
        }
    }

    pub fn connection_count(&self) -> usize {
        self.conns.len()
    }
}
