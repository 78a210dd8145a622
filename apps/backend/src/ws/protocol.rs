use serde::{Deserialize, Serialize};

use crate::domain::evaluate::ProximityHint;
use crate::domain::session::{GameId, Item, ParticipantId};

/// Client-to-server events. Tagged JSON, event names matching the
/// original socket protocol (`{"type": "joinGame", ...}`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMsg {
    #[serde(rename_all = "camelCase")]
    JoinGame {
        game_id: GameId,
        participant_id: ParticipantId,
    },
    #[serde(rename_all = "camelCase")]
    StartGame { game_id: GameId },
    #[serde(rename_all = "camelCase")]
    MakeGuess {
        game_id: GameId,
        guess: f64,
        participant_id: ParticipantId,
        #[serde(default)]
        auth_token: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    TimeoutTurn { game_id: GameId },
}

/// Why a game finished without a winning guess.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FinishReason {
    Disconnect,
}

/// Server-to-client events.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMsg {
    #[serde(rename_all = "camelCase")]
    PlayerJoined { participant_id: ParticipantId },

    #[serde(rename_all = "camelCase")]
    IsGameCreator { creator_id: ParticipantId },

    #[serde(rename_all = "camelCase")]
    PlayersUpdate { players: Vec<ParticipantId> },

    #[serde(rename_all = "camelCase")]
    GameStarted {
        item: Item,
        current_turn: ParticipantId,
        /// Present only on late-joiner resync.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        last_guess: Option<f64>,
    },

    #[serde(rename_all = "camelCase")]
    TurnUpdate { current_turn: ParticipantId },

    #[serde(rename_all = "camelCase")]
    GameUpdate {
        last_guess: f64,
        proximity_hint: ProximityHint,
    },

    #[serde(rename_all = "camelCase")]
    GameFinished {
        winner: ParticipantId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        final_price: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        score: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<FinishReason>,
    },

    #[serde(rename_all = "camelCase")]
    PlayerLeft { participant_id: ParticipantId },

    #[serde(rename_all = "camelCase")]
    GameError { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn join_game_parses_from_wire_shape() {
        let raw = r#"{"type":"joinGame","gameId":"g1","participantId":"p1"}"#;
        let msg: ClientMsg = serde_json::from_str(raw).unwrap();
        match msg {
            ClientMsg::JoinGame {
                game_id,
                participant_id,
            } => {
                assert_eq!(game_id, "g1");
                assert_eq!(participant_id, "p1");
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn make_guess_auth_token_is_optional() {
        let raw = r#"{"type":"makeGuess","gameId":"g1","guess":19.99,"participantId":"p2"}"#;
        let msg: ClientMsg = serde_json::from_str(raw).unwrap();
        match msg {
            ClientMsg::MakeGuess {
                guess, auth_token, ..
            } => {
                assert_eq!(guess, 19.99);
                assert!(auth_token.is_none());
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[test]
    fn game_update_serializes_hint_as_phrase() {
        let msg = ServerMsg::GameUpdate {
            last_guess: 25.0,
            proximity_hint: ProximityHint::VeryClose,
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "gameUpdate",
                "lastGuess": 25.0,
                "proximityHint": "very close",
            })
        );
    }

    #[test]
    fn game_finished_omits_absent_fields() {
        let msg = ServerMsg::GameFinished {
            winner: "p2".to_string(),
            final_price: None,
            score: None,
            reason: Some(FinishReason::Disconnect),
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "gameFinished",
                "winner": "p2",
                "reason": "disconnect",
            })
        );
    }

    #[test]
    fn game_started_resync_carries_last_guess() {
        let msg = ServerMsg::GameStarted {
            item: Item {
                name: "lamp".to_string(),
                image_url: "https://example.test/lamp.png".to_string(),
                price: 19.99,
            },
            current_turn: "p1".to_string(),
            last_guess: Some(25.0),
        };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "gameStarted");
        assert_eq!(value["item"]["imageUrl"], "https://example.test/lamp.png");
        assert_eq!(value["lastGuess"], 25.0);
    }
}
