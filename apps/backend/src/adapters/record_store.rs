use async_trait::async_trait;
use serde::Serialize;

use crate::domain::session::GuessRecord;
use crate::error::AppError;

/// Durable record of game lifecycle transitions. Both calls are
/// fire-and-forget from the coordinator's perspective: failures are
/// logged, never propagated, and never roll back in-memory state.
#[async_trait]
pub trait GameRecordStore: Send + Sync {
    async fn record_start(
        &self,
        game_id: &str,
        creator: &str,
        current_turn: &str,
        auth_token: Option<&str>,
    ) -> Result<(), AppError>;

    async fn record_finish(
        &self,
        game_id: &str,
        winner: &str,
        score: i64,
        guesses: &[GuessRecord],
        auth_token: Option<&str>,
    ) -> Result<(), AppError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StartBody<'a> {
    user_id: &'a str,
    status: &'static str,
    current_turn: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FinishBody<'a> {
    user_id: &'a str,
    score: i64,
    winner: &'a str,
    guesses: &'a [GuessRecord],
}

/// HTTP record store: PATCHes the game service with the connection's
/// bearer token.
pub struct HttpRecordStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRecordStore {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn patch<B: Serialize>(
        &self,
        path: String,
        body: &B,
        auth_token: Option<&str>,
    ) -> Result<(), AppError> {
        let mut request = self
            .client
            .patch(format!("{}{}", self.base_url, path))
            .json(body);
        if let Some(token) = auth_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(AppError::upstream(format!(
                "record store returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl GameRecordStore for HttpRecordStore {
    async fn record_start(
        &self,
        game_id: &str,
        creator: &str,
        current_turn: &str,
        auth_token: Option<&str>,
    ) -> Result<(), AppError> {
        let body = StartBody {
            user_id: creator,
            status: "started",
            current_turn,
        };
        self.patch(format!("/game/start/{game_id}"), &body, auth_token)
            .await
    }

    async fn record_finish(
        &self,
        game_id: &str,
        winner: &str,
        score: i64,
        guesses: &[GuessRecord],
        auth_token: Option<&str>,
    ) -> Result<(), AppError> {
        let body = FinishBody {
            user_id: winner,
            score,
            winner,
            guesses,
        };
        self.patch(format!("/game/finish/{game_id}"), &body, auth_token)
            .await
    }
}
