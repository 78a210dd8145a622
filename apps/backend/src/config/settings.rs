use std::env;
use std::time::Duration;

use crate::error::AppError;

/// How long an idle turn may last before it auto-advances.
pub const DEFAULT_TURN_TIMEOUT_SECS: u64 = 20;

/// How long a finished session lingers in the registry before eviction,
/// giving late subscribers a window to read the final state.
pub const DEFAULT_FINISHED_LINGER_SECS: u64 = 60;

/// Runtime configuration, sourced from environment variables.
///
/// Environment variables must be set by the runtime environment:
/// - Docker: set via docker-compose env_file or docker run --env-file
/// - Local dev: source env files manually (e.g., set -a; . ./.env; set +a)
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    /// Base URL of the item catalog (random priced products).
    pub item_api_base_url: String,
    /// Base URL of the game record store.
    pub game_api_base_url: String,
    pub turn_timeout: Duration,
    pub finished_linger: Duration,
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        let host = env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("BACKEND_PORT")
            .unwrap_or_else(|_| "3001".to_string())
            .parse::<u16>()
            .map_err(|e| AppError::config(format!("BACKEND_PORT must be a valid port: {e}")))?;

        let item_api_base_url = env::var("ITEM_API_BASE_URL")
            .unwrap_or_else(|_| "https://fakestoreapi.com".to_string());
        let game_api_base_url =
            env::var("GAME_API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let turn_timeout = duration_from_env("TURN_TIMEOUT_SECS", DEFAULT_TURN_TIMEOUT_SECS)?;
        let finished_linger =
            duration_from_env("FINISHED_LINGER_SECS", DEFAULT_FINISHED_LINGER_SECS)?;

        Ok(Self {
            host,
            port,
            item_api_base_url,
            game_api_base_url,
            turn_timeout,
            finished_linger,
        })
    }
}

fn duration_from_env(key: &str, default_secs: u64) -> Result<Duration, AppError> {
    match env::var(key) {
        Ok(raw) => raw
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|e| AppError::config(format!("{key} must be a number of seconds: {e}"))),
        Err(_) => Ok(Duration::from_secs(default_secs)),
    }
}
