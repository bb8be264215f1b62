// src/config.rs

use std::env;
use std::time::Duration;

use dotenvy::dotenv;
use url::Url;

/// Number of questions the generation service is asked to produce.
pub const EXPECTED_QUESTION_COUNT: usize = 5;

/// Upper bound on submitted story length, in characters.
pub const MAX_STORY_LENGTH: u64 = 20_000;

/// How many rows the score history endpoint returns.
pub const HISTORY_LIMIT: i64 = 5;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} is invalid: {message}")]
    Invalid { name: &'static str, message: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub generation_url: Url,
    pub generation_token: Option<String>,
    pub generation_timeout: Duration,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();

        let generation_url = env::var("GENERATION_URL")
            .map_err(|_| ConfigError::Missing("GENERATION_URL"))?;
        let generation_url = Url::parse(&generation_url).map_err(|e| ConfigError::Invalid {
            name: "GENERATION_URL",
            message: e.to_string(),
        })?;

        let generation_token = env::var("GENERATION_TOKEN")
            .ok()
            .filter(|token| !token.trim().is_empty());

        let generation_timeout = match env::var("GENERATION_TIMEOUT_SECS") {
            Ok(raw) => Duration::from_secs(raw.parse().map_err(|_| ConfigError::Invalid {
                name: "GENERATION_TIMEOUT_SECS",
                message: format!("'{}' is not a number of seconds", raw),
            })?),
            Err(_) => Duration::from_secs(60),
        };

        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://story_quiz.db?mode=rwc".to_string());

        let port = match env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                message: format!("'{}' is not a port number", raw),
            })?,
            Err(_) => 7000,
        };

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            database_url,
            generation_url,
            generation_token,
            generation_timeout,
            port,
            rust_log,
        })
    }
}
