// src/services/generation.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{config::Config, models::score::SessionId};

/// Story text sent to the generation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub story: String,
}

/// Raw quiz text plus the identifier to report the final score against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub payload: String,
    pub session_id: Option<SessionId>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// The response was not structured data, which means the service served
    /// a login page instead of a result.
    #[error("generation service did not return structured data")]
    AuthRequired,

    #[error("{0}")]
    Failed(String),

    #[error("generation service unavailable: {0}")]
    Unavailable(String),
}

/// External collaborator that turns a story into summary + quiz text.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, GenerationError>;
}

#[derive(Serialize)]
struct GenerateBody<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateSuccess {
    result: String,
    #[serde(default)]
    quiz_id: Option<SessionId>,
}

#[derive(Deserialize)]
struct GenerateFailure {
    #[serde(default)]
    error: Option<String>,
}

/// Talks to the generation service over HTTP with a JSON body.
#[derive(Debug, Clone)]
pub struct HttpGenerationService {
    client: reqwest::Client,
    url: Url,
    token: Option<String>,
}

impl HttpGenerationService {
    pub fn new(url: Url, token: Option<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client, url, token })
    }

    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Self::new(
            config.generation_url.clone(),
            config.generation_token.clone(),
            config.generation_timeout,
        )
    }
}

#[async_trait]
impl GenerationService for HttpGenerationService {
    async fn generate(
        &self,
        request: &GenerationRequest,
    ) -> Result<GenerationResult, GenerationError> {
        let mut builder = self.client.post(self.url.clone()).json(&GenerateBody {
            text: &request.story,
        });
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| GenerationError::Unavailable(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GenerationError::Unavailable(e.to_string()))?;

        classify_response(status, &body)
    }
}

/// Maps a raw HTTP response onto the generation outcome.
///
/// A body that is not JSON at all is always `AuthRequired`, whatever the status.
fn classify_response(status: StatusCode, body: &str) -> Result<GenerationResult, GenerationError> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|_| {
        tracing::warn!("Generation service returned non-JSON body (status {})", status);
        GenerationError::AuthRequired
    })?;

    if status.is_success() {
        let success: GenerateSuccess = serde_json::from_value(value).map_err(|e| {
            GenerationError::Failed(format!("unexpected response from generation service: {}", e))
        })?;
        return Ok(GenerationResult {
            payload: success.result,
            session_id: success.quiz_id,
        });
    }

    let message = serde_json::from_value::<GenerateFailure>(value)
        .ok()
        .and_then(|f| f.error)
        .unwrap_or_else(|| format!("Failed to generate quiz (status {})", status));
    Err(GenerationError::Failed(message))
}
