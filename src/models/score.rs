// src/models/score.rs

use std::fmt;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Opaque identifier handed out by the generation service.
///
/// The service may send it as a JSON string or number; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "RawSessionId", into = "String")]
pub struct SessionId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSessionId {
    Number(i64),
    Text(String),
}

impl From<RawSessionId> for SessionId {
    fn from(raw: RawSessionId) -> Self {
        match raw {
            RawSessionId::Number(n) => SessionId(n.to_string()),
            RawSessionId::Text(s) => SessionId(s),
        }
    }
}

impl From<SessionId> for String {
    fn from(id: SessionId) -> Self {
        id.0
    }
}

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Final score of a completed quiz, sent to the score store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreSubmission {
    pub session_id: SessionId,
    pub score: u32,
    pub total: u32,
}

/// Represents the 'quiz_scores' table in the database.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScoreRecord {
    pub id: i64,
    pub session_id: String,
    pub score: i64,
    pub total: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
}
