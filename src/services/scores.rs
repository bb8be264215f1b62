// src/services/scores.rs

use async_trait::async_trait;
use sqlx::SqlitePool;

use crate::models::score::{ScoreRecord, ScoreSubmission};

#[derive(Debug, thiserror::Error)]
pub enum ScoreStoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// External collaborator that keeps final quiz scores.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    async fn submit(&self, submission: &ScoreSubmission) -> Result<(), ScoreStoreError>;

    /// Most recent scores first.
    async fn recent(&self, limit: i64) -> Result<Vec<ScoreRecord>, ScoreStoreError>;
}

/// Stores scores in the `quiz_scores` table.
#[derive(Debug, Clone)]
pub struct SqliteScoreStore {
    pool: SqlitePool,
}

impl SqliteScoreStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ScoreStore for SqliteScoreStore {
    async fn submit(&self, submission: &ScoreSubmission) -> Result<(), ScoreStoreError> {
        sqlx::query(
            r#"
            INSERT INTO quiz_scores (session_id, score, total, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(submission.session_id.as_str())
        .bind(i64::from(submission.score))
        .bind(i64::from(submission.total))
        .bind(chrono::Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn recent(&self, limit: i64) -> Result<Vec<ScoreRecord>, ScoreStoreError> {
        let records = sqlx::query_as::<_, ScoreRecord>(
            r#"
            SELECT id, session_id, score, total, created_at
            FROM quiz_scores
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
