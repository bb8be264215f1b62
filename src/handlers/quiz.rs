// src/handlers/quiz.rs

use std::sync::Arc;

use axum::{Json, extract::State, response::IntoResponse};
use validator::Validate;

use crate::{
    config::HISTORY_LIMIT,
    error::AppError,
    models::quiz_request::{AnswerRequest, StoryRequest},
    quiz::SessionHandle,
    services::scores::ScoreStore,
};

/// Returns the current quiz session as a `QuizView`.
pub async fn get_quiz(State(session): State<SessionHandle>) -> Result<impl IntoResponse, AppError> {
    let view = session.snapshot().await?;
    Ok(Json(view))
}

/// Submits a story and generates a new quiz from it.
///
/// * Rejects blank or oversized stories with 400.
/// * Waits for the generation service; the previous quiz is discarded.
/// * Returns 401 with `login_required` when the service answers with
///   something other than JSON.
pub async fn submit_story(
    State(session): State<SessionHandle>,
    Json(payload): Json<StoryRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let view = session.submit_story(payload.text).await?;
    Ok(Json(view))
}

/// Answers one question. Each question accepts only its first answer.
pub async fn answer_question(
    State(session): State<SessionHandle>,
    Json(payload): Json<AnswerRequest>,
) -> Result<impl IntoResponse, AppError> {
    let view = session
        .select_option(payload.question, payload.option)
        .await?;
    Ok(Json(view))
}

/// Clears all answers so the same quiz can be retaken.
pub async fn reset_quiz(State(session): State<SessionHandle>) -> Result<impl IntoResponse, AppError> {
    let view = session.reset().await?;
    Ok(Json(view))
}

/// Retrieves the most recently saved scores.
pub async fn get_history(
    State(scores): State<Arc<dyn ScoreStore>>,
) -> Result<impl IntoResponse, AppError> {
    let records = scores.recent(HISTORY_LIMIT).await.map_err(|e| {
        tracing::error!("Failed to fetch score history: {:?}", e);
        AppError::from(e)
    })?;

    Ok(Json(records))
}
