// src/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::{quiz::QuizError, services::scores::ScoreStoreError};

/// Global Application Error Enum.
/// Centralizes error handling and mapping to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    // 500 Internal Server Error
    InternalServerError(String),

    // 400 Bad Request
    BadRequest(String),

    // 401 Unauthorized, client should show a login prompt
    LoginRequired(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (e.g., quiz still generating)
    Conflict(String),

    // 502 Bad Gateway (generation service failed or sent a broken quiz)
    UpstreamError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

/// Implements `IntoResponse` for `AppError`.
/// Converts the error into a JSON response with appropriate HTTP status code.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::LoginRequired(msg) => {
                let body = Json(json!({
                    "error": msg,
                    "login_required": true,
                }));
                return (StatusCode::UNAUTHORIZED, body).into_response();
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::UpstreamError(msg) => {
                tracing::warn!("Upstream error: {}", msg);
                (StatusCode::BAD_GATEWAY, msg)
            }
        };
        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

/// Translates quiz session failures into user-facing responses.
impl From<QuizError> for AppError {
    fn from(err: QuizError) -> Self {
        let msg = err.to_string();
        match err {
            QuizError::EmptyStory => AppError::BadRequest(msg),
            QuizError::LoginRequired => AppError::LoginRequired(msg),
            QuizError::Generation(_) | QuizError::Parse(_) => AppError::UpstreamError(msg),
            QuizError::GenerationInProgress
            | QuizError::NoPendingGeneration
            | QuizError::NoActiveQuiz => AppError::Conflict(msg),
            QuizError::QuestionOutOfRange { .. } => AppError::NotFound(msg),
            QuizError::SessionClosed => AppError::InternalServerError(msg),
        }
    }
}

impl From<ScoreStoreError> for AppError {
    fn from(err: ScoreStoreError) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}
