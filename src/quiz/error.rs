// src/quiz/error.rs

use crate::{quiz::parser::ParseAnomaly, services::generation::GenerationError};

/// Failures of a quiz session event.
///
/// None of these are fatal: the session stays ready for a new story.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizError {
    #[error("Please enter a story first!")]
    EmptyStory,

    #[error("A quiz is already being generated")]
    GenerationInProgress,

    #[error("No quiz generation is pending")]
    NoPendingGeneration,

    #[error("You need to log in first to use the Summarize & Quiz feature!")]
    LoginRequired,

    #[error("Failed to generate quiz: {0}")]
    Generation(String),

    #[error("Generated quiz is malformed: {0}")]
    Parse(#[from] ParseAnomaly),

    #[error("No quiz is active")]
    NoActiveQuiz,

    #[error("Question {index} does not exist (quiz has {total} questions)")]
    QuestionOutOfRange { index: usize, total: usize },

    #[error("Quiz session is no longer running")]
    SessionClosed,
}

impl From<GenerationError> for QuizError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::AuthRequired => QuizError::LoginRequired,
            GenerationError::Failed(msg) => QuizError::Generation(msg),
            GenerationError::Unavailable(msg) => QuizError::Generation(msg),
        }
    }
}
