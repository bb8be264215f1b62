// src/models/quiz_request.rs

use serde::Deserialize;
use validator::Validate;

use crate::{config::MAX_STORY_LENGTH, models::question::Letter};

/// DTO for submitting a story to generate a quiz from.
#[derive(Debug, Deserialize, Validate)]
pub struct StoryRequest {
    #[validate(
        length(max = MAX_STORY_LENGTH, message = "Story is too long."),
        custom(function = validate_not_blank)
    )]
    pub text: String,
}

/// DTO for answering one question.
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    /// Zero-based question index.
    pub question: usize,
    pub option: Letter,
}

fn validate_not_blank(text: &str) -> Result<(), validator::ValidationError> {
    if text.trim().is_empty() {
        let mut err = validator::ValidationError::new("story_blank");
        err.message = Some("Please enter a story first!".into());
        return Err(err);
    }
    Ok(())
}
