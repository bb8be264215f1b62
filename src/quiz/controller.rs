// src/quiz/controller.rs

//! Quiz session state machine.
//!
//! `Idle -> Generating -> Ready -> InProgress -> Completed`, with `reset`
//! going back to `Ready` and any generation failure going back to `Idle`.
//! The controller performs no I/O: it hands out a [`GenerationRequest`] when
//! a story is accepted and queues a [`ScoreSubmission`] when the quiz is
//! completed, leaving the actual calls to the session runtime.

use serde::Serialize;

use crate::{
    config::EXPECTED_QUESTION_COUNT,
    models::{
        question::{Letter, Question},
        score::{ScoreSubmission, SessionId},
    },
    quiz::{error::QuizError, model::QuizModel, parser},
    services::generation::{GenerationError, GenerationRequest, GenerationResult},
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No quiz; waiting for a story.
    #[default]
    Idle,
    /// A story was accepted and the generation service is working on it.
    Generating,
    /// A quiz is loaded and nothing has been answered yet.
    Ready,
    InProgress,
    /// Every question has an answer; further answers are ignored.
    Completed,
}

impl SessionPhase {
    /// Returns `true` if a quiz is loaded.
    pub const fn has_quiz(&self) -> bool {
        matches!(self, Self::Ready | Self::InProgress | Self::Completed)
    }
}

/// What the user sees after picking an option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerFeedback {
    pub question: usize,
    pub selected: Letter,
    /// `false` when the question was already answered or the quiz is locked.
    pub accepted: bool,
    pub correct: bool,
    pub correct_letter: Letter,
    pub score: u32,
    pub total: u32,
    pub completed: bool,
}

#[derive(Debug, Default)]
pub struct QuizController {
    phase: SessionPhase,
    model: QuizModel,
    summary: String,
    session_id: Option<SessionId>,
    pending_submission: Option<ScoreSubmission>,
}

impl QuizController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn model(&self) -> &QuizModel {
        &self.model
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn session_id(&self) -> Option<&SessionId> {
        self.session_id.as_ref()
    }

    /// Accepts a story and moves to `Generating`.
    ///
    /// The current quiz, if any, is discarded. Blank stories and submissions
    /// while another generation is outstanding leave the state untouched.
    pub fn submit_story(&mut self, text: &str) -> Result<GenerationRequest, QuizError> {
        let story = text.trim();
        if story.is_empty() {
            return Err(QuizError::EmptyStory);
        }
        if self.phase == SessionPhase::Generating {
            return Err(QuizError::GenerationInProgress);
        }

        self.model = QuizModel::default();
        self.summary.clear();
        self.session_id = None;
        self.pending_submission = None;
        self.phase = SessionPhase::Generating;

        tracing::info!("Story accepted ({} chars), requesting quiz", story.chars().count());
        Ok(GenerationRequest {
            story: story.to_string(),
        })
    }

    /// Applies the generation service's answer.
    pub fn generation_finished(
        &mut self,
        result: Result<GenerationResult, GenerationError>,
    ) -> Result<(), QuizError> {
        if self.phase != SessionPhase::Generating {
            return Err(QuizError::NoPendingGeneration);
        }

        let loaded = result.map_err(QuizError::from).and_then(|generated| {
            let parsed = parser::parse(&generated.payload)?;
            Ok((parsed, generated.session_id))
        });

        match loaded {
            Ok((parsed, session_id)) => {
                if parsed.questions.len() != EXPECTED_QUESTION_COUNT {
                    tracing::warn!(
                        "Generated quiz has {} questions, expected {}",
                        parsed.questions.len(),
                        EXPECTED_QUESTION_COUNT
                    );
                }
                tracing::info!(
                    "Quiz ready with {} questions (session {:?})",
                    parsed.questions.len(),
                    session_id
                );

                self.model.initialize(parsed.questions);
                self.summary = parsed.summary;
                self.session_id = session_id;
                self.phase = SessionPhase::Ready;
                Ok(())
            }
            Err(err) => {
                tracing::warn!("Quiz generation failed: {}", err);
                self.phase = SessionPhase::Idle;
                Err(err)
            }
        }
    }

    /// Records the user's pick for one question.
    pub fn select_option(&mut self, index: usize, letter: Letter) -> Result<AnswerFeedback, QuizError> {
        if !self.phase.has_quiz() {
            return Err(QuizError::NoActiveQuiz);
        }
        let correct_letter = self
            .model
            .questions()
            .get(index)
            .map(Question::correct)
            .ok_or(QuizError::QuestionOutOfRange {
                index,
                total: self.model.len(),
            })?;

        let outcome = self.model.record_answer(index, letter);
        if outcome.was_first_answer {
            if self.model.is_completed() {
                self.phase = SessionPhase::Completed;
                self.queue_score_submission();
            } else {
                self.phase = SessionPhase::InProgress;
            }
        }

        Ok(AnswerFeedback {
            question: index,
            selected: letter,
            accepted: outcome.was_first_answer,
            correct: outcome.was_first_answer && outcome.correct,
            correct_letter,
            score: self.model.score(),
            total: self.model.total(),
            completed: self.model.is_completed(),
        })
    }

    fn queue_score_submission(&mut self) {
        let score = self.model.score();
        let total = self.model.total();
        tracing::info!("Quiz completed with score {}/{}", score, total);

        match &self.session_id {
            Some(session_id) => {
                self.pending_submission = Some(ScoreSubmission {
                    session_id: session_id.clone(),
                    score,
                    total,
                });
            }
            None => tracing::debug!("No session id, score will not be saved"),
        }
    }

    /// Hands out the score submission queued by the last completion, once.
    pub fn take_score_submission(&mut self) -> Option<ScoreSubmission> {
        self.pending_submission.take()
    }

    /// Makes the loaded quiz answerable again.
    pub fn reset(&mut self) -> Result<(), QuizError> {
        match self.phase {
            SessionPhase::Idle | SessionPhase::Generating => Err(QuizError::NoActiveQuiz),
            SessionPhase::Ready => Ok(()),
            SessionPhase::InProgress | SessionPhase::Completed => {
                self.model.reset();
                self.pending_submission = None;
                self.phase = SessionPhase::Ready;
                Ok(())
            }
        }
    }
}
