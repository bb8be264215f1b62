// src/quiz/session.rs

//! Event loop that owns the quiz controller.
//!
//! Every user event and every collaborator completion goes through one
//! command queue and is handled to completion before the next one, so the
//! controller is never touched concurrently. Calls to the generation service
//! and the score store run as separate tasks that post their result back
//! into the same queue.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use crate::{
    models::{question::Letter, score::ScoreSubmission},
    presentation::{self, AnswerView, QuizView},
    quiz::{controller::QuizController, error::QuizError},
    services::{
        generation::{GenerationError, GenerationRequest, GenerationResult, GenerationService},
        scores::{ScoreStore, ScoreStoreError},
    },
};

const COMMAND_QUEUE_CAPACITY: usize = 64;

/// External services the session calls out to.
#[derive(Clone)]
pub struct Collaborators {
    pub generator: Arc<dyn GenerationService>,
    pub scores: Arc<dyn ScoreStore>,
}

type Reply<T> = oneshot::Sender<Result<T, QuizError>>;

enum Command {
    SubmitStory {
        text: String,
        reply: Reply<QuizView>,
    },
    SelectOption {
        index: usize,
        letter: Letter,
        reply: Reply<AnswerView>,
    },
    Reset {
        reply: Reply<QuizView>,
    },
    Snapshot {
        reply: Reply<QuizView>,
    },
    GenerationFinished(Result<GenerationResult, GenerationError>),
    ScoreSubmitted {
        submission: ScoreSubmission,
        result: Result<(), ScoreStoreError>,
    },
}

/// Cloneable entry point into a running quiz session.
#[derive(Clone)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
}

impl SessionHandle {
    /// Starts the session loop on the current tokio runtime.
    ///
    /// The loop stops once every handle has been dropped.
    pub fn spawn(collaborators: Collaborators) -> Self {
        let (tx, rx) = mpsc::channel(COMMAND_QUEUE_CAPACITY);
        let actor = SessionActor {
            controller: QuizController::new(),
            collaborators,
            commands: tx.downgrade(),
            pending_story: None,
        };
        tokio::spawn(actor.run(rx));
        Self { commands: tx }
    }

    /// Submits a story and waits until its quiz is ready or has failed.
    pub async fn submit_story(&self, text: impl Into<String>) -> Result<QuizView, QuizError> {
        let text = text.into();
        self.request(|reply| Command::SubmitStory { text, reply }).await
    }

    pub async fn select_option(&self, index: usize, letter: Letter) -> Result<AnswerView, QuizError> {
        self.request(|reply| Command::SelectOption {
            index,
            letter,
            reply,
        })
        .await
    }

    pub async fn reset(&self) -> Result<QuizView, QuizError> {
        self.request(|reply| Command::Reset { reply }).await
    }

    pub async fn snapshot(&self) -> Result<QuizView, QuizError> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(Reply<T>) -> Command,
    ) -> Result<T, QuizError> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(command(tx))
            .await
            .map_err(|_| QuizError::SessionClosed)?;
        rx.await.map_err(|_| QuizError::SessionClosed)?
    }
}

struct SessionActor {
    controller: QuizController,
    collaborators: Collaborators,
    commands: mpsc::WeakSender<Command>,
    /// Caller waiting for the outstanding generation.
    pending_story: Option<Reply<QuizView>>,
}

impl SessionActor {
    async fn run(mut self, mut rx: mpsc::Receiver<Command>) {
        tracing::debug!("Quiz session started");
        while let Some(command) = rx.recv().await {
            self.handle(command);
        }
        tracing::debug!("Quiz session stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::SubmitStory { text, reply } => match self.controller.submit_story(&text) {
                Ok(request) => {
                    self.pending_story = Some(reply);
                    self.spawn_generation(request);
                }
                Err(err) => {
                    let _ = reply.send(Err(err));
                }
            },
            Command::GenerationFinished(result) => {
                let outcome = self
                    .controller
                    .generation_finished(result)
                    .map(|()| presentation::render(&self.controller));
                match self.pending_story.take() {
                    Some(reply) => {
                        if reply.send(outcome).is_err() {
                            tracing::debug!("Story submitter went away before the quiz was ready");
                        }
                    }
                    None => tracing::warn!("Generation finished with nobody waiting"),
                }
            }
            Command::SelectOption {
                index,
                letter,
                reply,
            } => {
                let result = self
                    .controller
                    .select_option(index, letter)
                    .map(|feedback| presentation::render_answer(feedback, &self.controller));
                if let Some(submission) = self.controller.take_score_submission() {
                    self.spawn_score_submission(submission);
                }
                let _ = reply.send(result);
            }
            Command::Reset { reply } => {
                let result = self
                    .controller
                    .reset()
                    .map(|()| presentation::render(&self.controller));
                let _ = reply.send(result);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(Ok(presentation::render(&self.controller)));
            }
            Command::ScoreSubmitted { submission, result } => match result {
                Ok(()) => tracing::info!(
                    "Saved score {}/{} for session {}",
                    submission.score,
                    submission.total,
                    submission.session_id
                ),
                Err(e) => tracing::error!(
                    "Failed to save score for session {}: {}",
                    submission.session_id,
                    e
                ),
            },
        }
    }

    fn spawn_generation(&self, request: GenerationRequest) {
        let Some(commands) = self.commands.upgrade() else {
            return;
        };
        let generator = Arc::clone(&self.collaborators.generator);
        tokio::spawn(async move {
            let result = generator.generate(&request).await;
            if commands.send(Command::GenerationFinished(result)).await.is_err() {
                tracing::debug!("Session closed before generation finished");
            }
        });
    }

    fn spawn_score_submission(&self, submission: ScoreSubmission) {
        let Some(commands) = self.commands.upgrade() else {
            return;
        };
        let scores = Arc::clone(&self.collaborators.scores);
        tokio::spawn(async move {
            let result = scores.submit(&submission).await;
            let _ = commands
                .send(Command::ScoreSubmitted { submission, result })
                .await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::score::{ScoreRecord, SessionId},
        quiz::controller::SessionPhase,
    };
    use async_trait::async_trait;
    use std::{sync::Mutex, time::Duration};
    use tokio::sync::Notify;

    const FIVE: [Letter; 5] = [Letter::B, Letter::A, Letter::D, Letter::C, Letter::B];

    fn payload() -> String {
        let mut raw = String::from("SUMMARY:\nA fox crossed the river.\nQUIZ:\n");
        for (i, correct) in FIVE.iter().enumerate() {
            raw.push_str(&format!(
                "{n}. Q{n}?\nA) w\nB) x\nC) y\nD) z\nCorrect: {c}\n",
                n = i + 1,
                c = correct
            ));
        }
        raw
    }

    /// Answers every request with a fixed outcome, optionally after a gate opens.
    struct FakeGenerator {
        outcome: Result<GenerationResult, GenerationError>,
        gate: Option<Arc<Notify>>,
    }

    #[async_trait]
    impl GenerationService for FakeGenerator {
        async fn generate(
            &self,
            _request: &GenerationRequest,
        ) -> Result<GenerationResult, GenerationError> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.outcome.clone()
        }
    }

    struct FakeScores {
        sent: mpsc::UnboundedSender<ScoreSubmission>,
        fail: bool,
    }

    #[async_trait]
    impl ScoreStore for FakeScores {
        async fn submit(&self, submission: &ScoreSubmission) -> Result<(), ScoreStoreError> {
            let _ = self.sent.send(submission.clone());
            if self.fail {
                return Err(ScoreStoreError::Database(sqlx::Error::PoolTimedOut));
            }
            Ok(())
        }

        async fn recent(&self, _limit: i64) -> Result<Vec<ScoreRecord>, ScoreStoreError> {
            Ok(Vec::new())
        }
    }

    fn session(
        outcome: Result<GenerationResult, GenerationError>,
        gate: Option<Arc<Notify>>,
        fail_scores: bool,
    ) -> (SessionHandle, mpsc::UnboundedReceiver<ScoreSubmission>) {
        let (sent, received) = mpsc::unbounded_channel();
        let handle = SessionHandle::spawn(Collaborators {
            generator: Arc::new(FakeGenerator { outcome, gate }),
            scores: Arc::new(FakeScores {
                sent,
                fail: fail_scores,
            }),
        });
        (handle, received)
    }

    fn generated(session_id: &str) -> Result<GenerationResult, GenerationError> {
        Ok(GenerationResult {
            payload: payload(),
            session_id: Some(SessionId::new(session_id)),
        })
    }

    #[tokio::test]
    async fn perfect_run_submits_one_score() {
        let (handle, mut submissions) = session(generated("fox"), None, false);

        let view = handle.submit_story("The fox story.").await.unwrap();
        assert_eq!(view.phase, SessionPhase::Ready);
        assert_eq!(view.questions.len(), 5);

        for (index, letter) in FIVE.iter().enumerate() {
            let answer = handle.select_option(index, *letter).await.unwrap();
            assert!(answer.feedback.correct);
        }
        let locked = handle.select_option(2, Letter::A).await.unwrap();
        assert!(!locked.feedback.accepted);
        assert_eq!(locked.quiz.score, 5);

        let submission = tokio::time::timeout(Duration::from_secs(2), submissions.recv())
            .await
            .expect("score was never submitted")
            .unwrap();
        assert_eq!(submission.score, 5);
        assert_eq!(submission.session_id, SessionId::new("fox"));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(submissions.try_recv().is_err());
    }

    #[tokio::test]
    async fn login_required_leaves_session_idle() {
        let (handle, _) = session(Err(GenerationError::AuthRequired), None, false);

        let err = handle.submit_story("A story").await.unwrap_err();
        assert_eq!(err, QuizError::LoginRequired);
        assert_eq!(handle.snapshot().await.unwrap().phase, SessionPhase::Idle);
    }

    #[tokio::test]
    async fn second_story_while_generating_is_rejected() {
        let gate = Arc::new(Notify::new());
        let (handle, _) = session(generated("slow"), Some(Arc::clone(&gate)), false);

        let first = {
            let handle = handle.clone();
            tokio::spawn(async move { handle.submit_story("First story").await })
        };

        // Wait until the first story has been accepted.
        let mut phase = handle.snapshot().await.unwrap().phase;
        while phase != SessionPhase::Generating {
            tokio::task::yield_now().await;
            phase = handle.snapshot().await.unwrap().phase;
        }

        let err = handle.submit_story("Second story").await.unwrap_err();
        assert_eq!(err, QuizError::GenerationInProgress);

        // Other events are still served while generation is outstanding.
        let err = handle.select_option(0, Letter::A).await.unwrap_err();
        assert_eq!(err, QuizError::NoActiveQuiz);

        gate.notify_one();
        let view = first.await.unwrap().unwrap();
        assert_eq!(view.phase, SessionPhase::Ready);
    }

    #[tokio::test]
    async fn failed_score_save_keeps_completed_quiz() {
        let (handle, mut submissions) = session(generated("flaky"), None, true);
        handle.submit_story("Story").await.unwrap();
        for index in 0..5 {
            handle.select_option(index, Letter::A).await.unwrap();
        }
        submissions.recv().await.unwrap();

        let view = handle.snapshot().await.unwrap();
        assert!(view.completed);
        assert_eq!(view.phase, SessionPhase::Completed);
        assert_eq!(view.score, 1);
    }

    #[tokio::test]
    async fn reset_allows_retaking_the_quiz() {
        let (handle, _) = session(generated("again"), None, false);
        handle.submit_story("Story").await.unwrap();
        handle.select_option(0, Letter::B).await.unwrap();

        let view = handle.reset().await.unwrap();
        assert_eq!(view.phase, SessionPhase::Ready);
        assert_eq!(view.score, 0);
        assert_eq!(view.questions.len(), 5);
        assert!(view.questions.iter().all(|q| q.selected.is_none()));
    }

    #[tokio::test]
    async fn blank_story_is_rejected_immediately() {
        let (handle, _) = session(generated("unused"), None, false);
        assert_eq!(
            handle.submit_story("   ").await.unwrap_err(),
            QuizError::EmptyStory
        );
    }
}
