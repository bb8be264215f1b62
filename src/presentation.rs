// src/presentation.rs

//! Read-only views of a quiz session, shaped for the client.
//!
//! The correct letter of a question is only included once that question has
//! been answered.

use serde::Serialize;

use crate::{
    models::question::{AnswerOption, Letter},
    quiz::controller::{AnswerFeedback, QuizController, SessionPhase},
    utils::html::render_summary_html,
};

#[derive(Debug, Clone, Serialize)]
pub struct QuestionView {
    /// 1-based, as displayed.
    pub number: usize,
    pub text: String,
    pub options: Vec<AnswerOption>,
    pub selected: Option<Letter>,
    pub correct_letter: Option<Letter>,
    pub feedback: Option<String>,
}

/// Snapshot of the session handed to the client after every event.
#[derive(Debug, Clone, Serialize)]
pub struct QuizView {
    pub phase: SessionPhase,
    pub summary: String,
    pub summary_html: String,
    pub questions: Vec<QuestionView>,
    pub score: u32,
    pub total: u32,
    pub score_text: String,
    pub completed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performance_message: Option<String>,
}

/// Response to picking an option.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerView {
    pub feedback: AnswerFeedback,
    pub message: String,
    pub quiz: QuizView,
}

pub fn render(controller: &QuizController) -> QuizView {
    let model = controller.model();

    let questions = model
        .questions()
        .iter()
        .zip(model.answers())
        .enumerate()
        .map(|(index, (question, &answer))| {
            let correct_letter = answer.map(|_| question.correct());
            QuestionView {
                number: index + 1,
                text: question.text().to_string(),
                options: question.options().to_vec(),
                selected: answer,
                correct_letter,
                feedback: answer.map(|selected| {
                    feedback_message(question.is_correct(selected), question.correct())
                }),
            }
        })
        .collect();

    let score = model.score();
    let total = model.total();
    let completed = controller.phase() == SessionPhase::Completed;

    QuizView {
        phase: controller.phase(),
        summary: controller.summary().to_string(),
        summary_html: render_summary_html(controller.summary()),
        questions,
        score,
        total,
        score_text: format!("Score: {}/{}", score, total),
        completed,
        performance_message: completed.then(|| performance_message(score, total).to_string()),
    }
}

pub fn render_answer(feedback: AnswerFeedback, controller: &QuizController) -> AnswerView {
    let message = if feedback.accepted {
        feedback_message(feedback.correct, feedback.correct_letter)
    } else if feedback.completed {
        "The quiz is complete. Reset it to try again.".to_string()
    } else {
        "This question has already been answered.".to_string()
    };

    AnswerView {
        feedback,
        message,
        quiz: render(controller),
    }
}

pub fn feedback_message(correct: bool, correct_letter: Letter) -> String {
    if correct {
        "Correct!".to_string()
    } else {
        format!("Incorrect. The correct answer is {})", correct_letter)
    }
}

pub fn performance_message(score: u32, total: u32) -> &'static str {
    match score {
        s if s == total => "Perfect! You're a master of this story!",
        s if s >= 4 => "Excellent! You really understood the story well!",
        3 => "Good job! You have a solid understanding of the story.",
        2 => "Not bad! A bit more attention to detail would help.",
        _ => "Keep reading! Review the story and try again.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::score::SessionId, services::generation::GenerationResult};

    const CAT: &str = "SUMMARY:\nA cat & a dog.\nThey napped.\nQUIZ:\n1. Where did it nap?\nA) Tree\nB) Bed\nC) Box\nD) Sink\nCorrect: B\n2. Who napped?\nA) Cat\nB) Owl\nC) Fox\nD) Eel\nCorrect: A\n";

    fn loaded() -> QuizController {
        let mut controller = QuizController::new();
        controller.submit_story("story").unwrap();
        controller
            .generation_finished(Ok(GenerationResult {
                payload: CAT.to_string(),
                session_id: Some(SessionId::new("1")),
            }))
            .unwrap();
        controller
    }

    #[test]
    fn idle_view_is_empty() {
        let view = render(&QuizController::new());
        assert_eq!(view.phase, SessionPhase::Idle);
        assert!(view.questions.is_empty());
        assert_eq!(view.score_text, "Score: 0/0");
        assert!(view.performance_message.is_none());
    }

    #[test]
    fn correct_letters_stay_hidden_until_answered() {
        let mut controller = loaded();
        let view = render(&controller);
        assert!(view.questions.iter().all(|q| q.correct_letter.is_none()));

        controller.select_option(1, Letter::C).unwrap();
        let view = render(&controller);
        assert_eq!(view.questions[0].correct_letter, None);
        assert_eq!(view.questions[1].correct_letter, Some(Letter::A));
        assert_eq!(view.questions[1].selected, Some(Letter::C));
        assert_eq!(
            view.questions[1].feedback.as_deref(),
            Some("Incorrect. The correct answer is A)")
        );
    }

    #[test]
    fn summary_html_is_escaped_with_line_breaks() {
        let view = render(&loaded());
        assert_eq!(view.summary, "A cat & a dog.\nThey napped.\n");
        assert_eq!(view.summary_html, "A cat &amp; a dog.<br>They napped.<br>");
    }

    #[test]
    fn completed_view_carries_performance_message() {
        let mut controller = loaded();
        controller.select_option(0, Letter::B).unwrap();
        let feedback = controller.select_option(1, Letter::A).unwrap();
        let answer = render_answer(feedback, &controller);

        assert_eq!(answer.message, "Correct!");
        assert!(answer.quiz.completed);
        assert_eq!(answer.quiz.score_text, "Score: 2/2");
        assert_eq!(
            answer.quiz.performance_message.as_deref(),
            Some("Perfect! You're a master of this story!")
        );
    }

    #[test]
    fn rejected_answer_explains_why() {
        let mut controller = loaded();
        controller.select_option(0, Letter::A).unwrap();
        let feedback = controller.select_option(0, Letter::B).unwrap();
        let answer = render_answer(feedback, &controller);
        assert_eq!(answer.message, "This question has already been answered.");
    }

    #[test]
    fn performance_tiers() {
        assert_eq!(performance_message(5, 5), "Perfect! You're a master of this story!");
        assert_eq!(performance_message(4, 5), "Excellent! You really understood the story well!");
        assert_eq!(performance_message(3, 5), "Good job! You have a solid understanding of the story.");
        assert_eq!(performance_message(2, 5), "Not bad! A bit more attention to detail would help.");
        assert_eq!(performance_message(1, 5), "Keep reading! Review the story and try again.");
        assert_eq!(performance_message(0, 5), "Keep reading! Review the story and try again.");
    }
}
