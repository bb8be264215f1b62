// src/quiz/model.rs

use crate::models::question::{Letter, Question};

/// Result of [`QuizModel::record_answer`].
///
/// `correct` is only meaningful when `was_first_answer` is true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnswerOutcome {
    pub was_first_answer: bool,
    pub correct: bool,
}

/// The current quiz and the answers given so far.
///
/// The score is maintained incrementally and only ever bumped by a first
/// answer, so it always equals the number of correctly answered questions.
#[derive(Debug, Clone, Default)]
pub struct QuizModel {
    questions: Vec<Question>,
    answers: Vec<Option<Letter>>,
    score: u32,
    completed: bool,
}

impl QuizModel {
    pub fn new(questions: Vec<Question>) -> Self {
        let mut model = Self::default();
        model.initialize(questions);
        model
    }

    pub fn initialize(&mut self, questions: Vec<Question>) {
        self.answers = vec![None; questions.len()];
        self.questions = questions;
        self.score = 0;
        self.completed = false;
    }

    /// Records the first answer for a question.
    ///
    /// Out-of-range indices, already answered questions and completed quizzes
    /// are silent no-ops.
    pub fn record_answer(&mut self, index: usize, letter: Letter) -> AnswerOutcome {
        if self.completed {
            return AnswerOutcome::default();
        }
        let Some(slot) = self.answers.get_mut(index) else {
            return AnswerOutcome::default();
        };
        if slot.is_some() {
            return AnswerOutcome::default();
        }

        *slot = Some(letter);
        let correct = self.questions[index].is_correct(letter);
        if correct {
            self.score += 1;
        }
        self.completed = self.answers.iter().all(Option::is_some);

        AnswerOutcome {
            was_first_answer: true,
            correct,
        }
    }

    /// Clears all answers so the same questions can be retaken.
    pub fn reset(&mut self) {
        self.answers.iter_mut().for_each(|a| *a = None);
        self.score = 0;
        self.completed = false;
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn answers(&self) -> &[Option<Letter>] {
        &self.answers
    }

    pub fn answer(&self, index: usize) -> Option<Letter> {
        self.answers.get(index).copied().flatten()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total(&self) -> u32 {
        self.questions.len() as u32
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::question::AnswerOption;

    fn question(correct: Letter) -> Question {
        let options = Letter::ALL
            .iter()
            .map(|&letter| AnswerOption {
                letter,
                text: format!("choice {}", letter),
            })
            .collect();
        Question::new("Which one?", options, correct).unwrap()
    }

    fn five_questions() -> Vec<Question> {
        [Letter::A, Letter::B, Letter::C, Letter::D, Letter::B]
            .into_iter()
            .map(question)
            .collect()
    }

    fn recount(model: &QuizModel) -> u32 {
        model
            .questions()
            .iter()
            .zip(model.answers())
            .filter(|(q, a)| **a == Some(q.correct()))
            .count() as u32
    }

    #[test]
    fn initialize_starts_unanswered() {
        let model = QuizModel::new(five_questions());
        assert_eq!(model.len(), 5);
        assert!(model.answers().iter().all(Option::is_none));
        assert_eq!(model.score(), 0);
        assert!(!model.is_completed());
    }

    #[test]
    fn single_question_scenario() {
        let mut model = QuizModel::new(vec![question(Letter::B)]);

        let first = model.record_answer(0, Letter::B);
        assert_eq!(
            first,
            AnswerOutcome {
                was_first_answer: true,
                correct: true
            }
        );
        assert_eq!(model.score(), 1);
        assert!(model.is_completed());

        let second = model.record_answer(0, Letter::A);
        assert!(!second.was_first_answer);
        assert_eq!(model.score(), 1);
        assert_eq!(model.answer(0), Some(Letter::B));
    }

    #[test]
    fn repeated_answer_counts_once() {
        let mut model = QuizModel::new(five_questions());
        model.record_answer(1, Letter::B);
        let again = model.record_answer(1, Letter::B);

        assert!(!again.was_first_answer);
        assert_eq!(model.score(), 1);
    }

    #[test]
    fn wrong_answer_does_not_score_and_locks_question() {
        let mut model = QuizModel::new(five_questions());
        let outcome = model.record_answer(0, Letter::D);
        assert!(outcome.was_first_answer);
        assert!(!outcome.correct);

        model.record_answer(0, Letter::A);
        assert_eq!(model.score(), 0);
        assert_eq!(model.answer(0), Some(Letter::D));
    }

    #[test]
    fn score_is_monotonic_and_matches_recount() {
        let mut model = QuizModel::new(five_questions());
        let picks = [
            (0, Letter::A),
            (1, Letter::C),
            (1, Letter::B),
            (2, Letter::C),
            (9, Letter::A),
            (3, Letter::A),
            (4, Letter::B),
            (4, Letter::A),
        ];

        let mut last = 0;
        for (index, letter) in picks {
            let before = model.score();
            let outcome = model.record_answer(index, letter);
            let expected_gain = u32::from(outcome.was_first_answer && outcome.correct);
            assert_eq!(model.score(), before + expected_gain);
            assert!(model.score() >= last);
            assert_eq!(model.score(), recount(&model));
            last = model.score();
        }
        assert_eq!(model.score(), 3);
    }

    #[test]
    fn completes_only_when_every_question_answered() {
        let mut model = QuizModel::new(five_questions());
        for index in 0..4 {
            model.record_answer(index, Letter::D);
            assert!(!model.is_completed());
        }
        model.record_answer(4, Letter::D);
        assert!(model.is_completed());

        let after = model.record_answer(0, Letter::A);
        assert_eq!(after, AnswerOutcome::default());
        assert!(model.is_completed());
    }

    #[test]
    fn out_of_range_index_is_ignored() {
        let mut model = QuizModel::new(five_questions());
        assert_eq!(model.record_answer(5, Letter::A), AnswerOutcome::default());
        assert!(model.answers().iter().all(Option::is_none));
    }

    #[test]
    fn reset_clears_answers_but_keeps_questions() {
        let mut model = QuizModel::new(five_questions());
        for (index, q) in five_questions().iter().enumerate() {
            model.record_answer(index, q.correct());
        }
        assert_eq!(model.score(), 5);
        assert!(model.is_completed());

        let before = model.questions().to_vec();
        model.reset();

        assert!(model.answers().iter().all(Option::is_none));
        assert_eq!(model.score(), 0);
        assert!(!model.is_completed());
        assert_eq!(model.questions(), before.as_slice());

        assert!(model.record_answer(2, Letter::C).correct);
        assert_eq!(model.score(), 1);
    }
}
