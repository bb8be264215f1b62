// src/quiz/parser.rs

//! Parser for the text blob returned by the generation service.
//!
//! The blob is line oriented: a `SUMMARY:` marker followed by free text, and
//! a `QUIZ:` marker followed by numbered questions, lettered options and a
//! `Correct:` line per question. Anything that does not fit the quiz layout
//! is reported as a [`ParseAnomaly`] rather than producing a broken question.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::question::{AnswerOption, Letter, Question, QuestionDefect};

const SUMMARY_MARKER: &str = "SUMMARY:";
const QUIZ_MARKER: &str = "QUIZ:";
const CORRECT_PREFIX: &str = "Correct:";

static QUESTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s*").expect("question pattern is valid"));
static OPTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-D])\)\s*").expect("option pattern is valid"));

/// Output of a successful parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuiz {
    /// Summary lines, each followed by `\n`.
    pub summary: String,
    pub questions: Vec<Question>,
}

/// Quiz text that does not match the expected layout.
///
/// `number` is the 1-based position of the offending question.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseAnomaly {
    #[error("option line '{line}' appears before any question")]
    OptionWithoutQuestion { line: String },

    #[error("answer line '{line}' appears before any question")]
    CorrectWithoutQuestion { line: String },

    #[error("question {number} has no text")]
    EmptyQuestionText { number: usize },

    #[error("question {number} has {found} options, expected 4")]
    WrongOptionCount { number: usize, found: usize },

    #[error("question {number} lists option {found} where {expected} was expected")]
    OptionOutOfOrder {
        number: usize,
        expected: Letter,
        found: Letter,
    },

    #[error("question {number} has no 'Correct:' line")]
    MissingCorrect { number: usize },

    #[error("question {number} names '{value}' as correct, expected one of A-D")]
    InvalidCorrect { number: usize, value: String },

    #[error("quiz section contains no questions")]
    NoQuestions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Summary,
    Quiz,
}

/// Question being assembled from consecutive quiz lines.
#[derive(Debug)]
struct Draft {
    text: String,
    options: Vec<AnswerOption>,
    correct: Option<String>,
}

impl Draft {
    fn finish(self, number: usize) -> Result<Question, ParseAnomaly> {
        let value = self
            .correct
            .ok_or(ParseAnomaly::MissingCorrect { number })?;
        let correct = parse_correct_letter(&value)
            .ok_or_else(|| ParseAnomaly::InvalidCorrect { number, value })?;

        Question::new(self.text, self.options, correct).map_err(|defect| match defect {
            QuestionDefect::EmptyText => ParseAnomaly::EmptyQuestionText { number },
            QuestionDefect::WrongOptionCount(found) => {
                ParseAnomaly::WrongOptionCount { number, found }
            }
            QuestionDefect::OutOfOrder { expected, found } => ParseAnomaly::OptionOutOfOrder {
                number,
                expected,
                found,
            },
        })
    }
}

/// Letter of an option line and the byte offset where its text starts.
fn option_prefix(line: &str) -> Option<(Letter, usize)> {
    let caps = OPTION_LINE.captures(line)?;
    let letter = caps[1].parse().ok()?;
    Some((letter, caps.get(0)?.end()))
}

/// Accepts `B` and `B)`.
fn parse_correct_letter(value: &str) -> Option<Letter> {
    let value = value.strip_suffix(')').unwrap_or(value).trim_end();
    value.parse().ok()
}

/// Parses a generation result into its summary and questions.
pub fn parse(raw: &str) -> Result<ParsedQuiz, ParseAnomaly> {
    let mut section = Section::None;
    let mut summary = String::new();
    let mut questions = Vec::new();
    let mut draft: Option<Draft> = None;

    for line in raw.lines().map(str::trim).filter(|line| !line.is_empty()) {
        if line.starts_with(SUMMARY_MARKER) {
            section = Section::Summary;
            continue;
        }
        if line.starts_with(QUIZ_MARKER) {
            section = Section::Quiz;
            continue;
        }

        match section {
            Section::None => {}
            Section::Summary => {
                summary.push_str(line);
                summary.push('\n');
            }
            Section::Quiz => {
                if let Some(m) = QUESTION_LINE.find(line) {
                    if let Some(done) = draft.take() {
                        questions.push(done.finish(questions.len() + 1)?);
                    }
                    draft = Some(Draft {
                        text: line[m.end()..].to_string(),
                        options: Vec::new(),
                        correct: None,
                    });
                } else if let Some((letter, end)) = option_prefix(line) {
                    let current = draft.as_mut().ok_or_else(|| {
                        ParseAnomaly::OptionWithoutQuestion {
                            line: line.to_string(),
                        }
                    })?;
                    current.options.push(AnswerOption {
                        letter,
                        text: line[end..].to_string(),
                    });
                } else if let Some(rest) = line.strip_prefix(CORRECT_PREFIX) {
                    let current = draft.as_mut().ok_or_else(|| {
                        ParseAnomaly::CorrectWithoutQuestion {
                            line: line.to_string(),
                        }
                    })?;
                    current.correct = Some(rest.trim().to_string());
                } else {
                    tracing::trace!("Ignoring unrecognized quiz line: {}", line);
                }
            }
        }
    }

    if let Some(done) = draft.take() {
        questions.push(done.finish(questions.len() + 1)?);
    }

    if questions.is_empty() {
        return Err(ParseAnomaly::NoQuestions);
    }

    Ok(ParsedQuiz { summary, questions })
}
