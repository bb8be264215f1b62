// src/models/question.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Number of options every question carries.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// Option letter of a multiple-choice question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Letter {
    A,
    B,
    C,
    D,
}

impl Letter {
    /// All letters in display order.
    pub const ALL: [Letter; OPTIONS_PER_QUESTION] = [Letter::A, Letter::B, Letter::C, Letter::D];

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::A => 'A',
            Letter::B => 'B',
            Letter::C => 'C',
            Letter::D => 'D',
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Letter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Letter::from_char(c).ok_or_else(|| format!("invalid option letter '{}'", s)),
            _ => Err(format!("invalid option letter '{}'", s)),
        }
    }
}

/// One lettered answer choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerOption {
    pub letter: Letter,
    pub text: String,
}

/// Reasons a set of parsed parts cannot form a [`Question`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionDefect {
    EmptyText,
    WrongOptionCount(usize),
    OutOfOrder { expected: Letter, found: Letter },
}

/// A generated multiple-choice question.
///
/// Only constructed through [`Question::new`], so every instance has exactly
/// four options lettered `A` to `D` in order, which also guarantees the
/// correct letter is one of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    text: String,
    options: Vec<AnswerOption>,
    correct: Letter,
}

impl Question {
    pub fn new(
        text: impl Into<String>,
        options: Vec<AnswerOption>,
        correct: Letter,
    ) -> Result<Self, QuestionDefect> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionDefect::EmptyText);
        }
        if options.len() != OPTIONS_PER_QUESTION {
            return Err(QuestionDefect::WrongOptionCount(options.len()));
        }
        for (option, expected) in options.iter().zip(Letter::ALL) {
            if option.letter != expected {
                return Err(QuestionDefect::OutOfOrder {
                    expected,
                    found: option.letter,
                });
            }
        }
        Ok(Self {
            text,
            options,
            correct,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    pub fn correct(&self) -> Letter {
        self.correct
    }

    pub fn is_correct(&self, letter: Letter) -> bool {
        self.correct == letter
    }
}
