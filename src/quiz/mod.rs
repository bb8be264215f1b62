// src/quiz/mod.rs

pub mod controller;
pub mod error;
pub mod model;
pub mod parser;
pub mod session;

pub use controller::{AnswerFeedback, QuizController, SessionPhase};
pub use error::QuizError;
pub use model::{AnswerOutcome, QuizModel};
pub use parser::{ParseAnomaly, ParsedQuiz, parse};
pub use session::{Collaborators, SessionHandle};
