//! Quiz data model: raw records loaded from the data files and the
//! per-session values derived from them.

mod question;
mod quiz;

pub use question::{Category, DifficultyLevel, DistractorAnswer, Question};
pub use quiz::{AnswerRecord, QuizQuestionInstance, QuizResult, QuizSession};
