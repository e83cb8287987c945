//! Events the quiz core emits for a renderer.
//!
//! The core never draws anything itself; a front end drains these from the
//! channel and updates its own view.

use serde::Serialize;

use crate::models::{AnswerRecord, QuizQuestionInstance, QuizResult, QuizSession};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum PresentationEvent {
    /// A quiz was built and is starting.
    SessionStarted {
        category: String,
        difficulty: String,
        requested: usize,
        loaded: usize,
    },

    /// The question at `index` is now current.
    QuestionPresented {
        index: usize,
        total: usize,
        prompt: String,
        answers: Vec<String>,
    },

    /// The current question was answered.
    AnswerResolved {
        selected: String,
        correct: String,
        is_correct: bool,
        forced: bool,
    },

    /// One second elapsed on the current question.
    Tick { remaining: u32 },

    /// All questions have been answered.
    SessionCompleted {
        score: usize,
        total: usize,
        percentage: u32,
    },

    /// The session was discarded and selections cleared.
    SessionReset,
}

impl PresentationEvent {
    pub(crate) fn started(session: &QuizSession) -> Self {
        Self::SessionStarted {
            category: session.category.name.clone(),
            difficulty: session.difficulty.name.clone(),
            requested: session.requested,
            loaded: session.loaded(),
        }
    }

    pub(crate) fn presented(index: usize, total: usize, question: &QuizQuestionInstance) -> Self {
        Self::QuestionPresented {
            index,
            total,
            prompt: question.prompt.clone(),
            answers: question.all_answers.clone(),
        }
    }

    pub(crate) fn resolved(record: &AnswerRecord) -> Self {
        Self::AnswerResolved {
            selected: record.selected_answer.clone(),
            correct: record.correct_answer.clone(),
            is_correct: record.is_correct,
            forced: record.forced,
        }
    }

    pub(crate) fn completed(result: &QuizResult) -> Self {
        Self::SessionCompleted {
            score: result.score,
            total: result.total,
            percentage: result.percentage,
        }
    }
}
