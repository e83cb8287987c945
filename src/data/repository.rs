use tracing::debug;

use crate::models::{Category, DifficultyLevel, DistractorAnswer, Question};

/// Read-only, in-memory view of the question bank.
///
/// Built once at startup and never mutated; share it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Repository {
    questions: Vec<Question>,
    categories: Vec<Category>,
    difficulties: Vec<DifficultyLevel>,
    distractors: Vec<DistractorAnswer>,
}

impl Repository {
    pub fn from_records(
        questions: Vec<Question>,
        categories: Vec<Category>,
        difficulties: Vec<DifficultyLevel>,
        distractors: Vec<DistractorAnswer>,
    ) -> Self {
        Self {
            questions,
            categories,
            difficulties,
            distractors,
        }
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn difficulties(&self) -> &[DifficultyLevel] {
        &self.difficulties
    }

    /// Find a category by numeric id or exact display name.
    pub fn find_category(&self, id_or_name: &str) -> Option<&Category> {
        let id = parse_id(id_or_name);
        self.categories
            .iter()
            .find(|c| Some(c.id) == id || c.name == id_or_name)
    }

    /// Find a difficulty level by numeric id or exact display name.
    pub fn find_difficulty(&self, id_or_name: &str) -> Option<&DifficultyLevel> {
        let id = parse_id(id_or_name);
        self.difficulties
            .iter()
            .find(|d| Some(d.id) == id || d.name == id_or_name)
    }

    /// Wrong answers for a question, in data-file order.
    pub fn find_distractors(&self, question_id: u32) -> Vec<&str> {
        let answers: Vec<&str> = self
            .distractors
            .iter()
            .filter(|d| d.question_id == question_id)
            .map(|d| d.answer.as_str())
            .collect();

        if answers.is_empty() {
            debug!(question_id, "no distractor answers found");
        }
        answers
    }
}

fn parse_id(value: &str) -> Option<u32> {
    value.trim().parse().ok()
}
