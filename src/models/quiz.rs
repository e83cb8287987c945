use serde::Serialize;
use uuid::Uuid;

use super::{Category, DifficultyLevel};

/// A question prepared for one session, with its answers already shuffled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizQuestionInstance {
    pub question_id: u32,
    pub prompt: String,
    pub correct_answer: String,
    /// Distractor texts in data-file order.
    pub wrong_answers: Vec<String>,
    /// The correct answer and every distractor, in presentation order.
    pub all_answers: Vec<String>,
}

impl QuizQuestionInstance {
    pub fn is_correct(&self, selected: &str) -> bool {
        selected == self.correct_answer
    }
}

/// The outcome of answering one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerRecord {
    pub question_index: usize,
    pub selected_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
    /// Submitted on the user's behalf when the countdown expired.
    pub forced: bool,
}

/// One quiz run, from a successful build until restart.
#[derive(Debug, Clone)]
pub struct QuizSession {
    pub id: Uuid,
    pub difficulty: DifficultyLevel,
    pub category: Category,
    /// Number of questions the user asked for.
    pub requested: usize,
    questions: Vec<QuizQuestionInstance>,
    current: usize,
    score: usize,
    answers: Vec<AnswerRecord>,
}

impl QuizSession {
    pub fn new(
        difficulty: DifficultyLevel,
        category: Category,
        requested: usize,
        questions: Vec<QuizQuestionInstance>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            difficulty,
            category,
            requested,
            questions,
            current: 0,
            score: 0,
            answers: Vec::new(),
        }
    }

    /// Number of questions actually loaded, at most `requested`.
    pub fn loaded(&self) -> usize {
        self.questions.len()
    }

    pub fn questions(&self) -> &[QuizQuestionInstance] {
        &self.questions
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub fn score(&self) -> usize {
        self.score
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    /// `None` once the pointer has moved past the last question.
    pub fn current_question(&self) -> Option<&QuizQuestionInstance> {
        self.questions.get(self.current)
    }

    pub fn is_current_answered(&self) -> bool {
        self.answers
            .last()
            .is_some_and(|record| record.question_index == self.current)
    }

    pub fn is_exhausted(&self) -> bool {
        self.current >= self.questions.len()
    }

    /// Record an answer for the current question.
    ///
    /// Returns `None` without touching the score when the question was
    /// already answered or there is no current question.
    pub fn record_answer(&mut self, selected: &str, forced: bool) -> Option<&AnswerRecord> {
        if self.is_current_answered() {
            return None;
        }
        let question = self.questions.get(self.current)?;
        let is_correct = question.is_correct(selected);

        self.answers.push(AnswerRecord {
            question_index: self.current,
            selected_answer: selected.to_string(),
            correct_answer: question.correct_answer.clone(),
            is_correct,
            forced,
        });
        if is_correct {
            self.score += 1;
        }
        self.answers.last()
    }

    /// Move the pointer forward. Returns true while questions remain.
    pub fn advance(&mut self) -> bool {
        if !self.is_exhausted() {
            self.current += 1;
        }
        !self.is_exhausted()
    }

    pub fn result(&self) -> QuizResult {
        QuizResult::new(self.score, self.questions.len())
    }
}

/// Final score summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuizResult {
    pub score: usize,
    pub total: usize,
    pub wrong: usize,
    pub percentage: u32,
}

impl QuizResult {
    pub fn new(score: usize, total: usize) -> Self {
        Self {
            score,
            total,
            wrong: total.saturating_sub(score),
            percentage: percentage(score, total),
        }
    }
}

/// `round(score / total * 100)` with halves rounded up, in integer math.
fn percentage(score: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let scaled = (score as u64 * 200 + total as u64) / (total as u64 * 2);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}
