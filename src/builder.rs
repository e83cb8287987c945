//! Quiz assembly: resolve the user's selections against the repository
//! and prepare a session's question list.

use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;
use tracing::{info, warn};

use crate::data::Repository;
use crate::models::{QuizQuestionInstance, QuizSession};

/// Reasons a quiz could not be assembled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A selection is missing, malformed or does not resolve.
    #[error("invalid quiz configuration: {0}")]
    ConfigInvalid(String),
    /// The category/difficulty filter matched nothing.
    #[error("no questions available for {category} ({difficulty})")]
    NoQuestionsAvailable { category: String, difficulty: String },
}

/// Fewer questions matched than were requested. The quiz still runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialQuestionSet {
    pub requested: usize,
    pub loaded: usize,
}

impl std::fmt::Display for PartialQuestionSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Only {} questions available, requested {}",
            self.loaded, self.requested
        )
    }
}

/// A freshly assembled session plus its non-fatal warning, if any.
#[derive(Debug, Clone)]
pub struct Built {
    pub session: QuizSession,
    pub warning: Option<PartialQuestionSet>,
}

/// Assemble a session of up to `count` questions.
///
/// `difficulty` and `category` accept an id or a display name. Answers are
/// shuffled with `rng`.
pub fn build<R: Rng + ?Sized>(
    repository: &Repository,
    difficulty: &str,
    category: &str,
    count: usize,
    rng: &mut R,
) -> Result<Built, BuildError> {
    if count == 0 {
        return Err(BuildError::ConfigInvalid(
            "question count must be at least 1".to_string(),
        ));
    }

    let difficulty = repository.find_difficulty(difficulty).ok_or_else(|| {
        warn!(difficulty, "difficulty level not found");
        BuildError::ConfigInvalid(format!("{} difficulty level not found", difficulty))
    })?;
    let category = repository.find_category(category).ok_or_else(|| {
        warn!(category, "category not found");
        BuildError::ConfigInvalid(format!("{} category not found", category))
    })?;

    let questions: Vec<QuizQuestionInstance> = repository
        .questions()
        .iter()
        .filter(|q| q.difficulty_id == difficulty.id && q.category_id == category.id)
        .take(count)
        .map(|q| {
            let wrong_answers: Vec<String> = repository
                .find_distractors(q.id)
                .into_iter()
                .map(str::to_string)
                .collect();

            let mut all_answers = Vec::with_capacity(wrong_answers.len() + 1);
            all_answers.push(q.answer.clone());
            all_answers.extend(wrong_answers.iter().cloned());
            all_answers.shuffle(&mut *rng);

            QuizQuestionInstance {
                question_id: q.id,
                prompt: q.question.clone(),
                correct_answer: q.answer.clone(),
                wrong_answers,
                all_answers,
            }
        })
        .collect();

    if questions.is_empty() {
        warn!(
            category = %category.name,
            difficulty = %difficulty.name,
            "No questions found for the selected criteria"
        );
        return Err(BuildError::NoQuestionsAvailable {
            category: category.name.clone(),
            difficulty: difficulty.name.clone(),
        });
    }

    let warning = (questions.len() < count).then(|| PartialQuestionSet {
        requested: count,
        loaded: questions.len(),
    });
    if let Some(partial) = &warning {
        warn!(requested = partial.requested, loaded = partial.loaded, "{}", partial);
    }

    let session = QuizSession::new(difficulty.clone(), category.clone(), count, questions);
    info!(
        session = %session.id,
        category = %session.category.name,
        difficulty = %session.difficulty.name,
        requested = session.requested,
        loaded = session.loaded(),
        "quiz assembled"
    );

    Ok(Built { session, warning })
}
