use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::info;

use super::Repository;

pub const QUESTIONS_FILE: &str = "Questions.json";
pub const CATEGORIES_FILE: &str = "Categories.json";
pub const DIFFICULTY_LEVELS_FILE: &str = "DifficultyLevels.json";
pub const DISTRACTORS_FILE: &str = "AnotherAnswers.json";

/// The question bank could not be loaded. Any failing file fails the
/// whole load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{} must contain at least one question", path.display())]
    Empty { path: PathBuf },
}

/// Load all four data files from `dir` into a [`Repository`].
pub fn load_all<P: AsRef<Path>>(dir: P) -> Result<Repository, LoadError> {
    let dir = dir.as_ref();

    let questions_path = dir.join(QUESTIONS_FILE);
    let questions: Vec<crate::models::Question> = load_records(&questions_path)?;
    if questions.is_empty() {
        return Err(LoadError::Empty {
            path: questions_path,
        });
    }
    let categories = load_records(&dir.join(CATEGORIES_FILE))?;
    let difficulties = load_records(&dir.join(DIFFICULTY_LEVELS_FILE))?;
    let distractors = load_records(&dir.join(DISTRACTORS_FILE))?;

    let repository = Repository::from_records(questions, categories, difficulties, distractors);
    info!(
        questions = repository.questions().len(),
        categories = repository.categories().len(),
        difficulties = repository.difficulties().len(),
        dir = %dir.display(),
        "All data loaded successfully"
    );
    Ok(repository)
}

fn load_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, LoadError> {
    let json_content = fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&json_content).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
