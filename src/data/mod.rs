//! Question bank loading and read-only lookups.

mod loader;
mod repository;

pub use loader::{
    CATEGORIES_FILE, DIFFICULTY_LEVELS_FILE, DISTRACTORS_FILE, LoadError, QUESTIONS_FILE,
    load_all,
};
pub use repository::Repository;
