use std::collections::HashMap;
use std::fmt;

/// The three selections required before a quiz can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionKey {
    Category,
    NumberOfQuestions,
    DifficultyLevel,
}

impl SelectionKey {
    pub const ALL: [SelectionKey; 3] = [
        SelectionKey::Category,
        SelectionKey::NumberOfQuestions,
        SelectionKey::DifficultyLevel,
    ];

    /// Storage key name.
    pub fn as_str(self) -> &'static str {
        match self {
            SelectionKey::Category => "category",
            SelectionKey::NumberOfQuestions => "number-of-questions",
            SelectionKey::DifficultyLevel => "difficulty-level",
        }
    }
}

impl fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key/value store for the user's selections. Lives for one run of the
/// application and is cleared whenever a quiz is restarted.
pub trait SelectionStore {
    fn get(&self, key: SelectionKey) -> Option<String>;
    fn set(&mut self, key: SelectionKey, value: String);
    fn clear(&mut self);

    /// Snapshot of all three selections.
    fn selections(&self) -> Selections {
        Selections {
            category: self.get(SelectionKey::Category),
            number_of_questions: self.get(SelectionKey::NumberOfQuestions),
            difficulty_level: self.get(SelectionKey::DifficultyLevel),
        }
    }
}

/// In-process selection store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<SelectionKey, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SelectionStore for MemoryStore {
    fn get(&self, key: SelectionKey) -> Option<String> {
        self.values.get(&key).cloned()
    }

    fn set(&mut self, key: SelectionKey, value: String) {
        self.values.insert(key, value);
    }

    fn clear(&mut self) {
        self.values.clear();
    }
}

/// The selections as read at quiz start.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selections {
    pub category: Option<String>,
    pub number_of_questions: Option<String>,
    pub difficulty_level: Option<String>,
}

impl Selections {
    /// True when every selection is present and non-empty.
    pub fn is_complete(&self) -> bool {
        [
            &self.category,
            &self.number_of_questions,
            &self.difficulty_level,
        ]
        .iter()
        .all(|value| value.as_deref().is_some_and(|v| !v.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_round_trip_and_clear() {
        let mut store = MemoryStore::new();
        store.set(SelectionKey::Category, "Science".to_string());
        assert_eq!(store.get(SelectionKey::Category).as_deref(), Some("Science"));
        assert_eq!(store.get(SelectionKey::DifficultyLevel), None);

        store.clear();
        assert_eq!(store.get(SelectionKey::Category), None);
    }

    #[test]
    fn test_selections_complete_only_with_all_three() {
        let mut store = MemoryStore::new();
        store.set(SelectionKey::Category, "Science".to_string());
        store.set(SelectionKey::NumberOfQuestions, "5".to_string());
        assert!(!store.selections().is_complete());

        store.set(SelectionKey::DifficultyLevel, String::new());
        assert!(!store.selections().is_complete());

        store.set(SelectionKey::DifficultyLevel, "1".to_string());
        assert!(store.selections().is_complete());
    }

    #[test]
    fn test_key_names() {
        assert_eq!(SelectionKey::NumberOfQuestions.to_string(), "number-of-questions");
        assert_eq!(SelectionKey::DifficultyLevel.as_str(), "difficulty-level");
    }
}
