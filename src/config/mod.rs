//! Runtime settings and the store holding the user's quiz selections.

mod selections;

pub use selections::{MemoryStore, SelectionKey, SelectionStore, Selections};

/// Seconds allowed per question unless overridden.
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 30;

/// Question counts offered on the configuration screen.
pub const DEFAULT_COUNT_CHOICES: [u32; 4] = [5, 10, 15, 20];

/// Settings that stay fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSettings {
    pub time_limit_secs: u32,
    pub count_choices: Vec<u32>,
}

impl QuizSettings {
    pub fn with_time_limit(mut self, secs: u32) -> Self {
        self.time_limit_secs = secs.max(1);
        self
    }
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            time_limit_secs: DEFAULT_TIME_LIMIT_SECS,
            count_choices: DEFAULT_COUNT_CHOICES.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_limit_is_at_least_one_second() {
        let settings = QuizSettings::default().with_time_limit(0);
        assert_eq!(settings.time_limit_secs, 1);
        assert_eq!(QuizSettings::default().time_limit_secs, 30);
    }
}
