//! Terminal front end view state.
//!
//! `App` knows nothing about quiz rules. It mirrors what the core has told
//! it through [`PresentationEvent`]s, plus purely visual state such as
//! cursors and scroll offsets.

use crate::config::{QuizSettings, SelectionKey, Selections};
use crate::data::Repository;
use crate::session::PresentationEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Configure,
    Quiz,
    Result,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

/// One labelled choice in a configuration group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceOption {
    pub label: String,
    pub value: String,
}

/// A row of mutually exclusive choices, like a button group.
#[derive(Debug, Clone)]
pub struct OptionGroup {
    pub key: SelectionKey,
    pub title: &'static str,
    pub options: Vec<ChoiceOption>,
    pub cursor: usize,
    pub selected: Option<usize>,
}

impl OptionGroup {
    fn new(key: SelectionKey, title: &'static str, options: Vec<ChoiceOption>) -> Self {
        Self {
            key,
            title,
            options,
            cursor: 0,
            selected: None,
        }
    }

    fn move_cursor(&mut self, forward: bool) {
        let len = self.options.len();
        if len == 0 {
            return;
        }
        self.cursor = if forward {
            (self.cursor + 1) % len
        } else {
            (self.cursor + len - 1) % len
        };
    }

    fn sync(&mut self, value: Option<&str>) {
        self.selected = value.and_then(|v| self.options.iter().position(|o| o.value == v));
        if let Some(index) = self.selected {
            self.cursor = index;
        }
    }
}

/// The question currently on screen.
#[derive(Debug, Clone)]
pub struct QuestionView {
    pub index: usize,
    pub total: usize,
    pub prompt: String,
    pub answers: Vec<String>,
    pub cursor: usize,
    pub resolution: Option<Resolution>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub selected: String,
    pub correct: String,
    pub is_correct: bool,
    pub forced: bool,
}

/// An answered question, kept for the results breakdown.
#[derive(Debug, Clone)]
pub struct AnsweredQuestion {
    pub prompt: String,
    pub resolution: Resolution,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub score: usize,
    pub total: usize,
    pub percentage: u32,
}

pub struct App {
    pub state: AppState,
    groups: Vec<OptionGroup>,
    focused_group: usize,
    quiz_title: String,
    question: Option<QuestionView>,
    remaining: u32,
    answered: Vec<AnsweredQuestion>,
    summary: Option<Summary>,
    notice: Option<Notice>,
    result_scroll: usize,
}

impl App {
    pub fn new(repository: &Repository, settings: &QuizSettings) -> Self {
        let categories = repository
            .categories()
            .iter()
            .map(|c| ChoiceOption {
                label: c.name.clone(),
                value: c.name.clone(),
            })
            .collect();
        let counts = settings
            .count_choices
            .iter()
            .map(|n| ChoiceOption {
                label: n.to_string(),
                value: n.to_string(),
            })
            .collect();
        let difficulties = repository
            .difficulties()
            .iter()
            .map(|d| ChoiceOption {
                label: d.name.clone(),
                value: d.id.to_string(),
            })
            .collect();

        Self {
            state: AppState::Configure,
            groups: vec![
                OptionGroup::new(SelectionKey::Category, "Category", categories),
                OptionGroup::new(SelectionKey::NumberOfQuestions, "Number of questions", counts),
                OptionGroup::new(SelectionKey::DifficultyLevel, "Difficulty", difficulties),
            ],
            focused_group: 0,
            quiz_title: String::new(),
            question: None,
            remaining: settings.time_limit_secs,
            answered: Vec::new(),
            summary: None,
            notice: None,
            result_scroll: 0,
        }
    }

    pub fn groups(&self) -> &[OptionGroup] {
        &self.groups
    }

    pub fn focused_group(&self) -> usize {
        self.focused_group
    }

    pub fn quiz_title(&self) -> &str {
        &self.quiz_title
    }

    pub fn question(&self) -> Option<&QuestionView> {
        self.question.as_ref()
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn answered(&self) -> &[AnsweredQuestion] {
        &self.answered
    }

    pub fn summary(&self) -> Option<Summary> {
        self.summary
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    pub fn set_notice(&mut self, kind: NoticeKind, text: impl Into<String>) {
        self.notice = Some(Notice {
            kind,
            text: text.into(),
        });
    }

    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub fn focus_next_group(&mut self) {
        self.focused_group = (self.focused_group + 1) % self.groups.len();
    }

    pub fn focus_previous_group(&mut self) {
        let len = self.groups.len();
        self.focused_group = (self.focused_group + len - 1) % len;
    }

    pub fn next_choice(&mut self) {
        self.groups[self.focused_group].move_cursor(true);
    }

    pub fn previous_choice(&mut self) {
        self.groups[self.focused_group].move_cursor(false);
    }

    /// The key and value under the cursor in the focused group.
    pub fn highlighted_choice(&self) -> Option<(SelectionKey, String)> {
        let group = &self.groups[self.focused_group];
        group
            .options
            .get(group.cursor)
            .map(|option| (group.key, option.value.clone()))
    }

    /// Reflect the store's contents in the configuration groups.
    pub fn sync_selections(&mut self, selections: &Selections) {
        for group in &mut self.groups {
            let value = match group.key {
                SelectionKey::Category => selections.category.as_deref(),
                SelectionKey::NumberOfQuestions => selections.number_of_questions.as_deref(),
                SelectionKey::DifficultyLevel => selections.difficulty_level.as_deref(),
            };
            group.sync(value);
        }
    }

    pub fn select_next_option(&mut self) {
        if let Some(question) = self.question.as_mut().filter(|q| q.resolution.is_none()) {
            if !question.answers.is_empty() {
                question.cursor = (question.cursor + 1) % question.answers.len();
            }
        }
    }

    pub fn select_previous_option(&mut self) {
        if let Some(question) = self.question.as_mut().filter(|q| q.resolution.is_none()) {
            let len = question.answers.len();
            if len > 0 {
                question.cursor = (question.cursor + len - 1) % len;
            }
        }
    }

    pub fn is_current_resolved(&self) -> bool {
        self.question
            .as_ref()
            .is_some_and(|q| q.resolution.is_some())
    }

    pub fn selected_option(&self) -> usize {
        self.question.as_ref().map_or(0, |q| q.cursor)
    }

    pub fn scroll_results_down(&mut self) {
        let max_scroll = self.answered.len().saturating_sub(1);
        self.result_scroll = (self.result_scroll + 1).min(max_scroll);
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    /// Update the view from one core event.
    pub fn apply(&mut self, event: PresentationEvent) {
        match event {
            PresentationEvent::SessionStarted {
                category,
                requested,
                loaded,
                ..
            } => {
                self.state = AppState::Quiz;
                self.quiz_title = format!("{} Quiz", category);
                self.answered.clear();
                self.summary = None;
                self.notice = None;
                if loaded < requested {
                    self.set_notice(
                        NoticeKind::Warning,
                        format!("Only {} questions available, requested {}", loaded, requested),
                    );
                }
            }
            PresentationEvent::QuestionPresented {
                index,
                total,
                prompt,
                answers,
            } => {
                if index > 0 {
                    self.notice = None;
                }
                self.question = Some(QuestionView {
                    index,
                    total,
                    prompt,
                    answers,
                    cursor: 0,
                    resolution: None,
                });
            }
            PresentationEvent::AnswerResolved {
                selected,
                correct,
                is_correct,
                forced,
            } => {
                if let Some(question) = self.question.as_mut() {
                    let resolution = Resolution {
                        selected,
                        correct,
                        is_correct,
                        forced,
                    };
                    if let Some(position) = question
                        .answers
                        .iter()
                        .position(|a| *a == resolution.selected)
                    {
                        question.cursor = position;
                    }
                    self.answered.push(AnsweredQuestion {
                        prompt: question.prompt.clone(),
                        resolution: resolution.clone(),
                    });
                    question.resolution = Some(resolution);
                }
            }
            PresentationEvent::Tick { remaining } => {
                self.remaining = remaining;
            }
            PresentationEvent::SessionCompleted {
                score,
                total,
                percentage,
            } => {
                self.state = AppState::Result;
                self.summary = Some(Summary {
                    score,
                    total,
                    percentage,
                });
                self.result_scroll = 0;
            }
            PresentationEvent::SessionReset => {
                self.state = AppState::Configure;
                self.question = None;
                self.answered.clear();
                self.summary = None;
                self.notice = None;
                self.focused_group = 0;
                self.sync_selections(&Selections::default());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn app() -> App {
        App::new(&fixtures::repository(), &QuizSettings::default())
    }

    fn presented(index: usize) -> PresentationEvent {
        PresentationEvent::QuestionPresented {
            index,
            total: 2,
            prompt: format!("Q{}", index),
            answers: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        }
    }

    #[test]
    fn test_configuration_groups_from_repository() {
        let app = app();
        let groups = app.groups();
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].options[1].value, "History");
        assert_eq!(groups[1].options.len(), 4);
        assert_eq!(groups[2].options[0].label, "Easy");
        assert_eq!(groups[2].options[0].value, "1");
    }

    #[test]
    fn test_choice_navigation_wraps() {
        let mut app = app();
        app.previous_choice();
        assert_eq!(
            app.highlighted_choice(),
            Some((SelectionKey::Category, "History".to_string()))
        );
        app.focus_previous_group();
        assert_eq!(app.focused_group(), 2);
        app.next_choice();
        assert_eq!(
            app.highlighted_choice(),
            Some((SelectionKey::DifficultyLevel, "2".to_string()))
        );
    }

    #[test]
    fn test_sync_selections_marks_groups() {
        let mut app = app();
        app.sync_selections(&Selections {
            category: Some("History".to_string()),
            number_of_questions: Some("15".to_string()),
            difficulty_level: None,
        });
        assert_eq!(app.groups()[0].selected, Some(1));
        assert_eq!(app.groups()[1].selected, Some(2));
        assert_eq!(app.groups()[2].selected, None);
    }

    #[test]
    fn test_events_drive_screens() {
        let mut app = app();
        app.apply(PresentationEvent::SessionStarted {
            category: "Science".to_string(),
            difficulty: "Medium".to_string(),
            requested: 10,
            loaded: 2,
        });
        assert_eq!(app.state, AppState::Quiz);
        assert_eq!(app.quiz_title(), "Science Quiz");
        assert_eq!(app.notice().map(|n| n.kind), Some(NoticeKind::Warning));

        app.apply(presented(0));
        app.select_next_option();
        assert_eq!(app.selected_option(), 1);

        app.apply(PresentationEvent::Tick { remaining: 0 });
        app.apply(PresentationEvent::AnswerResolved {
            selected: "a".to_string(),
            correct: "c".to_string(),
            is_correct: false,
            forced: true,
        });
        assert!(app.is_current_resolved());
        assert_eq!(app.selected_option(), 0);
        assert_eq!(app.remaining(), 0);

        // cursor is frozen once answered
        app.select_next_option();
        assert_eq!(app.selected_option(), 0);

        app.apply(presented(1));
        assert!(!app.is_current_resolved());
        assert!(app.notice().is_none());

        app.apply(PresentationEvent::SessionCompleted {
            score: 0,
            total: 2,
            percentage: 0,
        });
        assert_eq!(app.state, AppState::Result);
        assert_eq!(app.answered().len(), 1);

        app.apply(PresentationEvent::SessionReset);
        assert_eq!(app.state, AppState::Configure);
        assert!(app.question().is_none());
        assert!(app.summary().is_none());
    }

    #[test]
    fn test_result_scroll_is_bounded() {
        let mut app = app();
        app.scroll_results_up();
        assert_eq!(app.result_scroll(), 0);
        app.scroll_results_down();
        assert_eq!(app.result_scroll(), 0);
    }
}
