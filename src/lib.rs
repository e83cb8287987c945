//! # trivia-quiz
//!
//! A terminal trivia quiz: pick a category, a question count and a
//! difficulty, then answer multiple-choice questions against a per-question
//! countdown.
//!
//! The quiz rules live in [`QuizMachine`], which can be driven without a
//! terminal. [`Quiz`] wires it to the terminal front end.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use trivia_quiz::{Quiz, QuizError, QuizSettings};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), QuizError> {
//!     // Load the question bank from a directory of JSON files
//!     let quiz = Quiz::from_data_dir("data", QuizSettings::default())?;
//!
//!     // Run the quiz in the terminal
//!     quiz.run().await
//! }
//! ```

mod app;
pub mod builder;
pub mod config;
pub mod data;
pub mod models;
pub mod session;
pub mod terminal;
mod ui;

#[cfg(test)]
mod fixtures;

use std::io;
use std::path::Path;
use std::sync::Arc;

use crossterm::event::{Event, EventStream, KeyCode, KeyEventKind};
use futures_util::StreamExt;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::debug;

pub use app::{App, AppState};
pub use builder::{BuildError, PartialQuestionSet};
pub use config::{MemoryStore, QuizSettings, SelectionKey, SelectionStore};
pub use data::{LoadError, Repository, load_all};
pub use models::{AnswerRecord, QuizQuestionInstance, QuizResult, QuizSession};
pub use session::{Advance, PresentationEvent, QuizMachine, SessionError, Status, TimerToken};

use app::NoticeKind;
use session::IntervalTicks;

/// Error type for quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    /// The question bank could not be loaded.
    #[error("Failed to load questions: {0}")]
    Load(#[from] LoadError),
    /// IO error during quiz execution.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// A quiz transition was refused.
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// A quiz wired to the terminal front end.
pub struct Quiz {
    app: App,
    machine: QuizMachine,
    events: mpsc::UnboundedReceiver<PresentationEvent>,
    ticks: mpsc::UnboundedReceiver<TimerToken>,
}

impl Quiz {
    /// Create a quiz over an already loaded repository.
    pub fn new(repository: Repository, settings: QuizSettings) -> Self {
        let app = App::new(&repository, &settings);
        let (tick_source, ticks) = IntervalTicks::channel();
        let (event_tx, events) = mpsc::unbounded_channel();
        let machine = QuizMachine::new(
            Arc::new(repository),
            settings,
            Box::new(MemoryStore::new()),
            Box::new(tick_source),
            event_tx,
        );

        Self {
            app,
            machine,
            events,
            ticks,
        }
    }

    /// Load the question bank from `dir` and create a quiz over it.
    pub fn from_data_dir<P: AsRef<Path>>(dir: P, settings: QuizSettings) -> Result<Self, QuizError> {
        let repository = load_all(dir)?;
        Ok(Self::new(repository, settings))
    }

    /// Store a selection before the quiz is shown. Returns whether the quiz
    /// can start.
    pub fn preselect(&mut self, key: SelectionKey, value: impl Into<String>) -> Result<bool, QuizError> {
        let ready = self.machine.select(key, value)?;
        self.app.sync_selections(&self.machine.selections());
        Ok(ready)
    }

    /// Start the quiz from the stored selections.
    ///
    /// Must be called from within a tokio runtime, since it starts the first
    /// countdown.
    pub fn start(&mut self) -> Result<Option<PartialQuestionSet>, QuizError> {
        let started = self.machine.start();
        if let Err(err) = &started {
            self.app.set_notice(NoticeKind::Error, err.to_string());
        }
        self.flush_events();
        Ok(started?)
    }

    /// Get a reference to the state machine.
    pub fn machine(&self) -> &QuizMachine {
        &self.machine
    }

    /// Get a mutable reference to the state machine for custom driving.
    pub fn machine_mut(&mut self) -> &mut QuizMachine {
        &mut self.machine
    }

    /// Run the quiz in the terminal.
    ///
    /// This will take over the terminal, display the quiz UI, and return
    /// when the user quits.
    pub async fn run(mut self) -> Result<(), QuizError> {
        let mut guard = terminal::TerminalGuard::enter()?;
        let result = self.event_loop(guard.terminal()).await;
        guard.restore()?;
        result
    }

    async fn event_loop(&mut self, terminal: &mut terminal::AppTerminal) -> Result<(), QuizError> {
        let mut keys = EventStream::new();

        loop {
            self.flush_events();
            terminal.draw(|frame| ui::render(frame, &self.app))?;

            tokio::select! {
                key_event = keys.next() => {
                    let Some(key_event) = key_event else {
                        break;
                    };
                    let Event::Key(key) = key_event? else {
                        continue;
                    };
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if handle_input(&mut self.app, &mut self.machine, key.code) {
                        break;
                    }
                }
                Some(token) = self.ticks.recv() => {
                    self.machine.tick(token);
                }
            }
        }

        Ok(())
    }

    fn flush_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            self.app.apply(event);
        }
    }
}

/// Returns true if the app should exit.
fn handle_input(app: &mut App, machine: &mut QuizMachine, key: KeyCode) -> bool {
    if matches!(key, KeyCode::Char('q') | KeyCode::Char('Q')) {
        return true;
    }

    match app.state {
        AppState::Configure => handle_configure_input(app, machine, key),
        AppState::Quiz => handle_quiz_input(app, machine, key),
        AppState::Result => handle_result_input(app, machine, key),
    }
    false
}

fn handle_configure_input(app: &mut App, machine: &mut QuizMachine, key: KeyCode) {
    match key {
        KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => app.focus_previous_group(),
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => app.focus_next_group(),
        KeyCode::Left | KeyCode::Char('h') => app.previous_choice(),
        KeyCode::Right | KeyCode::Char('l') => app.next_choice(),
        KeyCode::Enter | KeyCode::Char(' ') => {
            if let Some((key, value)) = app.highlighted_choice() {
                app.clear_notice();
                if let Err(err) = machine.select(key, value) {
                    app.set_notice(NoticeKind::Error, err.to_string());
                }
                app.sync_selections(&machine.selections());
            }
        }
        KeyCode::Char('s') | KeyCode::Char('S') => {
            if !machine.can_start() {
                return;
            }
            if let Err(err) = machine.start() {
                app.set_notice(NoticeKind::Error, err.to_string());
            }
        }
        _ => {}
    }
}

fn handle_quiz_input(app: &mut App, machine: &mut QuizMachine, key: KeyCode) {
    match key {
        KeyCode::Up | KeyCode::Char('k') => app.select_previous_option(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_option(),
        KeyCode::Enter | KeyCode::Char(' ') => {
            let outcome = if app.is_current_resolved() {
                machine.advance().map(|_| ())
            } else {
                machine.submit_choice(app.selected_option()).map(|_| ())
            };
            if let Err(err) = outcome {
                debug!(%err, "input ignored");
            }
        }
        KeyCode::Char('n') | KeyCode::Char('N') => {
            if let Err(err) = machine.advance() {
                debug!(%err, "input ignored");
            }
        }
        _ => {}
    }
}

fn handle_result_input(app: &mut App, machine: &mut QuizMachine, key: KeyCode) {
    match key {
        KeyCode::Down | KeyCode::Char('j') => app.scroll_results_down(),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_results_up(),
        KeyCode::Char('r') | KeyCode::Char('R') => {
            if let Err(err) = machine.restart() {
                debug!(%err, "restart refused");
            }
        }
        _ => {}
    }
}
