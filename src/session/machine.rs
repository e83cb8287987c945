//! Session state machine.
//!
//! ```text
//! Configuring --start--> InProgress --advance (last)--> Completed
//!      ^                                                    |
//!      +----------------------- restart --------------------+
//! ```
//!
//! Every transition is a `&mut self` method on [`QuizMachine`]; the front end
//! dispatches user input and timer ticks into them and renders the
//! [`PresentationEvent`]s that come out.

use std::fmt;
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::builder::{self, BuildError, PartialQuestionSet};
use crate::config::{QuizSettings, SelectionKey, SelectionStore, Selections};
use crate::data::Repository;
use crate::models::{AnswerRecord, QuizQuestionInstance, QuizResult, QuizSession};

use super::events::PresentationEvent;
use super::timer::{TickSource, Timer, TimerSignal, TimerToken};

/// Coarse machine state, for display and error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Waiting for selections; no active session.
    Configuring,
    /// A session is running.
    InProgress,
    /// All questions answered; the session is read-only.
    Completed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Status::Configuring => "configuring",
            Status::InProgress => "in progress",
            Status::Completed => "completed",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error("question already answered")]
    AlreadyAnswered,
    #[error("current question has not been answered yet")]
    NotAnswered,
    #[error("no answer at position {0}")]
    NoSuchAnswer(usize),
    #[error("cannot {action} while {from}")]
    InvalidTransition { from: Status, action: &'static str },
}

/// Outcome of a successful [`QuizMachine::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the question at this index.
    Next(usize),
    /// That was the last question.
    Completed(QuizResult),
}

#[derive(Debug)]
enum State {
    Configuring,
    InProgress(QuizSession),
    Completed(QuizSession),
}

impl State {
    fn status(&self) -> Status {
        match self {
            State::Configuring => Status::Configuring,
            State::InProgress(_) => Status::InProgress,
            State::Completed(_) => Status::Completed,
        }
    }
}

/// Owns the current quiz run and all of its transitions.
pub struct QuizMachine {
    repository: Arc<Repository>,
    settings: QuizSettings,
    selections: Box<dyn SelectionStore>,
    timer: Timer,
    rng: StdRng,
    events: mpsc::UnboundedSender<PresentationEvent>,
    state: State,
}

impl QuizMachine {
    /// Create a machine in `Configuring`. The selection store is cleared.
    pub fn new(
        repository: Arc<Repository>,
        settings: QuizSettings,
        mut selections: Box<dyn SelectionStore>,
        ticks: Box<dyn TickSource>,
        events: mpsc::UnboundedSender<PresentationEvent>,
    ) -> Self {
        selections.clear();
        Self {
            repository,
            settings,
            selections,
            timer: Timer::new(ticks),
            rng: StdRng::from_os_rng(),
            events,
            state: State::Configuring,
        }
    }

    /// Replace the answer-shuffling RNG.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn status(&self) -> Status {
        self.state.status()
    }

    pub fn repository(&self) -> &Repository {
        &self.repository
    }

    pub fn settings(&self) -> &QuizSettings {
        &self.settings
    }

    /// The active or completed session.
    pub fn session(&self) -> Option<&QuizSession> {
        match &self.state {
            State::Configuring => None,
            State::InProgress(session) | State::Completed(session) => Some(session),
        }
    }

    pub fn current_question(&self) -> Option<&QuizQuestionInstance> {
        match &self.state {
            State::InProgress(session) => session.current_question(),
            _ => None,
        }
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.timer.remaining()
    }

    /// Token of the running countdown, if any.
    pub fn timer_token(&self) -> Option<TimerToken> {
        self.timer.token()
    }

    /// Final score, once completed.
    pub fn result(&self) -> Option<QuizResult> {
        match &self.state {
            State::Completed(session) => Some(session.result()),
            _ => None,
        }
    }

    pub fn selections(&self) -> Selections {
        self.selections.selections()
    }

    pub fn can_start(&self) -> bool {
        self.status() == Status::Configuring && self.selections().is_complete()
    }

    /// Record one selection. Returns whether the quiz can now start.
    pub fn select(&mut self, key: SelectionKey, value: impl Into<String>) -> Result<bool, SessionError> {
        self.require(Status::Configuring, "change selections")?;
        let value = value.into();
        debug!(%key, %value, "selection stored");
        self.selections.set(key, value);
        Ok(self.can_start())
    }

    /// Build a session from the stored selections and present its first
    /// question. On failure the machine stays in `Configuring`.
    pub fn start(&mut self) -> Result<Option<PartialQuestionSet>, SessionError> {
        self.require(Status::Configuring, "start a quiz")?;

        let Selections {
            category: Some(category),
            number_of_questions: Some(count),
            difficulty_level: Some(difficulty),
        } = self.selections()
        else {
            return Err(BuildError::ConfigInvalid("missing selections for quiz".to_string()).into());
        };

        let requested = count
            .trim()
            .parse::<usize>()
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                BuildError::ConfigInvalid(format!("invalid number of questions: {}", count))
            })?;

        let built = builder::build(
            &self.repository,
            &difficulty,
            &category,
            requested,
            &mut self.rng,
        )?;

        info!(session = %built.session.id, "quiz started");
        self.emit(PresentationEvent::started(&built.session));
        self.state = State::InProgress(built.session);
        self.present_current()?;
        Ok(built.warning)
    }

    /// Emit the current question and restart its countdown.
    pub fn present_current(&mut self) -> Result<(), SessionError> {
        let status = self.status();
        let State::InProgress(session) = &self.state else {
            return Err(SessionError::InvalidTransition {
                from: status,
                action: "present a question",
            });
        };
        let Some(question) = session.current_question() else {
            return Err(SessionError::InvalidTransition {
                from: status,
                action: "present a question",
            });
        };

        let event = PresentationEvent::presented(session.current_index(), session.loaded(), question);
        let answered = session.is_current_answered();
        self.emit(event);

        if !answered {
            let secs = self.settings.time_limit_secs;
            self.timer.start(secs);
            self.emit(PresentationEvent::Tick { remaining: secs });
        }
        Ok(())
    }

    /// Answer the current question with `selected`.
    ///
    /// The countdown is stopped before anything else happens. A second
    /// answer for the same question returns `AlreadyAnswered` and changes
    /// nothing.
    pub fn submit_answer(&mut self, selected: &str) -> Result<AnswerRecord, SessionError> {
        self.resolve(selected, false)
    }

    /// Answer with the option at `index` in presentation order.
    pub fn submit_choice(&mut self, index: usize) -> Result<AnswerRecord, SessionError> {
        let selected = match &self.state {
            State::InProgress(session) => session
                .current_question()
                .and_then(|q| q.all_answers.get(index))
                .cloned()
                .ok_or(SessionError::NoSuchAnswer(index))?,
            other => {
                return Err(SessionError::InvalidTransition {
                    from: other.status(),
                    action: "submit an answer",
                });
            }
        };
        self.submit_answer(&selected)
    }

    /// Move past an answered question, completing the quiz after the last.
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        match std::mem::replace(&mut self.state, State::Configuring) {
            State::InProgress(mut session) => {
                if !session.is_current_answered() {
                    self.state = State::InProgress(session);
                    return Err(SessionError::NotAnswered);
                }

                if session.advance() {
                    let index = session.current_index();
                    self.state = State::InProgress(session);
                    self.present_current()?;
                    Ok(Advance::Next(index))
                } else {
                    self.timer.stop();
                    let result = session.result();
                    info!(
                        session = %session.id,
                        score = result.score,
                        total = result.total,
                        percentage = result.percentage,
                        "quiz completed"
                    );
                    self.state = State::Completed(session);
                    self.emit(PresentationEvent::completed(&result));
                    Ok(Advance::Completed(result))
                }
            }
            other => {
                let from = other.status();
                self.state = other;
                Err(SessionError::InvalidTransition {
                    from,
                    action: "advance",
                })
            }
        }
    }

    /// Deliver one countdown tick. On expiry the first presented answer is
    /// submitted on the user's behalf.
    pub fn tick(&mut self, token: TimerToken) -> Option<TimerSignal> {
        let signal = self.timer.tick(token)?;
        match signal {
            TimerSignal::Tick(remaining) => {
                self.emit(PresentationEvent::Tick { remaining });
            }
            TimerSignal::Expired => {
                self.emit(PresentationEvent::Tick { remaining: 0 });
                let first = self
                    .current_question()
                    .and_then(|q| q.all_answers.first())
                    .cloned();
                if let Some(first) = first {
                    if let Err(err) = self.resolve(&first, true) {
                        debug!(%err, "forced answer skipped");
                    }
                }
            }
        }
        Some(signal)
    }

    /// Discard the completed session and clear all selections.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        self.require(Status::Completed, "restart")?;
        self.timer.stop();
        self.selections.clear();
        self.state = State::Configuring;
        debug!("quiz restarted");
        self.emit(PresentationEvent::SessionReset);
        Ok(())
    }

    fn resolve(&mut self, selected: &str, forced: bool) -> Result<AnswerRecord, SessionError> {
        self.timer.stop();

        let status = self.status();
        let State::InProgress(session) = &mut self.state else {
            return Err(SessionError::InvalidTransition {
                from: status,
                action: "submit an answer",
            });
        };
        let record = session
            .record_answer(selected, forced)
            .cloned()
            .ok_or(SessionError::AlreadyAnswered)?;

        debug!(
            question = record.question_index,
            correct = record.is_correct,
            forced,
            "answer recorded"
        );
        self.emit(PresentationEvent::resolved(&record));
        Ok(record)
    }

    fn require(&self, expected: Status, action: &'static str) -> Result<(), SessionError> {
        let from = self.status();
        if from == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidTransition { from, action })
        }
    }

    fn emit(&self, event: PresentationEvent) {
        // A closed channel just means nobody is rendering.
        let _ = self.events.send(event);
    }
}

impl fmt::Debug for QuizMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizMachine")
            .field("state", &self.state)
            .field("timer", &self.timer)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MemoryStore;
    use crate::fixtures;
    use crate::session::timer::ManualTicks;

    const TIME_LIMIT: u32 = 3;

    fn machine() -> (QuizMachine, mpsc::UnboundedReceiver<PresentationEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let machine = QuizMachine::new(
            Arc::new(fixtures::repository()),
            QuizSettings::default().with_time_limit(TIME_LIMIT),
            Box::new(MemoryStore::new()),
            Box::new(ManualTicks),
            tx,
        )
        .with_rng(StdRng::seed_from_u64(7));
        (machine, rx)
    }

    fn configure(machine: &mut QuizMachine, category: &str, count: &str, difficulty: &str) {
        machine.select(SelectionKey::Category, category).unwrap();
        machine.select(SelectionKey::NumberOfQuestions, count).unwrap();
        machine.select(SelectionKey::DifficultyLevel, difficulty).unwrap();
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<PresentationEvent>) -> Vec<PresentationEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    fn correct_answer(machine: &QuizMachine) -> String {
        machine.current_question().unwrap().correct_answer.clone()
    }

    fn wrong_answer(machine: &QuizMachine) -> String {
        machine.current_question().unwrap().wrong_answers[0].clone()
    }

    #[test]
    fn test_five_easy_science_questions() {
        let (mut machine, mut rx) = machine();
        configure(&mut machine, "Science", "5", "1");

        assert_eq!(machine.start().unwrap(), None);
        assert_eq!(machine.status(), Status::InProgress);
        assert_eq!(machine.session().unwrap().loaded(), 5);

        let events = drain(&mut rx);
        assert!(matches!(
            &events[0],
            PresentationEvent::SessionStarted { loaded: 5, requested: 5, .. }
        ));
        assert!(matches!(
            &events[1],
            PresentationEvent::QuestionPresented { index: 0, total: 5, .. }
        ));
        assert_eq!(events[2], PresentationEvent::Tick { remaining: TIME_LIMIT });
    }

    #[test]
    fn test_start_requires_all_selections() {
        let (mut machine, _rx) = machine();
        assert!(!machine.select(SelectionKey::Category, "Science").unwrap());
        assert!(!machine.select(SelectionKey::NumberOfQuestions, "5").unwrap());

        let err = machine.start().unwrap_err();
        assert!(matches!(err, SessionError::Build(BuildError::ConfigInvalid(_))));
        assert_eq!(machine.status(), Status::Configuring);

        assert!(machine.select(SelectionKey::DifficultyLevel, "1").unwrap());
        assert!(machine.can_start());
    }

    #[test]
    fn test_invalid_count_is_config_invalid() {
        for count in ["0", "-1", "ten", ""] {
            let (mut machine, _rx) = machine();
            configure(&mut machine, "Science", count, "1");
            assert!(
                matches!(machine.start(), Err(SessionError::Build(BuildError::ConfigInvalid(_)))),
                "count {count:?} should be rejected"
            );
            assert_eq!(machine.status(), Status::Configuring);
        }
    }

    #[test]
    fn test_unknown_difficulty_is_config_invalid() {
        let (mut machine, _rx) = machine();
        configure(&mut machine, "Science", "5", "4");
        assert!(matches!(
            machine.start(),
            Err(SessionError::Build(BuildError::ConfigInvalid(_)))
        ));
        assert!(machine.session().is_none());
    }

    #[test]
    fn test_partial_question_set_proceeds() {
        let (mut machine, _rx) = machine();
        configure(&mut machine, "Science", "10", "2");

        let warning = machine.start().unwrap();
        assert_eq!(warning, Some(PartialQuestionSet { requested: 10, loaded: 3 }));
        let session = machine.session().unwrap();
        assert_eq!(session.loaded(), 3);
        assert_eq!(session.requested, 10);
        assert_eq!(machine.status(), Status::InProgress);
    }

    #[test]
    fn test_no_questions_stays_configuring() {
        let (mut machine, mut rx) = machine();
        configure(&mut machine, "Science", "5", "Hard");

        let err = machine.start().unwrap_err();
        assert!(matches!(
            err,
            SessionError::Build(BuildError::NoQuestionsAvailable { .. })
        ));
        assert_eq!(machine.status(), Status::Configuring);
        assert!(drain(&mut rx).is_empty());
        assert!(machine.can_start());
    }

    #[test]
    fn test_double_submit_counts_once() {
        let (mut machine, mut rx) = machine();
        configure(&mut machine, "Science", "5", "1");
        machine.start().unwrap();
        drain(&mut rx);

        let answer = correct_answer(&machine);
        let record = machine.submit_answer(&answer).unwrap();
        assert!(record.is_correct);
        assert!(matches!(
            machine.submit_answer(&answer),
            Err(SessionError::AlreadyAnswered)
        ));

        let session = machine.session().unwrap();
        assert_eq!(session.answers().len(), 1);
        assert_eq!(session.score(), 1);

        let resolved = drain(&mut rx)
            .into_iter()
            .filter(|e| matches!(e, PresentationEvent::AnswerResolved { .. }))
            .count();
        assert_eq!(resolved, 1);
    }

    #[test]
    fn test_tick_after_click_is_ignored() {
        let (mut machine, _rx) = machine();
        configure(&mut machine, "Science", "5", "1");
        machine.start().unwrap();

        let token = machine.timer_token().unwrap();
        for _ in 0..TIME_LIMIT - 1 {
            machine.tick(token);
        }
        let answer = wrong_answer(&machine);
        machine.submit_answer(&answer).unwrap();

        assert_eq!(machine.timer_token(), None);
        assert_eq!(machine.tick(token), None);
        let session = machine.session().unwrap();
        assert_eq!(session.answers().len(), 1);
        assert!(!session.answers()[0].forced);
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn test_expiry_forces_first_answer() {
        let (mut machine, mut rx) = machine();
        configure(&mut machine, "Science", "5", "1");
        machine.start().unwrap();
        drain(&mut rx);

        let first = machine.current_question().unwrap().all_answers[0].clone();
        let token = machine.timer_token().unwrap();
        assert_eq!(machine.tick(token), Some(TimerSignal::Tick(2)));
        assert_eq!(machine.tick(token), Some(TimerSignal::Tick(1)));
        assert_eq!(machine.tick(token), Some(TimerSignal::Expired));
        assert_eq!(machine.tick(token), None);

        let session = machine.session().unwrap();
        assert_eq!(session.answers().len(), 1);
        let record = &session.answers()[0];
        assert!(record.forced);
        assert_eq!(record.selected_answer, first);

        let events = drain(&mut rx);
        assert_eq!(events[0], PresentationEvent::Tick { remaining: 2 });
        assert_eq!(events[2], PresentationEvent::Tick { remaining: 0 });
        assert!(matches!(
            &events[3],
            PresentationEvent::AnswerResolved { forced: true, .. }
        ));

        assert_eq!(machine.advance().unwrap(), Advance::Next(1));
    }

    #[test]
    fn test_advance_requires_answer() {
        let (mut machine, _rx) = machine();
        configure(&mut machine, "Science", "5", "1");
        machine.start().unwrap();

        assert!(matches!(machine.advance(), Err(SessionError::NotAnswered)));
        assert_eq!(machine.session().unwrap().current_index(), 0);
        assert_eq!(machine.status(), Status::InProgress);
    }

    #[test]
    fn test_advance_restarts_timer_for_next_question() {
        let (mut machine, _rx) = machine();
        configure(&mut machine, "Science", "5", "1");
        machine.start().unwrap();

        let old = machine.timer_token().unwrap();
        machine.tick(old);
        let answer = correct_answer(&machine);
        machine.submit_answer(&answer).unwrap();
        machine.advance().unwrap();

        let new = machine.timer_token().unwrap();
        assert_ne!(old, new);
        assert_eq!(machine.remaining_seconds(), TIME_LIMIT);
        assert_eq!(machine.tick(old), None);
    }

    #[test]
    fn test_score_matches_correct_records() {
        let (mut machine, _rx) = machine();
        configure(&mut machine, "Science", "5", "1");
        machine.start().unwrap();

        let mut last_score = 0;
        for index in 0..5 {
            let answer = if index % 2 == 0 {
                correct_answer(&machine)
            } else {
                wrong_answer(&machine)
            };
            machine.submit_answer(&answer).unwrap();

            let session = machine.session().unwrap();
            let correct = session.answers().iter().filter(|a| a.is_correct).count();
            assert_eq!(session.score(), correct);
            assert!(session.score() >= last_score);
            last_score = session.score();
            machine.advance().unwrap();
        }

        let result = machine.result().unwrap();
        assert_eq!(result.score, 3);
        assert_eq!(result.total, 5);
        assert_eq!(result.percentage, 60);
    }

    #[test]
    fn test_complete_then_restart() {
        let (mut machine, mut rx) = machine();
        configure(&mut machine, "Science", "10", "Medium");
        machine.start().unwrap();

        for _ in 0..2 {
            let answer = correct_answer(&machine);
            machine.submit_answer(&answer).unwrap();
            assert!(matches!(machine.advance().unwrap(), Advance::Next(_)));
        }
        let answer = wrong_answer(&machine);
        machine.submit_answer(&answer).unwrap();
        drain(&mut rx);

        let Advance::Completed(result) = machine.advance().unwrap() else {
            panic!("expected completion");
        };
        assert_eq!((result.score, result.total, result.percentage), (2, 3, 67));
        assert_eq!(machine.status(), Status::Completed);
        assert_eq!(
            drain(&mut rx),
            vec![PresentationEvent::SessionCompleted {
                score: 2,
                total: 3,
                percentage: 67,
            }]
        );
        assert!(matches!(
            machine.submit_choice(0),
            Err(SessionError::InvalidTransition { from: Status::Completed, .. })
        ));

        machine.restart().unwrap();
        assert_eq!(machine.status(), Status::Configuring);
        assert!(machine.session().is_none());
        assert_eq!(machine.selections(), Selections::default());
        assert!(!machine.can_start());
        assert_eq!(drain(&mut rx), vec![PresentationEvent::SessionReset]);
    }

    #[test]
    fn test_restart_only_from_completed() {
        let (mut machine, _rx) = machine();
        assert!(matches!(
            machine.restart(),
            Err(SessionError::InvalidTransition { from: Status::Configuring, .. })
        ));

        configure(&mut machine, "Science", "5", "1");
        machine.start().unwrap();
        assert!(matches!(
            machine.restart(),
            Err(SessionError::InvalidTransition { from: Status::InProgress, .. })
        ));
        assert!(matches!(
            machine.start(),
            Err(SessionError::InvalidTransition { from: Status::InProgress, .. })
        ));
        assert!(matches!(
            machine.select(SelectionKey::Category, "History"),
            Err(SessionError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_submit_choice_by_position() {
        let (mut machine, _rx) = machine();
        configure(&mut machine, "History", "1", "3");
        machine.start().unwrap();

        let expected = machine.current_question().unwrap().all_answers[2].clone();
        assert!(matches!(
            machine.submit_choice(3),
            Err(SessionError::NoSuchAnswer(3))
        ));
        let record = machine.submit_choice(2).unwrap();
        assert_eq!(record.selected_answer, expected);
    }

    #[test]
    fn test_single_answer_question_forced_correct() {
        let (mut machine, _rx) = machine();
        configure(&mut machine, "History", "1", "Easy");
        machine.start().unwrap();

        let token = machine.timer_token().unwrap();
        while machine.tick(token).is_some() {}

        let result = match machine.advance().unwrap() {
            Advance::Completed(result) => result,
            other => panic!("expected completion, got {other:?}"),
        };
        assert_eq!(result.score, 1);
        assert_eq!(result.percentage, 100);
    }

    #[test]
    fn test_new_machine_clears_store() {
        let mut store = MemoryStore::new();
        store.set(SelectionKey::Category, "Science".to_string());
        let (tx, _rx) = mpsc::unbounded_channel();
        let machine = QuizMachine::new(
            Arc::new(fixtures::repository()),
            QuizSettings::default(),
            Box::new(store),
            Box::new(ManualTicks),
            tx,
        );
        assert_eq!(machine.selections(), Selections::default());
    }
}
