//! The quiz session state machine and its countdown timer.

mod events;
mod machine;
pub mod timer;

pub use events::PresentationEvent;
pub use machine::{Advance, QuizMachine, SessionError, Status};
pub use timer::{IntervalTicks, ManualTicks, TickSource, Timer, TimerSignal, TimerToken};
