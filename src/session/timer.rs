//! Per-question countdown.
//!
//! [`Countdown`] is the pure state; a [`TickSource`] delivers one
//! [`TimerToken`] per period to whoever owns the countdown. Tokens carry the
//! generation of the countdown that scheduled them, so a tick that was
//! already queued when the countdown stopped or restarted is discarded.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Period between ticks.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Identifies one started countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

/// What a delivered tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerSignal {
    /// Still counting; seconds left.
    Tick(u32),
    /// Reached zero. Emitted once; the countdown is stopped afterwards.
    Expired,
}

#[derive(Debug, Default)]
pub struct Countdown {
    generation: u64,
    remaining: u32,
    running: bool,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start counting down from `secs`, invalidating any earlier token.
    pub fn start(&mut self, secs: u32) -> TimerToken {
        self.generation += 1;
        self.remaining = secs;
        self.running = true;
        TimerToken(self.generation)
    }

    /// Stop counting. Stopping twice is fine.
    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// The token of the running countdown.
    pub fn token(&self) -> Option<TimerToken> {
        self.running.then_some(TimerToken(self.generation))
    }

    /// Apply one tick. Stale tokens and stopped countdowns yield `None`.
    pub fn tick(&mut self, token: TimerToken) -> Option<TimerSignal> {
        if !self.running || token != TimerToken(self.generation) {
            return None;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.running = false;
            Some(TimerSignal::Expired)
        } else {
            Some(TimerSignal::Tick(self.remaining))
        }
    }
}

/// Schedules tick delivery for a started countdown.
pub trait TickSource {
    /// Begin delivering `token` once per period. Replaces any prior schedule.
    fn start(&mut self, token: TimerToken);
    /// Halt delivery. Must take effect before returning.
    fn stop(&mut self);
}

/// Ticks from a spawned tokio task, sent over an unbounded channel.
///
/// Must be started from within a tokio runtime.
pub struct IntervalTicks {
    period: Duration,
    sender: mpsc::UnboundedSender<TimerToken>,
    task: Option<JoinHandle<()>>,
}

impl IntervalTicks {
    pub fn new(sender: mpsc::UnboundedSender<TimerToken>) -> Self {
        Self::with_period(sender, TICK_PERIOD)
    }

    pub fn with_period(sender: mpsc::UnboundedSender<TimerToken>, period: Duration) -> Self {
        Self {
            period,
            sender,
            task: None,
        }
    }

    /// Create a tick source together with the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TimerToken>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl TickSource for IntervalTicks {
    fn start(&mut self, token: TimerToken) {
        self.stop();

        let sender = self.sender.clone();
        let period = self.period;
        self.task = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            loop {
                interval.tick().await;
                if sender.send(token).is_err() {
                    break;
                }
            }
        }));
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for IntervalTicks {
    fn drop(&mut self) {
        self.stop();
    }
}

/// A tick source that never fires on its own; ticks are fed by hand.
#[derive(Debug, Default)]
pub struct ManualTicks;

impl TickSource for ManualTicks {
    fn start(&mut self, _token: TimerToken) {}

    fn stop(&mut self) {}
}

/// One countdown plus the source that drives it.
pub struct Timer {
    countdown: Countdown,
    source: Box<dyn TickSource>,
}

impl Timer {
    pub fn new(source: Box<dyn TickSource>) -> Self {
        Self {
            countdown: Countdown::new(),
            source,
        }
    }

    /// Start a new countdown, stopping any running one first.
    pub fn start(&mut self, secs: u32) -> TimerToken {
        self.source.stop();
        let token = self.countdown.start(secs);
        self.source.start(token);
        debug!(?token, secs, "timer started");
        token
    }

    pub fn stop(&mut self) {
        self.source.stop();
        if self.countdown.is_running() {
            debug!("timer stopped");
        }
        self.countdown.stop();
    }

    pub fn tick(&mut self, token: TimerToken) -> Option<TimerSignal> {
        let signal = self.countdown.tick(token);
        if signal == Some(TimerSignal::Expired) {
            self.source.stop();
            debug!(?token, "timer expired");
        }
        signal
    }

    pub fn remaining(&self) -> u32 {
        self.countdown.remaining()
    }

    pub fn token(&self) -> Option<TimerToken> {
        self.countdown.token()
    }
}

impl std::fmt::Debug for Timer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timer")
            .field("countdown", &self.countdown)
            .finish_non_exhaustive()
    }
}
