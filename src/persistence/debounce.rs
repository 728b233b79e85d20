//! Trailing-edge debounce timer
//!
//! Time is passed in by the caller, so the schedule can be driven from the
//! event loop and tested without sleeping.

use std::time::{Duration, Instant};

/// Default quiet period before a save fires
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl Debouncer {
    pub fn new(quiet: Duration) -> Self {
        Debouncer {
            quiet,
            deadline: None,
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet
    }

    /// Record an event, pushing the deadline back
    pub fn notify(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet);
    }

    /// True exactly once after the quiet period has passed since the last
    /// event
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Drop a pending deadline, returning whether one was armed
    pub fn cancel(&mut self) -> bool {
        self.deadline.take().is_some()
    }
}
