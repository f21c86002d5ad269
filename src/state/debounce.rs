//! Trailing-edge debounce driven by explicit timestamps.
//!
//! No timers or threads: the event loop passes `now` in and asks for the next
//! deadline to size its poll timeout.

use std::time::{Duration, Instant};

/// Holds the latest pushed value until it has been quiet for `delay`.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<T>,
    deadline: Option<Instant>,
}

impl<T> Debouncer<T> {
    /// Create an idle debouncer.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            deadline: None,
        }
    }

    /// Configured quiet period.
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace the pending value and restart the quiet period.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some(value);
        self.deadline = Some(now + self.delay);
    }

    /// Release the pending value once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline {
            Some(deadline) if now >= deadline => self.flush(),
            _ => None,
        }
    }

    /// Release the pending value immediately.
    pub fn flush(&mut self) -> Option<T> {
        self.deadline = None;
        self.pending.take()
    }

    /// Drop the pending value.
    pub fn cancel(&mut self) {
        self.deadline = None;
        self.pending = None;
    }

    /// When the pending value becomes due.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Whether a value is waiting.
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The waiting value.
    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref()
    }
}
