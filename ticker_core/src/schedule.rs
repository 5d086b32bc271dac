//! Explicit, cancellable fixed-interval timers.
//!
//! A `Schedule` is the handle for one recurring job driven by an event loop:
//! the loop calls `poll(now)` and runs the job once per returned firing.
//! Rescheduling always goes through `cancel()` followed by `start(now)`;
//! nothing is cancelled implicitly.
use std::time::{Duration, Instant};

/// Recurring timer with an explicit cancel operation.
#[derive(Debug, Clone)]
pub struct Schedule {
    interval: Duration,
    next_due: Option<Instant>,
}

impl Schedule {
    /// Create an unscheduled timer firing every `interval`.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_due: None,
        }
    }

    /// Arm the timer; the first firing is one interval after `now`.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now + self.interval);
    }

    /// Disarm the timer. Pending firings are dropped.
    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// Number of firings due at `now`, advancing the next due time past `now`.
    ///
    /// Returns `0` when the timer is not armed.
    pub fn poll(&mut self, now: Instant) -> u32 {
        let Some(due) = self.next_due else {
            return 0;
        };
        if now < due {
            return 0;
        }
        let interval = self.interval.max(Duration::from_nanos(1));
        let overdue = now.duration_since(due);
        let fired = (overdue.as_nanos() / interval.as_nanos()) + 1;
        let fired = u32::try_from(fired).unwrap_or(u32::MAX);
        self.next_due = Some(due + interval * fired);
        fired
    }

    /// Time left until the next firing, if armed.
    pub fn time_until(&self, now: Instant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}
