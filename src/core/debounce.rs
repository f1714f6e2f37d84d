//! Minimum-interval debouncing of write events.

use std::time::Duration;
use tokio::time::Instant;

/// Suppresses write events that arrive too soon after the last accepted one.
///
/// The baseline starts when the watch starts and then moves only when an event
/// is accepted, so a burst collapses to whichever event arrives first once the
/// window reopens.
#[derive(Debug, Clone)]
pub(crate) struct Debouncer {
    min_interval: Duration,
    last_accepted: Instant,
}

impl Debouncer {
    /// A debouncer whose first window opens at `started`.
    pub(crate) fn new(min_interval: Duration, started: Instant) -> Self {
        Self {
            min_interval,
            last_accepted: started,
        }
    }

    /// Whether an event observed at `now` falls outside the window.
    ///
    /// The boundary is inclusive: an event exactly `min_interval` after the
    /// baseline is admitted.
    pub(crate) fn admits(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_accepted) >= self.min_interval
    }

    /// Move the baseline to `at`.
    pub(crate) fn accept(&mut self, at: Instant) {
        self.last_accepted = at;
    }
}
