//! Tunables for a single watch.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default number of read attempts per accepted write event.
pub const DEFAULT_RELOAD_ATTEMPTS: u32 = 5;

/// Default pause between read attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(50);

/// Options controlling debounce and reload behavior.
///
/// Every field has a default, so a host application can embed this struct in
/// its own configuration and only override what it needs.
///
/// # Examples
///
/// ```rust
/// use hotfile::WatchOptions;
/// use std::time::Duration;
///
/// let options = WatchOptions::default().with_min_interval(Duration::from_secs(1));
/// assert_eq!(options.reload_attempts, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchOptions {
    /// Minimum time between two accepted write events.
    pub min_interval: Duration,
    /// Read attempts per accepted event before the reload fails.
    pub reload_attempts: u32,
    /// Pause between read attempts.
    pub retry_delay: Duration,
}

impl WatchOptions {
    /// Options with the given debounce interval in whole seconds.
    pub fn with_min_interval_secs(secs: u64) -> Self {
        Self::default().with_min_interval(Duration::from_secs(secs))
    }

    /// Set the debounce interval.
    pub fn with_min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }

    /// Set the number of read attempts per reload.
    ///
    /// Values below one are raised to one when the reload runs.
    pub fn with_reload_attempts(mut self, attempts: u32) -> Self {
        self.reload_attempts = attempts;
        self
    }

    /// Set the pause between read attempts.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            min_interval: Duration::ZERO,
            reload_attempts: DEFAULT_RELOAD_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }
}
