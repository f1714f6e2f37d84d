//! Builder for constructing FileWatcher instances.

use crate::core::{FileWatcher, WatchOptions};
use crate::notify::{ChangeSource, NotifySource};
use crate::sources::{FileReader, FsReader};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "metrics")]
use crate::metrics::ReloadMetrics;

/// Builder for constructing a [`FileWatcher`].
///
/// Provides a fluent interface over [`WatchOptions`] and the two pluggable
/// seams: where change notifications come from and how the file is read.
///
/// # Examples
///
/// ```rust,no_run
/// use hotfile::FileWatcher;
/// use std::time::Duration;
///
/// let watcher = FileWatcher::builder("config/app.toml")
///     .with_min_interval(Duration::from_secs(1))
///     .with_reload_attempts(10)
///     .with_retry_delay(Duration::from_millis(20))
///     .build();
/// ```
pub struct FileWatcherBuilder {
    path: PathBuf,
    options: WatchOptions,
    source: Option<Arc<dyn ChangeSource>>,
    reader: Option<Arc<dyn FileReader>>,
    #[cfg(feature = "metrics")]
    metrics: Option<ReloadMetrics>,
}

impl FileWatcherBuilder {
    /// Create a new builder for `path` with default options.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            options: WatchOptions::default(),
            source: None,
            reader: None,
            #[cfg(feature = "metrics")]
            metrics: None,
        }
    }

    /// Replace all options at once.
    pub fn with_options(mut self, options: WatchOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the minimum time between accepted write events.
    pub fn with_min_interval(mut self, interval: Duration) -> Self {
        self.options.min_interval = interval;
        self
    }

    /// Set the number of read attempts per reload (default: 5).
    pub fn with_reload_attempts(mut self, attempts: u32) -> Self {
        self.options.reload_attempts = attempts;
        self
    }

    /// Set the pause between read attempts (default: 50ms).
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.options.retry_delay = delay;
        self
    }

    /// Use a custom source of change notifications.
    ///
    /// Defaults to [`NotifySource`].
    pub fn with_change_source<S: ChangeSource + 'static>(mut self, source: S) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// Use a custom file reader.
    ///
    /// Defaults to [`FsReader`].
    pub fn with_reader<R: FileReader + 'static>(mut self, reader: R) -> Self {
        self.reader = Some(Arc::new(reader));
        self
    }

    /// Record watch metrics into `metrics`.
    ///
    /// Clones share state, so a clone kept by the caller can still drive
    /// [`ReloadMetrics::update_snapshot_age`] between events.
    #[cfg(feature = "metrics")]
    pub fn with_metrics(mut self, metrics: ReloadMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Build the watcher. Nothing is resolved or subscribed until it runs.
    pub fn build(self) -> FileWatcher {
        FileWatcher::from_parts(
            self.path,
            self.options,
            self.source.unwrap_or_else(|| Arc::new(NotifySource)),
            self.reader.unwrap_or_else(|| Arc::new(FsReader)),
            #[cfg(feature = "metrics")]
            self.metrics,
        )
    }
}
