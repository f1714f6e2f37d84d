//! The watch loop: notifications in, debounced reloads out.

use crate::core::debounce::Debouncer;
use crate::core::{FileWatcherBuilder, Reloader, WatchOptions, WatchedFile};
use crate::error::{Result, Stream, WatchError};
use crate::notify::{ChangeSource, Subscription, is_write};
use crate::sources::FileReader;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, error, info};

#[cfg(feature = "metrics")]
use crate::metrics::ReloadMetrics;

/// Watches one file and reports every debounced write through a callback.
///
/// Running the watcher resolves the path, subscribes to change notifications
/// and then waits. Each write event that falls outside the minimum interval
/// triggers a reload, and the freshly loaded [`WatchedFile`] is passed to the
/// callback as `Ok`. Any failure is terminal: the callback receives it once as
/// `Err` and the run ends. Nothing restarts automatically; call
/// [`run`](Self::run) again to resume watching.
///
/// The minimum interval is measured from the last accepted write, and from the
/// moment the watch starts before any write has been accepted. A write landing
/// less than `min_interval` after startup is therefore suppressed.
///
/// One logical write can reach the backend as several raw events. On Linux,
/// `std::fs::write` truncates and then writes, and both show up as content
/// changes. With a zero interval each of them is accepted, so the callback may
/// fire more than once for the same save. Every call still carries complete,
/// non-empty contents. Use a non-zero interval to collapse such bursts.
///
/// The callback runs on the watch task itself. It must not block for long and
/// must not start another watch on the same path from inside the call.
///
/// # Examples
///
/// ```rust,no_run
/// use hotfile::FileWatcher;
/// use std::time::Duration;
///
/// # async fn example() {
/// let watcher = FileWatcher::builder("config/app.toml")
///     .with_min_interval(Duration::from_secs(1))
///     .build();
///
/// watcher
///     .run(|update| match update {
///         Ok(file) => println!("reloaded {} bytes", file.data().unwrap_or_default().len()),
///         Err(e) => eprintln!("watch stopped: {e}"),
///     })
///     .await;
/// # }
/// ```
pub struct FileWatcher {
    path: PathBuf,
    options: WatchOptions,
    source: Arc<dyn ChangeSource>,
    reader: Arc<dyn FileReader>,
    #[cfg(feature = "metrics")]
    metrics: Option<ReloadMetrics>,
}

impl FileWatcher {
    /// Create a watcher for `path` using the default backend and reader.
    pub fn new(path: impl Into<PathBuf>, options: WatchOptions) -> Self {
        FileWatcherBuilder::new(path).with_options(options).build()
    }

    /// Create a builder for a watcher on `path`.
    pub fn builder(path: impl Into<PathBuf>) -> FileWatcherBuilder {
        FileWatcherBuilder::new(path)
    }

    pub(crate) fn from_parts(
        path: PathBuf,
        options: WatchOptions,
        source: Arc<dyn ChangeSource>,
        reader: Arc<dyn FileReader>,
        #[cfg(feature = "metrics")] metrics: Option<ReloadMetrics>,
    ) -> Self {
        Self {
            path,
            options,
            source,
            reader,
            #[cfg(feature = "metrics")]
            metrics,
        }
    }

    /// The path as supplied by the caller.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The options this watcher runs with.
    pub fn options(&self) -> &WatchOptions {
        &self.options
    }

    /// Watch until a terminal error.
    ///
    /// The callback receives `Ok` for every accepted reload and exactly one
    /// `Err` right before this future completes.
    pub async fn run<F>(&self, callback: F)
    where
        F: FnMut(Result<&WatchedFile>),
    {
        self.run_until(std::future::pending::<()>(), callback).await;
    }

    /// Watch until a terminal error or until `shutdown` completes.
    ///
    /// Shutdown is not an error: the callback is not invoked for it. The
    /// subscription is released on every exit path.
    pub async fn run_until<S, F>(&self, shutdown: S, callback: F)
    where
        S: Future<Output = ()>,
        F: FnMut(Result<&WatchedFile>),
    {
        self.run_observed(shutdown, || {}, callback).await;
    }

    /// Like [`run_until`](Self::run_until), calling `on_watching` once the
    /// subscription is live and the loop is about to wait for events.
    pub(crate) async fn run_observed<S, W, F>(&self, shutdown: S, on_watching: W, mut callback: F)
    where
        S: Future<Output = ()>,
        W: FnOnce(),
        F: FnMut(Result<&WatchedFile>),
    {
        let (path, mut subscription) = match self.subscribe() {
            Ok(subscribed) => subscribed,
            Err(e) => {
                error!(path = %self.path.display(), error = %e, "failed to start watch");
                callback(Err(e));
                return;
            }
        };

        info!(path = %path.display(), min_interval = ?self.options.min_interval, "watching file");
        on_watching();

        if let Err(e) = self
            .watch_loop(&path, &mut subscription, shutdown, &mut callback)
            .await
        {
            error!(path = %path.display(), error = %e, "watch terminated");
            callback(Err(e));
        }
    }

    /// Resolve the path to absolute form, then subscribe to it.
    fn subscribe(&self) -> Result<(PathBuf, Subscription)> {
        let path = std::path::absolute(&self.path).map_err(|e| WatchError::PathResolution {
            path: self.path.clone(),
            source: e,
        })?;

        let subscription = self.source.subscribe(&path)?;
        Ok((path, subscription))
    }

    /// Returns `Ok` only on shutdown.
    async fn watch_loop<S, F>(
        &self,
        path: &Path,
        subscription: &mut Subscription,
        shutdown: S,
        callback: &mut F,
    ) -> Result<()>
    where
        S: Future<Output = ()>,
        F: FnMut(Result<&WatchedFile>),
    {
        let reloader = Reloader::from_options(Arc::clone(&self.reader), &self.options);
        // The first window opens now, so writes racing the subscription are debounced too.
        let mut debouncer = Debouncer::new(self.options.min_interval, Instant::now());
        let mut file = WatchedFile::new(path.to_path_buf(), self.options.min_interval);

        let (events, errors) = subscription.streams();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;

                () = &mut shutdown => {
                    info!(path = %path.display(), "watch cancelled");
                    return Ok(());
                }

                event = events.recv() => {
                    let event = event.ok_or(WatchError::StreamClosed(Stream::Events))?;

                    if !is_write(&event.kind) {
                        debug!(kind = ?event.kind, "ignoring non-write event");
                        continue;
                    }
                    self.record_event();

                    if !debouncer.admits(Instant::now()) {
                        debug!(path = %path.display(), "write suppressed within minimum interval");
                        self.record_suppressed();
                        continue;
                    }

                    let data = self.reload(&reloader, path).await?;
                    file.replace(data);
                    info!(path = %path.display(), reloads = file.reloads(), "file reloaded");
                    callback(Ok(&file));

                    debouncer.accept(Instant::now());
                }

                error = errors.recv() => {
                    let error = error.ok_or(WatchError::StreamClosed(Stream::Errors))?;
                    return Err(WatchError::Notification(error));
                }
            }
        }
    }

    async fn reload(&self, reloader: &Reloader, path: &Path) -> Result<Vec<u8>> {
        #[cfg(feature = "metrics")]
        let timer = self.metrics.as_ref().map(ReloadMetrics::start_reload);

        let result = reloader.load(path).await;

        #[cfg(feature = "metrics")]
        if let (Some(metrics), Some(timer)) = (&self.metrics, timer) {
            match &result {
                Ok(_) => metrics.record_reload_success(timer),
                Err(_) => metrics.record_reload_failure(timer),
            }
        }

        result
    }

    fn record_event(&self) {
        #[cfg(feature = "metrics")]
        if let Some(metrics) = &self.metrics {
            metrics.record_event();
            metrics.update_snapshot_age();
        }
    }

    fn record_suppressed(&self) {
        #[cfg(feature = "metrics")]
        if let Some(metrics) = &self.metrics {
            metrics.record_suppressed();
        }
    }
}

impl std::fmt::Debug for FileWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWatcher")
            .field("path", &self.path)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Watch `path`, debouncing writes closer than `min_interval_secs` seconds.
///
/// Shorthand for [`FileWatcher::new`] with default reload settings followed by
/// [`FileWatcher::run`]. Completes only after the callback has received a
/// terminal error.
///
/// # Examples
///
/// ```rust,no_run
/// # async fn example() {
/// hotfile::watch("cfg.txt", 1, |update| {
///     if let Ok(file) = update {
///         println!("{:?}", file.data());
///     }
/// })
/// .await;
/// # }
/// ```
pub async fn watch<P, F>(path: P, min_interval_secs: u64, callback: F)
where
    P: AsRef<Path>,
    F: FnMut(Result<&WatchedFile>),
{
    FileWatcher::new(
        path.as_ref(),
        WatchOptions::with_min_interval_secs(min_interval_secs),
    )
    .run(callback)
    .await;
}
