//! A watched file whose latest contents can be read from anywhere.

use crate::core::FileWatcher;
use crate::error::WatchError;
use crate::notify::{ListenerHandle, ListenerRegistry};
use arc_swap::ArcSwapOption;
use std::sync::Arc;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;

/// Lifecycle of a watch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    /// Resolving the path and subscribing to notifications.
    SettingUp,
    /// Subscribed and waiting for writes.
    Watching,
    /// Stopped, on error or on request. A watch never leaves this state.
    Terminated,
}

/// A file watched on a background task, with lock-free access to its latest contents.
///
/// Each accepted reload is published atomically; readers calling
/// [`get`](Self::get) never block the watch task or each other. Dropping the
/// handle cancels the watch.
///
/// # Examples
///
/// ```rust,no_run
/// use hotfile::{FileWatcher, HotFile};
/// use std::time::Duration;
///
/// # async fn example() {
/// let file = HotFile::spawn(
///     FileWatcher::builder("config/app.toml")
///         .with_min_interval(Duration::from_secs(1))
///         .build(),
/// );
///
/// // Later, anywhere:
/// if let Some(bytes) = file.get() {
///     println!("{} bytes loaded", bytes.len());
/// }
/// # }
/// ```
pub struct HotFile {
    current: Arc<ArcSwapOption<Vec<u8>>>,
    last_error: Arc<ArcSwapOption<WatchError>>,
    listeners: ListenerRegistry,
    state: watch::Receiver<WatchState>,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl HotFile {
    /// Run `watcher` on a new tokio task.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(watcher: FileWatcher) -> Self {
        let current = Arc::new(ArcSwapOption::empty());
        let last_error = Arc::new(ArcSwapOption::empty());
        let listeners = ListenerRegistry::new();
        let (state_tx, state) = watch::channel(WatchState::SettingUp);
        let (shutdown, shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn({
            let current = Arc::clone(&current);
            let last_error = Arc::clone(&last_error);
            let listeners = listeners.clone();

            async move {
                // A dropped sender counts as a stop request too.
                let stop = async move {
                    let _ = shutdown_rx.await;
                };

                watcher
                    .run_observed(
                        stop,
                        || {
                            state_tx.send_replace(WatchState::Watching);
                        },
                        |update| match update {
                            Ok(file) => {
                                if let Some(data) = file.data() {
                                    let snapshot = Arc::new(data.to_vec());
                                    current.store(Some(Arc::clone(&snapshot)));
                                    listeners.notify_all(&snapshot);
                                }
                            }
                            Err(e) => last_error.store(Some(Arc::new(e))),
                        },
                    )
                    .await;

                state_tx.send_replace(WatchState::Terminated);
            }
        });

        Self {
            current,
            last_error,
            listeners,
            state,
            shutdown,
            task,
        }
    }

    /// The latest loaded contents, or `None` before the first reload.
    pub fn get(&self) -> Option<Arc<Vec<u8>>> {
        self.current.load_full()
    }

    /// The error that terminated the watch, if it stopped on one.
    pub fn last_error(&self) -> Option<Arc<WatchError>> {
        self.last_error.load_full()
    }

    /// Where the watch is in its lifecycle.
    pub fn state(&self) -> WatchState {
        *self.state.borrow()
    }

    /// Wait until the watch has terminated.
    pub async fn terminated(&self) {
        let mut state = self.state.clone();
        // An error here means the task is gone, which is also terminal.
        let _ = state
            .wait_for(|state| *state == WatchState::Terminated)
            .await;
    }

    /// Register a listener called with the new contents after every reload.
    ///
    /// Listeners run on the watch task, after the snapshot is published.
    pub fn subscribe<F>(&self, listener: F) -> ListenerHandle
    where
        F: Fn(&[u8]) + Send + Sync + 'static,
    {
        self.listeners.subscribe(listener)
    }

    /// Stop watching and wait for the task to finish.
    pub async fn stop(self) {
        let _ = self.shutdown.send(());
        let _ = self.task.await;
    }
}

impl std::fmt::Debug for HotFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HotFile")
            .field("state", &self.state())
            .field("loaded", &self.current.load().is_some())
            .finish_non_exhaustive()
    }
}
