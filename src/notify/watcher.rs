//! Change notifications backed by the `notify` crate.

use super::{ChangeSource, Subscription};
use crate::error::{Result, WatchError};
use notify::{Event, RecursiveMode, Watcher as NotifyWatcher};
use std::path::Path;
use tokio::sync::mpsc;
use tracing::debug;

/// [`ChangeSource`] using the platform's recommended `notify` watcher
/// (inotify, FSEvents/kqueue, ReadDirectoryChangesW).
///
/// Events are delivered on the backend's own thread and forwarded into
/// unbounded tokio channels, which need no runtime context to send.
///
/// # Examples
///
/// ```rust,no_run
/// use hotfile::notify::{ChangeSource, NotifySource};
/// use std::path::Path;
///
/// # fn example() -> hotfile::error::Result<()> {
/// let subscription = NotifySource.subscribe(Path::new("/etc/app/config.toml"))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct NotifySource;

impl ChangeSource for NotifySource {
    fn subscribe(&self, path: &Path) -> Result<Subscription> {
        let (event_tx, events) = mpsc::unbounded_channel::<Event>();
        let (error_tx, errors) = mpsc::unbounded_channel::<notify::Error>();

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            // Sends only fail once the subscription is gone.
            match res {
                Ok(event) => {
                    let _ = event_tx.send(event);
                }
                Err(e) => {
                    let _ = error_tx.send(e);
                }
            }
        })
        .map_err(|e| WatchError::SubscriptionSetup {
            path: path.to_path_buf(),
            source: e,
        })?;

        watcher
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|e| WatchError::SubscriptionSetup {
                path: path.to_path_buf(),
                source: e,
            })?;

        debug!(path = %path.display(), "subscribed to change notifications");

        Ok(Subscription::new(events, errors, watcher))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_subscribe_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "port: 8080").unwrap();

        assert!(NotifySource.subscribe(&path).is_ok());
    }

    #[tokio::test]
    async fn test_subscribe_nonexistent_file() {
        let err = NotifySource
            .subscribe(Path::new("/nonexistent/config.yaml"))
            .unwrap_err();
        assert!(matches!(err, WatchError::SubscriptionSetup { .. }));
        assert!(err.is_setup());
    }

    #[tokio::test]
    async fn test_write_is_delivered() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.yaml");
        fs::write(&path, "port: 8080").unwrap();

        let mut subscription = NotifySource.subscribe(&path).unwrap();

        let writer_path = path.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            fs::write(&writer_path, "port: 9090").unwrap();
        });

        let result = timeout(Duration::from_secs(2), async {
            loop {
                match subscription.next_event().await {
                    Some(event) if crate::notify::is_write(&event.kind) => return true,
                    Some(_) => continue,
                    None => return false,
                }
            }
        })
        .await;
        assert_eq!(result.ok(), Some(true));
    }
}
