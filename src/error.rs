//! Error types for hotfile.

use std::fmt;
use std::path::{Path, PathBuf};

/// Result type alias for hotfile operations.
pub type Result<T> = std::result::Result<T, WatchError>;

/// Errors that stop a watch.
///
/// Every variant is terminal: the watch loop reports it to the callback exactly
/// once and then exits. Only the reload step retries, and it does so internally.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// The watched path could not be made absolute.
    #[error("Failed to resolve path '{}': {source}", .path.display())]
    PathResolution {
        /// The path as supplied by the caller
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The change-notification subscription could not be created, or the path
    /// could not be registered with it.
    #[error("Failed to watch '{}': {source}", .path.display())]
    SubscriptionSetup {
        /// The resolved path that was being registered
        path: PathBuf,
        /// The error reported by the notification backend
        #[source]
        source: notify::Error,
    },

    /// One of the subscription's streams ended unexpectedly.
    #[error("watcher {0} channel closed")]
    StreamClosed(Stream),

    /// The notification backend reported a problem while watching.
    #[error("Notification error: {0}")]
    Notification(#[from] notify::Error),

    /// The file could not be read with non-empty content within the retry budget.
    ///
    /// The last I/O error seen, if any, is kept as the error source.
    #[error("unable to load file '{}' after {attempts} attempts", .path.display())]
    Reload {
        /// The file that failed to load
        path: PathBuf,
        /// Number of read attempts made
        attempts: u32,
        /// The last underlying read error
        #[source]
        source: Option<std::io::Error>,
    },
}

impl WatchError {
    /// Returns `true` if the watch failed before it started waiting for events.
    pub fn is_setup(&self) -> bool {
        matches!(
            self,
            Self::PathResolution { .. } | Self::SubscriptionSetup { .. }
        )
    }

    /// Returns the path associated with this error, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::PathResolution { path, .. }
            | Self::SubscriptionSetup { path, .. }
            | Self::Reload { path, .. } => Some(path),
            Self::StreamClosed(_) | Self::Notification(_) => None,
        }
    }
}

/// The two streams a subscription delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    /// Change events
    Events,
    /// Backend errors
    Errors,
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Events => write!(f, "events"),
            Self::Errors => write!(f, "errors"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::io;

    #[test]
    fn test_stream_closed_message() {
        let err = WatchError::StreamClosed(Stream::Events);
        assert_eq!(err.to_string(), "watcher events channel closed");

        let err = WatchError::StreamClosed(Stream::Errors);
        assert_eq!(err.to_string(), "watcher errors channel closed");
    }

    #[test]
    fn test_reload_keeps_last_cause() {
        let err = WatchError::Reload {
            path: PathBuf::from("/tmp/cfg.txt"),
            attempts: 5,
            source: Some(io::Error::new(io::ErrorKind::NotFound, "gone")),
        };

        assert!(err.to_string().starts_with("unable to load file"));
        let cause = err.source().unwrap();
        assert_eq!(cause.to_string(), "gone");
    }

    #[test]
    fn test_reload_without_cause() {
        let err = WatchError::Reload {
            path: PathBuf::from("/tmp/cfg.txt"),
            attempts: 5,
            source: None,
        };
        assert!(err.source().is_none());
    }

    #[test]
    fn test_is_setup() {
        let err = WatchError::PathResolution {
            path: PathBuf::new(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "empty"),
        };
        assert!(err.is_setup());

        let err = WatchError::SubscriptionSetup {
            path: PathBuf::from("/missing"),
            source: notify::Error::generic("no such file"),
        };
        assert!(err.is_setup());

        assert!(!WatchError::StreamClosed(Stream::Errors).is_setup());
        assert!(!WatchError::Notification(notify::Error::generic("overflow")).is_setup());
    }

    #[test]
    fn test_path() {
        let err = WatchError::SubscriptionSetup {
            path: PathBuf::from("/missing"),
            source: notify::Error::generic("no such file"),
        };
        assert_eq!(err.path(), Some(Path::new("/missing")));
        assert_eq!(WatchError::StreamClosed(Stream::Events).path(), None);
    }
}
