//! Reload-with-retry for the watched file.

use crate::core::WatchOptions;
use crate::error::{Result, WatchError};
use crate::sources::{FileReader, FsReader};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Loads a file's full contents, retrying reads that fail or come back empty.
///
/// A write notification can fire while the writer is still flushing, or
/// between a truncate and the rewrite that follows it. Retrying after a short
/// pause absorbs that race without relying on file locks.
///
/// The pause is a `tokio::time::sleep`, so tests can drive it with a paused
/// clock.
#[derive(Clone)]
pub struct Reloader {
    reader: Arc<dyn FileReader>,
    attempts: u32,
    retry_delay: Duration,
}

impl Reloader {
    /// Create a reloader that reads from the local filesystem.
    pub fn new(attempts: u32, retry_delay: Duration) -> Self {
        Self::with_reader(Arc::new(FsReader), attempts, retry_delay)
    }

    /// Create a reloader using a custom reader.
    pub fn with_reader(reader: Arc<dyn FileReader>, attempts: u32, retry_delay: Duration) -> Self {
        Self {
            reader,
            attempts: attempts.max(1),
            retry_delay,
        }
    }

    pub(crate) fn from_options(reader: Arc<dyn FileReader>, options: &WatchOptions) -> Self {
        Self::with_reader(reader, options.reload_attempts, options.retry_delay)
    }

    /// Number of read attempts made before giving up.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Read `path`, returning the first non-empty successful read.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Reload`] if every attempt errors or reads zero
    /// bytes. The last I/O error seen is kept as its source.
    pub async fn load(&self, path: &Path) -> Result<Vec<u8>> {
        let mut last_error = None;

        for attempt in 1..=self.attempts {
            match self.reader.read(path) {
                Ok(data) if !data.is_empty() => {
                    debug!(path = %path.display(), attempt, bytes = data.len(), "file loaded");
                    return Ok(data);
                }
                Ok(_) => {
                    warn!(path = %path.display(), attempt, "read returned no content");
                }
                Err(e) => {
                    warn!(path = %path.display(), attempt, error = %e, "read failed");
                    last_error = Some(e);
                }
            }

            if attempt < self.attempts {
                tokio::time::sleep(self.retry_delay).await;
            }
        }

        Err(WatchError::Reload {
            path: path.to_path_buf(),
            attempts: self.attempts,
            source: last_error,
        })
    }
}

impl std::fmt::Debug for Reloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reloader")
            .field("attempts", &self.attempts)
            .field("retry_delay", &self.retry_delay)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::error::Error as _;
    use std::fs;
    use std::io;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tempfile::TempDir;

    /// Reader that replays a fixed script of results, one per call.
    struct ScriptedReader {
        script: Mutex<VecDeque<io::Result<Vec<u8>>>>,
        calls: AtomicU32,
    }

    impl ScriptedReader {
        fn new(script: Vec<io::Result<Vec<u8>>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                calls: AtomicU32::new(0),
            })
        }

        fn calls(&self) -> u32 {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl FileReader for ScriptedReader {
        fn read(&self, _path: &Path) -> io::Result<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    #[tokio::test]
    async fn test_load_real_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cfg.txt");
        fs::write(&path, "v1").unwrap();

        let reloader = Reloader::new(5, Duration::from_millis(1));
        assert_eq!(reloader.load(&path).await.unwrap(), b"v1");
    }

    #[tokio::test]
    async fn test_load_unchanged_file_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("cfg.txt");
        fs::write(&path, "stable contents").unwrap();

        let reloader = Reloader::new(5, Duration::from_millis(1));
        let first = reloader.load(&path).await.unwrap();
        let second = reloader.load(&path).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_reads_are_retried() {
        let reader = ScriptedReader::new(vec![
            Ok(Vec::new()),
            Ok(Vec::new()),
            Ok(Vec::new()),
            Ok(Vec::new()),
            Ok(b"full".to_vec()),
        ]);
        let reloader = Reloader::with_reader(reader.clone(), 5, Duration::from_millis(50));

        let start = tokio::time::Instant::now();
        let data = reloader.load(Path::new("/cfg.txt")).await.unwrap();

        assert_eq!(data, b"full");
        assert_eq!(reader.calls(), 5);
        // Four pauses between five attempts.
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(200));
        assert!(elapsed < Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn test_errors_then_success() {
        let reader = ScriptedReader::new(vec![
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "locked")),
            Ok(b"ok".to_vec()),
        ]);
        let reloader = Reloader::with_reader(reader.clone(), 5, Duration::from_millis(50));

        assert_eq!(reloader.load(Path::new("/cfg.txt")).await.unwrap(), b"ok");
        assert_eq!(reader.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhausted_budget_fails_with_last_cause() {
        let reader = ScriptedReader::new(vec![
            Ok(Vec::new()),
            Err(io::Error::new(io::ErrorKind::NotFound, "first")),
            Ok(Vec::new()),
            Err(io::Error::new(io::ErrorKind::NotFound, "last")),
            Ok(Vec::new()),
        ]);
        let reloader = Reloader::with_reader(reader.clone(), 5, Duration::from_millis(50));

        let err = reloader.load(Path::new("/cfg.txt")).await.unwrap_err();
        assert!(matches!(err, WatchError::Reload { attempts: 5, .. }));
        assert_eq!(err.source().unwrap().to_string(), "last");
        assert_eq!(reader.calls(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_empty_reads_fail_without_cause() {
        let reader = ScriptedReader::new(Vec::new());
        let reloader = Reloader::with_reader(reader.clone(), 5, Duration::from_millis(50));

        let err = reloader.load(Path::new("/cfg.txt")).await.unwrap_err();
        assert!(matches!(err, WatchError::Reload { source: None, .. }));
        assert_eq!(reader.calls(), 5);
    }

    #[tokio::test]
    async fn test_zero_attempts_still_reads_once() {
        let reader = ScriptedReader::new(vec![Ok(b"x".to_vec())]);
        let reloader = Reloader::with_reader(reader.clone(), 0, Duration::ZERO);

        assert_eq!(reloader.attempts(), 1);
        assert_eq!(reloader.load(Path::new("/cfg.txt")).await.unwrap(), b"x");
    }
}
