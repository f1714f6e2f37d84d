//! The snapshot handed to watch callbacks.

use std::path::{Path, PathBuf};
use std::time::Duration;

/// The most recently loaded contents of a watched file.
///
/// The watch loop owns this value and replaces its data in place after every
/// accepted reload. Callbacks only ever see a shared borrow, so anything they
/// want to keep past the call has to be copied out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchedFile {
    path: PathBuf,
    data: Option<Vec<u8>>,
    min_interval: Duration,
    reloads: u64,
}

impl WatchedFile {
    pub(crate) fn new(path: PathBuf, min_interval: Duration) -> Self {
        Self {
            path,
            data: None,
            min_interval,
            reloads: 0,
        }
    }

    /// Replace the contents with a freshly loaded buffer.
    pub(crate) fn replace(&mut self, data: Vec<u8>) {
        self.data = Some(data);
        self.reloads += 1;
    }

    /// The absolute path being watched.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The bytes from the last successful reload.
    ///
    /// `None` only before the first reload; callbacks always see `Some`.
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// The debounce threshold this watch was started with.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// How many successful reloads this snapshot has seen.
    pub fn reloads(&self) -> u64 {
        self.reloads
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_empty() {
        let file = WatchedFile::new(PathBuf::from("/etc/app.toml"), Duration::from_secs(1));
        assert_eq!(file.data(), None);
        assert_eq!(file.reloads(), 0);
        assert_eq!(file.min_interval(), Duration::from_secs(1));
        assert_eq!(file.path(), Path::new("/etc/app.toml"));
    }

    #[test]
    fn test_replace_swaps_data() {
        let mut file = WatchedFile::new(PathBuf::from("/etc/app.toml"), Duration::ZERO);
        file.replace(b"v1".to_vec());
        file.replace(b"v2".to_vec());

        assert_eq!(file.data(), Some(&b"v2"[..]));
        assert_eq!(file.reloads(), 2);
    }
}
