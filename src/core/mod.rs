//! Core watch types: the event loop, its options and the reload step.

mod builder;
mod debounce;
mod file;
mod hot_file;
mod loader;
mod options;
mod watcher;

pub use builder::FileWatcherBuilder;
pub use file::WatchedFile;
pub use hot_file::{HotFile, WatchState};
pub use loader::Reloader;
pub use options::{DEFAULT_RELOAD_ATTEMPTS, DEFAULT_RETRY_DELAY, WatchOptions};
pub use watcher::{FileWatcher, watch};
