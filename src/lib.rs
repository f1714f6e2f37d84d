//! # hotfile
//!
//! Watch a single file and receive its freshly loaded contents on every write.
//!
//! ## Overview
//!
//! `hotfile` bridges raw filesystem change notifications to a small reload protocol:
//! - Write events closer together than a minimum interval are debounced
//! - Accepted writes trigger a reload that retries empty or failed reads
//! - The loaded bytes are handed to a callback
//! - Any failure is reported to the callback once, and the watch stops
//!
//! It is meant for processes that hot-reload a configuration or data file
//! without restarting. Parsing the bytes is left entirely to the caller.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # async fn example() {
//! // Debounce writes that land within one second of the last reload.
//! hotfile::watch("config/app.toml", 1, |update| match update {
//!     Ok(file) => println!("reloaded: {:?}", file.data()),
//!     Err(e) => eprintln!("watch stopped: {e}"),
//! })
//! .await;
//! # }
//! ```
//!
//! For a handle that can be read from anywhere, use [`HotFile`]:
//!
//! ```rust,no_run
//! use hotfile::{FileWatcher, HotFile};
//!
//! # async fn example() {
//! let file = HotFile::spawn(FileWatcher::builder("config/app.toml").build());
//! let latest = file.get();
//! # }
//! ```
//!
//! ## Guarantees
//!
//! - **Complete snapshots**: a callback never sees partial or empty contents
//! - **Terminal errors**: after an `Err` the callback is never called again
//! - **No auto-restart**: run the watcher again to resume
//!
//! ## Feature Flags
//!
//! - `metrics`: OpenTelemetry counters and histograms for events and reloads

#![warn(missing_docs, rust_2024_compatibility)]
#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod notify;
pub mod sources;

#[cfg(feature = "metrics")]
pub mod metrics;

pub use crate::core::{
    FileWatcher, FileWatcherBuilder, HotFile, Reloader, WatchOptions, WatchState, WatchedFile,
    watch,
};
pub use crate::error::{Result, WatchError};

/// Convenient re-exports for common usage patterns.
pub mod prelude {
    pub use crate::core::{FileWatcher, FileWatcherBuilder, HotFile, WatchOptions, WatchedFile};
    pub use crate::error::{Result, WatchError};
}
