//! Built-in metrics for watch operations.
//!
//! Provides OpenTelemetry metrics tracking:
//! - Write events received and suppressed
//! - Reload success/failures
//! - Reload duration
//! - Snapshot age
//!
//! # Examples
//!
//! ```rust,no_run
//! use hotfile::FileWatcher;
//! use hotfile::metrics::ReloadMetrics;
//! use opentelemetry::global;
//!
//! let metrics = ReloadMetrics::new(global::meter("my-app"));
//!
//! let watcher = FileWatcher::builder("config.toml")
//!     .with_metrics(metrics.clone())
//!     .build();
//!
//! // Refresh the age gauge from a periodic task of your own.
//! metrics.update_snapshot_age();
//! ```

mod reload_metrics;

pub use reload_metrics::ReloadMetrics;
