//! Watch metrics tracking using OpenTelemetry.

use opentelemetry::metrics::{Counter, Gauge, Histogram, Meter};
use std::sync::Arc;
use std::time::Instant;

/// Metrics collector for a file watch.
///
/// Tracks received and suppressed events, reload success/failure rates,
/// reload latency and snapshot age using OpenTelemetry metrics.
///
/// # Examples
///
/// ```rust,no_run
/// use hotfile::metrics::ReloadMetrics;
/// use opentelemetry::global;
///
/// let meter = global::meter("hotfile");
/// let metrics = ReloadMetrics::new(meter);
///
/// // Track a reload operation
/// let timer = metrics.start_reload();
/// // ... perform reload ...
/// metrics.record_reload_success(timer);
/// ```
#[derive(Clone)]
pub struct ReloadMetrics {
    events_received: Counter<u64>,
    events_suppressed: Counter<u64>,
    reload_success: Counter<u64>,
    reload_failures: Counter<u64>,
    reload_duration: Histogram<f64>,
    snapshot_age_seconds: Gauge<i64>,
    last_reload: Arc<parking_lot::Mutex<Option<Instant>>>,
}

impl ReloadMetrics {
    /// Create a new metrics collector with the provided meter.
    pub fn new(meter: Meter) -> Self {
        let events_received = meter
            .u64_counter("hotfile.events.received")
            .with_description("Write events delivered by the notification backend")
            .build();

        let events_suppressed = meter
            .u64_counter("hotfile.events.suppressed")
            .with_description("Write events dropped by the minimum interval")
            .build();

        let reload_success = meter
            .u64_counter("hotfile.reload.success")
            .with_description("Number of successful reloads")
            .build();

        let reload_failures = meter
            .u64_counter("hotfile.reload.failures")
            .with_description("Number of failed reloads")
            .build();

        let reload_duration = meter
            .f64_histogram("hotfile.reload.duration")
            .with_description("Duration of reload operations, including retries, in seconds")
            .with_unit("s")
            .build();

        let snapshot_age_seconds = meter
            .i64_gauge("hotfile.snapshot.age")
            .with_description("Time since the last successful reload in seconds")
            .with_unit("s")
            .build();

        Self {
            events_received,
            events_suppressed,
            reload_success,
            reload_failures,
            reload_duration,
            snapshot_age_seconds,
            last_reload: Arc::new(parking_lot::Mutex::new(None)),
        }
    }

    /// Record a write event arriving from the backend.
    pub fn record_event(&self) {
        self.events_received.add(1, &[]);
    }

    /// Record a write event suppressed by the debounce window.
    pub fn record_suppressed(&self) {
        self.events_suppressed.add(1, &[]);
    }

    /// Start a reload operation timer.
    ///
    /// Pass the returned `Instant` to `record_reload_success` or
    /// `record_reload_failure` when the reload completes.
    pub fn start_reload(&self) -> Instant {
        Instant::now()
    }

    /// Record a successful reload operation.
    pub fn record_reload_success(&self, start: Instant) {
        let duration = start.elapsed().as_secs_f64();
        self.reload_success.add(1, &[]);
        self.reload_duration.record(duration, &[]);

        *self.last_reload.lock() = Some(Instant::now());
    }

    /// Record a failed reload operation.
    pub fn record_reload_failure(&self, start: Instant) {
        let duration = start.elapsed().as_secs_f64();
        self.reload_failures.add(1, &[]);
        self.reload_duration.record(duration, &[]);
    }

    /// Seconds since the last successful reload, if there has been one.
    pub fn snapshot_age(&self) -> Option<u64> {
        self.last_reload.lock().map(|at| at.elapsed().as_secs())
    }

    /// Update the snapshot age gauge.
    ///
    /// Call this periodically to track how stale the loaded data is. Nothing
    /// is recorded before the first successful reload.
    pub fn update_snapshot_age(&self) {
        if let Some(age) = self.snapshot_age() {
            self.snapshot_age_seconds
                .record(i64::try_from(age).unwrap_or(i64::MAX), &[]);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opentelemetry::global;

    #[test]
    fn test_metrics_creation() {
        let meter = global::meter("test");
        let metrics = ReloadMetrics::new(meter);

        // Test basic operations don't panic
        metrics.record_event();
        metrics.record_suppressed();

        let timer = metrics.start_reload();
        metrics.record_reload_success(timer);

        let timer = metrics.start_reload();
        metrics.record_reload_failure(timer);

        metrics.update_snapshot_age();
    }

    #[test]
    fn test_snapshot_age_starts_unset() {
        let metrics = ReloadMetrics::new(global::meter("test"));
        assert_eq!(metrics.snapshot_age(), None);

        metrics.record_reload_success(metrics.start_reload());
        assert_eq!(metrics.snapshot_age(), Some(0));
    }

    #[test]
    fn test_metrics_clone_shares_age() {
        let metrics = ReloadMetrics::new(global::meter("test"));
        let metrics2 = metrics.clone();

        let timer = metrics.start_reload();
        metrics.record_reload_success(timer);

        assert!(metrics2.snapshot_age().is_some());
    }
}
