//! Router metrics for observability
//!
//! Counters describing how records fared on their way through a tee.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for sink fan-out
///
/// # Example
///
/// ```
/// use tee_logger::SinkMetrics;
///
/// let metrics = SinkMetrics::new();
///
/// metrics.record_written();
/// metrics.record_write_failure();
///
/// assert_eq!(metrics.records_written(), 1);
/// assert_eq!(metrics.write_failures(), 1);
/// ```
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Records delivered to every enabled sink without error
    records_written: AtomicU64,

    /// Records where at least one sink failed or panicked
    write_failures: AtomicU64,

    /// Sync calls where at least one sink failed
    sync_failures: AtomicU64,
}

impl SinkMetrics {
    pub const fn new() -> Self {
        Self {
            records_written: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            sync_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn records_written(&self) -> u64 {
        self.records_written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sync_failures(&self) -> u64 {
        self.sync_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_written(&self) {
        self.records_written.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the previous failure count
    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sync_failure(&self) {
        self.sync_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Percentage of records that hit at least one failing sink
    pub fn failure_rate(&self) -> f64 {
        let failed = self.write_failures();
        let total = failed + self.records_written();
        if total == 0 {
            0.0
        } else {
            (failed as f64 / total as f64) * 100.0
        }
    }
}
