//! Tee core: fans each record out to an ordered list of sinks

use super::{
    error::{LoggerError, Result},
    level::Level,
    metrics::SinkMetrics,
    record::Record,
    recovery::panic_message,
    sink::Sink,
};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

/// Composite sink delivering records to every enabled constituent.
///
/// Each sink call is isolated: an error or a panic in one sink is reported
/// and counted, and the remaining sinks still receive the record. The first
/// error encountered is returned once fan-out completes.
pub struct Tee {
    sinks: Vec<Arc<dyn Sink>>,
    metrics: Arc<SinkMetrics>,
}

impl Tee {
    pub fn new(sinks: Vec<Arc<dyn Sink>>) -> Self {
        Self {
            sinks,
            metrics: Arc::new(SinkMetrics::new()),
        }
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    pub fn metrics(&self) -> &Arc<SinkMetrics> {
        &self.metrics
    }

    /// Run `op` against one sink, converting a panic into an error
    fn isolated<F>(sink: &Arc<dyn Sink>, idx: usize, phase: &str, op: F) -> Result<()>
    where
        F: FnOnce(&dyn Sink) -> Result<()>,
    {
        match catch_unwind(AssertUnwindSafe(|| op(sink.as_ref()))) {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                eprintln!(
                    "[LOGGER ERROR] Sink #{} ({}) {} failed: {}",
                    idx,
                    sink.name(),
                    phase,
                    e
                );
                Err(e)
            }
            Err(panic_info) => {
                let panic_msg = panic_message(panic_info.as_ref());
                eprintln!(
                    "[LOGGER CRITICAL] Sink #{} ({}) panicked during {}: {}. \
                     Other sinks continue to function.",
                    idx,
                    sink.name(),
                    phase,
                    panic_msg
                );
                Err(LoggerError::sink_panicked(sink.name(), panic_msg))
            }
        }
    }
}

impl Sink for Tee {
    fn enabled(&self, level: Level) -> bool {
        self.sinks.iter().any(|sink| sink.enabled(level))
    }

    fn write(&self, record: &Record) -> Result<()> {
        let mut first_error = None;

        for (idx, sink) in self.sinks.iter().enumerate() {
            if !sink.enabled(record.level) {
                continue;
            }
            if let Err(e) = Self::isolated(sink, idx, "write", |s| s.write(record)) {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            None => {
                self.metrics.record_written();
                Ok(())
            }
            Some(e) => {
                self.metrics.record_write_failure();
                Err(e)
            }
        }
    }

    fn sync(&self, timeout: Duration) -> Result<()> {
        let mut first_error = None;

        for (idx, sink) in self.sinks.iter().enumerate() {
            if let Err(e) = Self::isolated(sink, idx, "sync", |s| s.sync(timeout)) {
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            None => Ok(()),
            Some(e) => {
                self.metrics.record_sync_failure();
                Err(e)
            }
        }
    }

    fn name(&self) -> &str {
        "tee"
    }
}
