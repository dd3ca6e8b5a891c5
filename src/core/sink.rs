//! Sink trait for log destinations

use super::{error::Result, level::Level, record::Record};
use std::time::Duration;

/// A destination for finished log records.
///
/// Sinks are shared between threads, so every method takes `&self`; a sink
/// that owns a stream serializes access to it internally.
pub trait Sink: Send + Sync {
    /// Whether a record at `level` would be accepted
    fn enabled(&self, level: Level) -> bool;

    fn write(&self, record: &Record) -> Result<()>;

    /// Flush buffered output, waiting at most `timeout` where that applies
    fn sync(&self, timeout: Duration) -> Result<()>;

    fn name(&self) -> &str;
}
