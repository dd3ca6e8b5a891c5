//! Remote error-tracker sink
//!
//! Forwards error-or-worse records to an external error-aggregation
//! service. The transport is not part of this crate: anything implementing
//! [`RemoteTracker`] can be plugged in.

use crate::core::{Level, LoggerError, Record, RecordOrigin, Result, Sink};
use crate::encoder::flatten_fields;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Default deadline for draining buffered tracker events
pub const DEFAULT_FLUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// Capability offered by an error-tracking client
pub trait RemoteTracker: Send + Sync {
    fn submit(&self, event: TrackerEvent);

    /// Wait for buffered events to be delivered; false if `deadline` expired
    fn flush(&self, deadline: Duration) -> bool;
}

/// One event handed to the tracker
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerEvent {
    pub level: Level,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    /// `file:line` of the log call
    pub caller: String,
    pub tags: BTreeMap<String, String>,
    /// Flattened record fields
    pub extra: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Minimum level forwarded; must be `Error` or above
    pub min_level: Level,
    pub tags: BTreeMap<String, String>,
    pub flush_timeout: Duration,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        let mut tags = BTreeMap::new();
        tags.insert("component".to_string(), "system".to_string());
        Self {
            min_level: Level::Error,
            tags,
            flush_timeout: DEFAULT_FLUSH_TIMEOUT,
        }
    }
}

impl TrackerConfig {
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    #[must_use]
    pub fn flush_timeout(mut self, timeout: Duration) -> Self {
        self.flush_timeout = timeout;
        self
    }
}

pub struct RemoteTrackerSink {
    config: TrackerConfig,
    tracker: Box<dyn RemoteTracker>,
}

impl RemoteTrackerSink {
    pub fn new<T: RemoteTracker + 'static>(config: TrackerConfig, tracker: T) -> Result<Self> {
        if config.min_level < Level::Error {
            return Err(LoggerError::config(
                "RemoteTrackerSink",
                format!("min level {} is below ERROR", config.min_level),
            ));
        }
        if config.flush_timeout.is_zero() {
            return Err(LoggerError::config(
                "RemoteTrackerSink",
                "flush timeout must be non-zero",
            ));
        }
        Ok(Self {
            config,
            tracker: Box::new(tracker),
        })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    fn event_for(&self, record: &Record) -> TrackerEvent {
        TrackerEvent {
            level: record.level,
            message: record.message.clone(),
            timestamp: record.timestamp,
            caller: format!("{}:{}", record.caller.file, record.caller.line),
            tags: self.config.tags.clone(),
            extra: flatten_fields(&record.fields).into_iter().collect(),
        }
    }
}

impl Sink for RemoteTrackerSink {
    fn enabled(&self, level: Level) -> bool {
        level >= self.config.min_level
    }

    fn write(&self, record: &Record) -> Result<()> {
        if record.origin == RecordOrigin::ReportedPanic {
            return Ok(());
        }
        self.tracker.submit(self.event_for(record));
        Ok(())
    }

    /// Waits for the shorter of `timeout` and the configured flush timeout
    fn sync(&self, timeout: Duration) -> Result<()> {
        let deadline = timeout.min(self.config.flush_timeout);
        if self.tracker.flush(deadline) {
            Ok(())
        } else {
            Err(LoggerError::flush_timeout(deadline))
        }
    }

    fn name(&self) -> &str {
        "remote-tracker"
    }
}

/// Tracker keeping submitted events in memory.
///
/// Cloning shares the event buffer, so a clone can be handed to a sink
/// while the original is kept for inspection.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTracker {
    events: std::sync::Arc<Mutex<Vec<TrackerEvent>>>,
}

impl InMemoryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TrackerEvent> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}

impl RemoteTracker for InMemoryTracker {
    fn submit(&self, event: TrackerEvent) {
        self.events.lock().push(event);
    }

    fn flush(&self, _deadline: Duration) -> bool {
        true
    }
}
