//! Log record structure

use super::field::Field;
use super::level::Level;
use chrono::{DateTime, Utc};
use std::fmt;
use std::panic::Location;

/// Source location of a log call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub file: &'static str,
    pub line: u32,
}

impl Caller {
    pub fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }

    /// Location of the `#[track_caller]` chain's outermost caller
    #[track_caller]
    pub fn here() -> Self {
        let location = Location::caller();
        Self::from(location)
    }

    /// Last directory plus file name, e.g. `core/logger.rs`
    pub fn trimmed_file(&self) -> &'static str {
        let file = self.file;
        let mut separators = file
            .char_indices()
            .rev()
            .filter(|(_, c)| *c == '/' || *c == '\\');
        match (separators.next(), separators.next()) {
            (Some(_), Some((idx, _))) => &file[idx + 1..],
            _ => file,
        }
    }
}

impl From<&'static Location<'static>> for Caller {
    fn from(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), location.line())
    }
}

impl fmt::Display for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.trimmed_file(), self.line)
    }
}

/// Where a record came from, as far as remote reporting is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordOrigin {
    #[default]
    CallSite,
    /// Describes a panic raised by the logger itself, which the remote
    /// tracker already received through the panic-level record
    ReportedPanic,
}

/// One log event. The message is stored as given; encoders escape it.
#[derive(Debug, Clone)]
pub struct Record {
    pub level: Level,
    pub timestamp: DateTime<Utc>,
    pub caller: Caller,
    pub message: String,
    pub fields: Vec<Field>,
    pub origin: RecordOrigin,
}

impl Record {
    pub fn new(level: Level, caller: Caller, message: &str, fields: Vec<Field>) -> Self {
        Self {
            level,
            timestamp: Utc::now(),
            caller,
            message: message.to_string(),
            fields,
            origin: RecordOrigin::CallSite,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_origin(mut self, origin: RecordOrigin) -> Self {
        self.origin = origin;
        self
    }
}
