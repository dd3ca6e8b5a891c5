//! # Tee Logger
//!
//! A structured logging facade: leveled, field-tagged records rendered to a
//! console with optional ANSI color, fanned out through a tee of sinks that
//! can include a remote error tracker.
//!
//! ## Features
//!
//! - **Console Rendering**: one sortable, scrape-friendly line per record
//! - **Terminal Detection**: color only on real consoles, with Windows
//!   virtual-terminal processing enabled automatically
//! - **Tee Core**: per-sink level filtering with failure isolation
//! - **Panic Bridge**: recovered panics are logged and reported exactly once
//!
//! ```
//! use tee_logger::prelude::*;
//!
//! let logger = Logger::builder()
//!     .color_mode(ColorMode::Never)
//!     .writer(std::io::sink())
//!     .build()
//!     .unwrap();
//!
//! logger.info("start", &[Field::int("port", 8080)]);
//! ```

pub mod core;
pub mod encoder;
pub mod global;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        Field, FieldValue, Level, Logger, LoggerBuilder, LoggerConfig, LoggerError, Result, Sink,
    };
    pub use crate::encoder::ColorMode;
    pub use crate::sinks::{ConsoleSink, InMemoryTracker, RemoteTrackerSink, TrackerConfig};
}

pub use crate::core::{
    Caller, Field, FieldValue, Level, LoggedPanic, Logger, LoggerBuilder, LoggerConfig,
    LoggerError, Record, RecordOrigin, Result, Sink, SinkMetrics, Tee, TimestampFormat,
    DEFAULT_SYNC_TIMEOUT, FATAL_EXIT_CODE,
};
pub use encoder::{ColorMode, ConsoleEncoder, EncoderConfig};
pub use sinks::{
    ConsoleSink, InMemoryTracker, RemoteTracker, RemoteTrackerSink, TrackerConfig, TrackerEvent,
};
