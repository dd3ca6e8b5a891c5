//! Core logger types and traits

pub mod config;
pub mod error;
pub mod field;
pub mod level;
pub mod logger;
pub mod metrics;
pub mod record;
pub mod recovery;
pub mod sink;
pub mod tee;
pub mod timestamp;

pub use config::LoggerConfig;
pub use error::{LoggerError, Result};
pub use field::{Field, FieldValue};
pub use level::Level;
pub use logger::{Logger, LoggerBuilder, DEFAULT_SYNC_TIMEOUT, FATAL_EXIT_CODE};
pub use metrics::SinkMetrics;
pub use record::{Caller, Record, RecordOrigin};
pub use recovery::LoggedPanic;
pub use sink::Sink;
pub use tee::Tee;
pub use timestamp::TimestampFormat;
