//! Sink implementations

pub mod console;
pub mod remote;

pub use console::ConsoleSink;
pub use remote::{
    InMemoryTracker, RemoteTracker, RemoteTrackerSink, TrackerConfig, TrackerEvent,
    DEFAULT_FLUSH_TIMEOUT,
};

pub use crate::core::Sink;
