//! Process-wide logger
//!
//! A console-only logger is built on first use. It can be replaced once
//! with [`init`] and upgraded once with [`attach_remote`]; both have to
//! happen before other threads start logging. Code that can carry a
//! [`Logger`] handle should prefer that over these functions.

use crate::core::{Field, Logger, LoggerConfig, LoggerError, Result};
use crate::sinks::RemoteTrackerSink;
use parking_lot::RwLock;
use std::sync::{Arc, LazyLock};
use std::time::Duration;

static GLOBAL: LazyLock<RwLock<Arc<Logger>>> = LazyLock::new(|| {
    // Without a console there is nowhere to report anything
    let logger = Logger::console()
        .unwrap_or_else(|e| panic!("failed to build default console logger: {}", e));
    RwLock::new(Arc::new(logger))
});

/// Current process-wide logger
pub fn logger() -> Arc<Logger> {
    GLOBAL.read().clone()
}

/// Replace the default logger with one built from `config`.
///
/// Fails once a remote tracker is attached, since that would drop it.
pub fn init(config: &LoggerConfig) -> Result<()> {
    let logger = Logger::builder().config(config).build()?;
    let mut global = GLOBAL.write();
    if global.has_remote() {
        return Err(LoggerError::AlreadyUpgraded);
    }
    *global = Arc::new(logger);
    Ok(())
}

/// One-time upgrade of the process-wide logger with a remote tracker
pub fn attach_remote(remote: RemoteTrackerSink) -> Result<()> {
    let mut global = GLOBAL.write();
    let upgraded = Logger::clone(&global).attach_remote(remote)?;
    *global = Arc::new(upgraded);
    Ok(())
}

#[track_caller]
pub fn debug(message: impl AsRef<str>, fields: &[Field]) {
    logger().debug(message, fields);
}

#[track_caller]
pub fn info(message: impl AsRef<str>, fields: &[Field]) {
    logger().info(message, fields);
}

#[track_caller]
pub fn warn(message: impl AsRef<str>, fields: &[Field]) {
    logger().warn(message, fields);
}

#[track_caller]
pub fn error(message: impl AsRef<str>, fields: &[Field]) {
    logger().error(message, fields);
}

#[track_caller]
pub fn dpanic(message: impl AsRef<str>, fields: &[Field]) {
    logger().dpanic(message, fields);
}

#[track_caller]
pub fn panic(message: impl AsRef<str>, fields: &[Field]) -> ! {
    logger().panic(message, fields)
}

#[track_caller]
pub fn fatal(message: impl AsRef<str>, fields: &[Field]) -> ! {
    logger().fatal(message, fields)
}

/// Child of the process-wide logger carrying `fields`
pub fn with(fields: &[Field]) -> Logger {
    logger().with(fields)
}

pub fn sync() -> Result<()> {
    logger().sync()
}

/// Drain buffered remote events, waiting at most `timeout`; call before exit
pub fn sync_timeout(timeout: Duration) -> Result<()> {
    logger().sync_timeout(timeout)
}

/// See [`Logger::recover`]
#[track_caller]
pub fn recover<F, R>(rethrow: bool, f: F) -> Option<R>
where
    F: FnOnce() -> R,
{
    logger().recover(rethrow, f)
}
