//! Logging macros for ergonomic log message formatting.
//!
//! These macros format the message like `format!` and optionally take a
//! bracketed list of fields before it.
//!
//! # Examples
//!
//! ```
//! use tee_logger::prelude::*;
//! use tee_logger::info;
//!
//! let logger = Logger::builder().writer(std::io::sink()).build().unwrap();
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! info!(logger, [Field::int("port", port), Field::bool("tls", true)], "listening");
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use tee_logger::prelude::*;
/// # let logger = Logger::builder().writer(std::io::sink()).build().unwrap();
/// use tee_logger::log;
/// log!(logger, Level::Info, "Simple message");
/// log!(logger, Level::Error, "Error code: {}", 500);
/// log!(logger, Level::Warn, [Field::string("path", "/tmp")], "slow disk");
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, [$($field:expr),* $(,)?], $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+), &[$($field),*])
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+), &[])
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use tee_logger::prelude::*;
/// # let logger = Logger::builder().writer(std::io::sink()).build().unwrap();
/// use tee_logger::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use tee_logger::prelude::*;
/// # let logger = Logger::builder().writer(std::io::sink()).build().unwrap();
/// use tee_logger::error;
/// error!(logger, [Field::int("status", 500)], "request failed: {}", "timeout");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)+)
    };
}

/// Log a development-panic message; panics only in development mode.
#[macro_export]
macro_rules! dpanic {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::DPanic, $($arg)+)
    };
}

/// Log a fatal message and exit the process.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Fatal, $($arg)+)
    };
}
