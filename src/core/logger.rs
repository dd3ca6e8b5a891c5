//! Main logger implementation

use super::{
    config::LoggerConfig,
    error::{LoggerError, Result},
    field::Field,
    level::Level,
    metrics::SinkMetrics,
    record::{Caller, Record, RecordOrigin},
    recovery::{self, LoggedPanic},
    sink::Sink,
    tee::Tee,
};
use crate::encoder::{ColorMode, EncoderConfig};
use crate::sinks::{ConsoleSink, RemoteTrackerSink};
use std::backtrace::Backtrace;
use std::io::Write;
use std::panic::{catch_unwind, panic_any, resume_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

/// Default deadline for [`Logger::sync`]
pub const DEFAULT_SYNC_TIMEOUT: Duration = Duration::from_secs(5);

/// Exit status used by [`Logger::fatal`]
pub const FATAL_EXIT_CODE: i32 = 1;

/// Handle over a tee of sinks plus the context fields of this logger.
///
/// Cloning is cheap and shares the sinks. [`Logger::with`] derives a child
/// carrying extra fields; the parent is never affected.
#[derive(Clone)]
pub struct Logger {
    core: Arc<Tee>,
    context: Arc<Vec<Field>>,
    development: bool,
    remote_attached: bool,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("sinks", &self.core.len())
            .field("context", &self.context)
            .field("development", &self.development)
            .field("remote_attached", &self.remote_attached)
            .finish()
    }
}

impl Logger {
    /// Console-only logger on stdout at `Debug`, color decided by terminal detection
    pub fn console() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use tee_logger::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .min_level(Level::Info)
    ///     .color_mode(ColorMode::Never)
    ///     .writer(std::io::sink())
    ///     .build()
    ///     .unwrap();
    /// logger.info("ready", &[Field::int("port", 8080)]);
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Whether any sink would accept a record at `level`.
    ///
    /// Callers may use this to skip building expensive fields.
    pub fn enabled(&self, level: Level) -> bool {
        self.core.enabled(level)
    }

    pub fn metrics(&self) -> &SinkMetrics {
        self.core.metrics()
    }

    pub fn is_development(&self) -> bool {
        self.development
    }

    pub fn has_remote(&self) -> bool {
        self.remote_attached
    }

    /// Child logger whose records carry `fields` after this logger's own
    pub fn with(&self, fields: &[Field]) -> Self {
        let mut context = Vec::with_capacity(self.context.len() + fields.len());
        context.extend_from_slice(&self.context);
        context.extend_from_slice(fields);
        Self {
            context: Arc::new(context),
            ..self.clone()
        }
    }

    /// One-way upgrade adding a remote tracker behind the existing sinks.
    ///
    /// Must happen before the logger is shared with concurrent callers.
    pub fn attach_remote(self, remote: RemoteTrackerSink) -> Result<Self> {
        if self.remote_attached {
            return Err(LoggerError::AlreadyUpgraded);
        }
        let existing: Arc<dyn Sink> = self.core;
        let core = Tee::new(vec![existing, Arc::new(remote)]);
        Ok(Self {
            core: Arc::new(core),
            context: self.context,
            development: self.development,
            remote_attached: true,
        })
    }

    /// Log at `level`, then apply the level's control flow: `Panic` (and
    /// `DPanic` in development mode) panics, `Fatal` exits the process.
    #[track_caller]
    pub fn log(&self, level: Level, message: impl AsRef<str>, fields: &[Field]) {
        let message = message.as_ref();
        if self.enabled(level) {
            let record = self.record(level, Caller::here(), message, fields);
            self.write(&record);
        }

        match level {
            Level::DPanic if self.development => self.raise(message),
            Level::Panic => self.raise(message),
            Level::Fatal => self.exit(),
            _ => {}
        }
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl AsRef<str>, fields: &[Field]) {
        self.log(Level::Debug, message, fields);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl AsRef<str>, fields: &[Field]) {
        self.log(Level::Info, message, fields);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl AsRef<str>, fields: &[Field]) {
        self.log(Level::Warn, message, fields);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl AsRef<str>, fields: &[Field]) {
        self.log(Level::Error, message, fields);
    }

    /// Logs; in development mode it then panics like [`Logger::panic`]
    #[inline]
    #[track_caller]
    pub fn dpanic(&self, message: impl AsRef<str>, fields: &[Field]) {
        self.log(Level::DPanic, message, fields);
    }

    /// Logs, then panics with a [`LoggedPanic`] payload even when no sink
    /// accepted the record
    #[track_caller]
    pub fn panic(&self, message: impl AsRef<str>, fields: &[Field]) -> ! {
        self.log(Level::Panic, message.as_ref(), fields);
        self.raise(message.as_ref())
    }

    /// Logs, flushes what it can, then exits with [`FATAL_EXIT_CODE`]
    #[track_caller]
    pub fn fatal(&self, message: impl AsRef<str>, fields: &[Field]) -> ! {
        self.log(Level::Fatal, message, fields);
        self.exit()
    }

    pub fn sync(&self) -> Result<()> {
        self.sync_timeout(DEFAULT_SYNC_TIMEOUT)
    }

    /// Flush every sink; remote trackers wait at most `timeout`
    pub fn sync_timeout(&self, timeout: Duration) -> Result<()> {
        self.core.sync(timeout)
    }

    /// Run `f`, logging any panic it raises.
    ///
    /// A panic becomes one `Error` record with the panic text and the stack
    /// trace of the panic site. Panics raised by this logger's own
    /// panic-level calls were already delivered to the remote tracker, so
    /// their recovery record is kept off it. With `rethrow` the original
    /// payload is resumed after logging; otherwise `None` is returned.
    ///
    /// ```
    /// use tee_logger::prelude::*;
    ///
    /// let logger = Logger::builder().writer(std::io::sink()).build().unwrap();
    /// let result = logger.recover(false, || -> u32 { panic!("worker crashed") });
    /// assert_eq!(result, None);
    /// ```
    #[track_caller]
    pub fn recover<F, R>(&self, rethrow: bool, f: F) -> Option<R>
    where
        F: FnOnce() -> R,
    {
        let caller = Caller::here();
        recovery::install_panic_hook();

        match catch_unwind(AssertUnwindSafe(f)) {
            Ok(value) => Some(value),
            Err(payload) => {
                let origin = if payload.is::<LoggedPanic>() {
                    RecordOrigin::ReportedPanic
                } else {
                    RecordOrigin::CallSite
                };
                let trace = recovery::take_panic_trace()
                    .unwrap_or_else(|| Backtrace::force_capture().to_string());
                let fields = [
                    Field::string("panic", recovery::panic_message(payload.as_ref())),
                    Field::stack_trace("stack", trace),
                ];

                if self.enabled(Level::Error) {
                    let record = self
                        .record(Level::Error, caller, "recovered panic", &fields)
                        .with_origin(origin);
                    self.write(&record);
                }

                if rethrow {
                    resume_unwind(payload);
                }
                None
            }
        }
    }

    fn record(&self, level: Level, caller: Caller, message: &str, fields: &[Field]) -> Record {
        let mut all = Vec::with_capacity(self.context.len() + fields.len());
        all.extend_from_slice(&self.context);
        all.extend_from_slice(fields);
        Record::new(level, caller, message, all)
    }

    /// Sink failures stop here; the tee has already reported them
    fn write(&self, record: &Record) {
        let _ = self.core.write(record);
    }

    fn raise(&self, message: &str) -> ! {
        recovery::install_panic_hook();
        panic_any(LoggedPanic {
            message: message.to_string(),
        })
    }

    fn exit(&self) -> ! {
        if let Err(e) = self.sync() {
            eprintln!("[LOGGER ERROR] Failed to flush before exit: {}", e);
        }
        std::process::exit(FATAL_EXIT_CODE)
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use tee_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .config(&LoggerConfig::default())
///     .writer(std::io::sink())
///     .build()
///     .unwrap();
/// assert!(logger.enabled(Level::Debug));
/// ```
pub struct LoggerBuilder {
    min_level: Level,
    color: ColorMode,
    writer: Option<Box<dyn Write + Send>>,
    console: bool,
    development: bool,
    sinks: Vec<Arc<dyn Sink>>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            min_level: Level::Debug,
            color: ColorMode::Auto,
            writer: None,
            console: true,
            development: false,
            sinks: Vec::new(),
        }
    }

    /// Apply level, color and development settings from a config
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: &LoggerConfig) -> Self {
        self.min_level = config.min_level();
        self.color = config.color;
        self.development = config.development;
        self
    }

    /// Minimum level of the console sink
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn color_mode(mut self, color: ColorMode) -> Self {
        self.color = color;
        self
    }

    /// Send console output to `writer` instead of stdout.
    ///
    /// Terminal detection only applies to stdout, so `ColorMode::Auto`
    /// renders plain lines on a custom writer.
    #[must_use = "builder methods return a new value"]
    pub fn writer<W: Write + Send + 'static>(mut self, writer: W) -> Self {
        self.writer = Some(Box::new(writer));
        self
    }

    /// Leave out the console sink entirely
    #[must_use = "builder methods return a new value"]
    pub fn without_console(mut self) -> Self {
        self.console = false;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn development(mut self, development: bool) -> Self {
        self.development = development;
        self
    }

    /// Add a sink after the console
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sinks.push(Arc::new(sink));
        self
    }

    /// Build the Logger
    pub fn build(self) -> Result<Logger> {
        let mut sinks: Vec<Arc<dyn Sink>> = Vec::with_capacity(self.sinks.len() + 1);

        if self.console {
            let console = match self.writer {
                Some(writer) => {
                    let config = EncoderConfig {
                        color: self.color == ColorMode::Always,
                        ..EncoderConfig::default()
                    };
                    ConsoleSink::with_writer(writer, config, self.min_level)
                }
                None => ConsoleSink::stdout(self.min_level, self.color),
            };
            sinks.push(Arc::new(console));
        }
        sinks.extend(self.sinks);

        if sinks.is_empty() {
            return Err(LoggerError::config("LoggerBuilder", "no sinks configured"));
        }

        Ok(Logger {
            core: Arc::new(Tee::new(sinks)),
            context: Arc::new(Vec::new()),
            development: self.development,
            remote_attached: false,
        })
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::{InMemoryTracker, TrackerConfig};
    use parking_lot::Mutex;

    /// Shared in-memory stream
    #[derive(Clone, Default)]
    struct Buffer(Arc<Mutex<Vec<u8>>>);

    impl Write for Buffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl Buffer {
        fn lines(&self) -> Vec<String> {
            String::from_utf8(self.0.lock().clone())
                .unwrap()
                .lines()
                .map(String::from)
                .collect()
        }
    }

    fn logger(level: Level) -> (Logger, Buffer) {
        let buffer = Buffer::default();
        let logger = Logger::builder()
            .min_level(level)
            .color_mode(ColorMode::Never)
            .writer(buffer.clone())
            .build()
            .unwrap();
        (logger, buffer)
    }

    #[test]
    fn test_builder_without_sinks_fails() {
        let result = Logger::builder().without_console().build();
        assert!(matches!(result, Err(LoggerError::InvalidConfiguration { .. })));
    }

    #[test]
    fn test_min_level_filters() {
        let (logger, buffer) = logger(Level::Warn);
        logger.debug("hidden", &[]);
        logger.info("hidden", &[]);
        logger.warn("shown", &[]);
        logger.error("shown", &[]);

        assert_eq!(buffer.lines().len(), 2);
        assert!(!logger.enabled(Level::Info));
        assert!(logger.enabled(Level::Error));
    }

    #[test]
    fn test_caller_points_at_call_site() {
        let (logger, buffer) = logger(Level::Debug);
        logger.info("where", &[]);
        let line = &buffer.lines()[0];
        assert!(line.contains("core/logger.rs:"), "{}", line);
    }

    #[test]
    fn test_child_fields_do_not_leak() {
        let (parent, buffer) = logger(Level::Debug);
        let child = parent.with(&[Field::string("request_id", "abc")]);
        let sibling = parent.with(&[Field::int("worker", 2)]);

        child.info("child", &[Field::bool("cached", true)]);
        parent.info("parent", &[]);
        sibling.info("sibling", &[]);

        let lines = buffer.lines();
        assert!(lines[0].ends_with("{request_id=abc, cached=true}"));
        assert!(lines[1].ends_with("\tparent"));
        assert!(lines[2].ends_with("{worker=2}"));
    }

    #[test]
    fn test_dpanic_only_panics_in_development() {
        let (logger, buffer) = logger(Level::Debug);
        logger.dpanic("tolerated", &[]);
        assert_eq!(buffer.lines().len(), 1);

        let dev = Logger::builder()
            .development(true)
            .writer(std::io::sink())
            .build()
            .unwrap();
        let payload = catch_unwind(AssertUnwindSafe(|| dev.dpanic("strict", &[]))).unwrap_err();
        assert!(payload.is::<LoggedPanic>());
    }

    #[test]
    fn test_panic_raises_even_when_disabled() {
        let logger = Logger::builder()
            .min_level(Level::Fatal)
            .writer(std::io::sink())
            .build()
            .unwrap();
        assert!(!logger.enabled(Level::Panic));

        let payload = catch_unwind(AssertUnwindSafe(|| logger.panic("invariant broken", &[])))
            .unwrap_err();
        let logged = payload.downcast_ref::<LoggedPanic>().expect("sentinel payload");
        assert_eq!(logged.message, "invariant broken");
    }

    #[test]
    fn test_attach_remote_is_one_way() {
        let (logger, _) = logger(Level::Debug);
        let remote = || RemoteTrackerSink::new(TrackerConfig::default(), InMemoryTracker::new());

        let upgraded = logger.attach_remote(remote().unwrap()).unwrap();
        assert!(upgraded.has_remote());

        let err = upgraded.attach_remote(remote().unwrap()).unwrap_err();
        assert!(matches!(err, LoggerError::AlreadyUpgraded));
    }

    #[test]
    fn test_remote_receives_only_errors() {
        let (logger, buffer) = logger(Level::Debug);
        let tracker = InMemoryTracker::new();
        let logger = logger
            .attach_remote(RemoteTrackerSink::new(TrackerConfig::default(), tracker.clone()).unwrap())
            .unwrap();

        logger.info("fine", &[]);
        logger.error("broken", &[Field::int("code", 500)]);

        assert_eq!(buffer.lines().len(), 2);
        let events = tracker.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].message, "broken");
        assert_eq!(events[0].extra.get("code").map(String::as_str), Some("500"));
    }

    #[test]
    fn test_recover_returns_value_without_panic() {
        let (logger, buffer) = logger(Level::Debug);
        assert_eq!(logger.recover(false, || 41 + 1), Some(42));
        assert!(buffer.lines().is_empty());
    }

    #[test]
    fn test_recover_logs_panic_once() {
        let (logger, buffer) = logger(Level::Debug);
        let tracker = InMemoryTracker::new();
        let logger = logger
            .attach_remote(RemoteTrackerSink::new(TrackerConfig::default(), tracker.clone()).unwrap())
            .unwrap();

        let result: Option<()> = logger.recover(false, || panic!("worker crashed"));
        assert!(result.is_none());

        let lines = buffer.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("ERROR"));
        assert!(lines[0].contains("panic=worker crashed"));
        assert!(lines[0].contains("stack=panicked at "));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_recover_does_not_double_report_logger_panics() {
        let (logger, buffer) = logger(Level::Debug);
        let tracker = InMemoryTracker::new();
        let logger = logger
            .attach_remote(RemoteTrackerSink::new(TrackerConfig::default(), tracker.clone()).unwrap())
            .unwrap();

        let result: Option<()> = logger.recover(false, || logger.panic("bad state", &[]));
        assert!(result.is_none());

        // panic record plus recovery record on the console, one tracker event
        assert_eq!(buffer.lines().len(), 2);
        let events = tracker.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].level, Level::Panic);
    }

    #[test]
    fn test_recover_rethrows() {
        let (logger, buffer) = logger(Level::Debug);
        let payload = catch_unwind(AssertUnwindSafe(|| {
            logger.recover(true, || -> () { panic!("again") })
        }))
        .unwrap_err();

        assert_eq!(recovery::panic_message(payload.as_ref()), "again");
        assert_eq!(buffer.lines().len(), 1);
    }
}
