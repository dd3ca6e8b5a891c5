//! Console sink implementation

use crate::core::{Level, LoggerError, Record, Result, Sink};
use crate::encoder::{ColorMode, ConsoleEncoder, EncoderConfig};
use parking_lot::Mutex;
use std::io::Write;
use std::time::Duration;

/// Writes encoded lines to a byte stream.
///
/// The stream is guarded by a mutex held only while one finished line is
/// written, so concurrent records never interleave.
pub struct ConsoleSink {
    writer: Mutex<Box<dyn Write + Send>>,
    encoder: ConsoleEncoder,
    min_level: Level,
}

impl ConsoleSink {
    /// Sink on standard output. `ColorMode::Auto` runs terminal detection on
    /// stdout once, here.
    pub fn stdout(min_level: Level, color: ColorMode) -> Self {
        let stdout = std::io::stdout();
        let config = EncoderConfig {
            color: color.resolve(&stdout),
            ..EncoderConfig::default()
        };
        Self::with_writer(stdout, config, min_level)
    }

    pub fn stderr(min_level: Level, color: ColorMode) -> Self {
        let stderr = std::io::stderr();
        let config = EncoderConfig {
            color: color.resolve(&stderr),
            ..EncoderConfig::default()
        };
        Self::with_writer(stderr, config, min_level)
    }

    /// Sink on an arbitrary stream with a fixed encoder configuration
    ///
    /// # Example
    ///
    /// ```
    /// use tee_logger::{ConsoleSink, EncoderConfig, Level};
    ///
    /// let sink = ConsoleSink::with_writer(std::io::sink(), EncoderConfig::plain(), Level::Info);
    /// ```
    pub fn with_writer<W>(writer: W, config: EncoderConfig, min_level: Level) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            writer: Mutex::new(Box::new(writer)),
            encoder: ConsoleEncoder::new(config),
            min_level,
        }
    }

    pub fn encoder(&self) -> &ConsoleEncoder {
        &self.encoder
    }

    pub fn min_level(&self) -> Level {
        self.min_level
    }
}

impl Sink for ConsoleSink {
    fn enabled(&self, level: Level) -> bool {
        level >= self.min_level
    }

    fn write(&self, record: &Record) -> Result<()> {
        let line = self.encoder.encode(record);
        let mut writer = self.writer.lock();
        writer
            .write_all(line.as_bytes())
            .map_err(|e| LoggerError::io_operation("writing console line", "write failed", e))
    }

    fn sync(&self, _timeout: Duration) -> Result<()> {
        self.writer
            .lock()
            .flush()
            .map_err(|e| LoggerError::io_operation("flushing console", "flush failed", e))
    }

    fn name(&self) -> &str {
        "console"
    }
}
