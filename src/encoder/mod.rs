//! Console rendering: level tokens, line encoding and terminal detection

pub mod console;
pub mod level;
pub mod terminal;

pub use console::{flatten_fields, ConsoleEncoder};
pub use level::{encode_level, encode_level_color};
pub use terminal::{is_terminal, ColorMode};

use crate::core::TimestampFormat;

/// Formatting choices fixed when a console sink is built
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EncoderConfig {
    /// Wrap level tokens in ANSI color codes
    pub color: bool,
    pub time_format: TimestampFormat,
}

impl EncoderConfig {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn colored() -> Self {
        Self {
            color: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_time_format(mut self, format: TimestampFormat) -> Self {
        self.time_format = format;
        self
    }
}
