//! Logger configuration consumed from the host application

use super::level::Level;
use crate::encoder::ColorMode;
use serde::{Deserialize, Serialize};

/// Environment variable read by [`LoggerConfig::from_env`]
pub const LEVEL_ENV_VAR: &str = "LOG_LEVEL";

/// Options a host application hands to the logger.
///
/// Loading is left to the host; this type only describes the shape, so it
/// can be embedded in whatever configuration format the host uses.
///
/// ```
/// use tee_logger::{Level, LoggerConfig};
///
/// let config: LoggerConfig = serde_json::from_str(r#"{"level": "warn"}"#).unwrap();
/// assert_eq!(config.min_level(), Level::Warn);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// One of `debug`, `info`, `warn`, `error`, `fatal`, `panic`; anything else means `debug`
    pub level: String,
    pub color: ColorMode,
    /// Makes `dpanic` records panic after being written
    pub development: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "debug".to_string(),
            color: ColorMode::Auto,
            development: false,
        }
    }
}

impl LoggerConfig {
    /// Defaults, with the level taken from `LOG_LEVEL` when set
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(level) = std::env::var(LEVEL_ENV_VAR) {
            config.level = level;
        }
        config
    }

    pub fn min_level(&self) -> Level {
        Level::from_config(&self.level)
    }
}
