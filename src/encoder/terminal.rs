//! Terminal capability detection
//!
//! Decides whether a stream is a real console and, if so, makes sure ANSI
//! escape sequences are interpreted on it. Windows consoles need virtual
//! terminal processing switched on explicitly; other platforms interpret
//! escapes natively, so their implementation is a no-op.

use serde::{Deserialize, Serialize};
use std::io::IsTerminal;
use std::sync::OnceLock;

static VIRTUAL_TERMINAL: OnceLock<bool> = OnceLock::new();

/// Returns true only for a console device with ANSI processing available.
///
/// Redirected files and pipes report false. The first successful console
/// check enables virtual terminal processing; if that fails, this and every
/// later call report false so callers fall back to plain output.
pub fn is_terminal<S: IsTerminal>(stream: &S) -> bool {
    if !stream.is_terminal() {
        return false;
    }
    *VIRTUAL_TERMINAL.get_or_init(platform::enable_virtual_terminal)
}

#[cfg(windows)]
mod platform {
    pub(super) fn enable_virtual_terminal() -> bool {
        match colored::control::set_virtual_terminal(true) {
            Ok(()) => true,
            Err(()) => {
                eprintln!(
                    "[LOGGER WARNING] Could not enable virtual terminal processing, \
                     console output will not be colored."
                );
                false
            }
        }
    }
}

#[cfg(not(windows))]
mod platform {
    pub(super) fn enable_virtual_terminal() -> bool {
        true
    }
}

/// Whether the console encoder should emit color codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Color when the stream is a terminal and `NO_COLOR` is unset
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    /// Resolve this mode against a concrete output stream
    pub fn resolve<S: IsTerminal>(&self, stream: &S) -> bool {
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto => !no_color_requested() && is_terminal(stream),
        }
    }
}

fn no_color_requested() -> bool {
    std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regular_file_is_not_terminal() {
        let file = tempfile::tempfile().expect("temp file");
        assert!(!is_terminal(&file));
    }

    #[test]
    fn test_auto_mode_on_file_is_plain() {
        let file = tempfile::tempfile().expect("temp file");
        assert!(!ColorMode::Auto.resolve(&file));
    }

    #[test]
    fn test_explicit_modes_ignore_stream() {
        let file = tempfile::tempfile().expect("temp file");
        assert!(ColorMode::Always.resolve(&file));
        assert!(!ColorMode::Never.resolve(&file));
    }

    #[test]
    fn test_color_mode_serde() {
        let mode: ColorMode = serde_json::from_str("\"never\"").expect("deserialize");
        assert_eq!(mode, ColorMode::Never);
    }
}
