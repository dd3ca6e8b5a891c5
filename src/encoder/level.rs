//! Level token encoding, plain and colored

use crate::core::Level;

/// SGR reset appended after every colored token
pub const RESET: &str = "\x1b[0m";

/// Fixed-width display token for a level
pub fn encode_level(level: Level) -> &'static str {
    match level {
        Level::Debug => "DEBUG ",
        Level::Info => "INFO  ",
        Level::Warn => "WARN  ",
        Level::Error => "ERROR ",
        Level::DPanic => "DPANIC",
        Level::Panic => "PANIC ",
        Level::Fatal => "FATAL ",
    }
}

/// [`encode_level`] wrapped in the level's foreground color and a reset
pub fn encode_level_color(level: Level) -> String {
    let token = encode_level(level);
    let fg = level.color_code().to_fg_str();

    let mut out = String::with_capacity(token.len() + fg.len() + RESET.len() + 3);
    out.push_str("\x1b[");
    out.push_str(&fg);
    out.push('m');
    out.push_str(token);
    out.push_str(RESET);
    out
}
