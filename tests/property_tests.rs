//! Property-based tests for tee_logger using proptest

use proptest::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tee_logger::prelude::*;
use tee_logger::{Caller, ConsoleEncoder, EncoderConfig, Record, Tee};

fn any_level() -> impl Strategy<Value = Level> {
    prop_oneof![
        Just(Level::Debug),
        Just(Level::Info),
        Just(Level::Warn),
        Just(Level::Error),
        Just(Level::DPanic),
        Just(Level::Panic),
        Just(Level::Fatal),
    ]
}

/// Level-threshold sink that drops everything it accepts
struct Threshold(Level);

impl Sink for Threshold {
    fn enabled(&self, level: Level) -> bool {
        level >= self.0
    }

    fn write(&self, _record: &Record) -> Result<()> {
        Ok(())
    }

    fn sync(&self, _timeout: Duration) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "threshold"
    }
}

// ============================================================================
// Level Tests
// ============================================================================

proptest! {
    /// Test that Level string conversions roundtrip correctly
    #[test]
    fn test_level_str_roundtrip(level in any_level()) {
        let parsed: Level = level.as_str().parse().unwrap();
        prop_assert_eq!(level, parsed);

        let lower: Level = level.as_str().to_lowercase().parse().unwrap();
        prop_assert_eq!(level, lower);
    }

    /// Test that Level ordering follows the discriminants
    #[test]
    fn test_level_ordering(level1 in any_level(), level2 in any_level()) {
        let val1 = level1 as u8;
        let val2 = level2 as u8;

        prop_assert_eq!(level1 <= level2, val1 <= val2);
        prop_assert_eq!(level1 > level2, val1 > val2);
    }

    /// Unknown configuration strings fall back to Debug
    #[test]
    fn test_from_config_never_fails(s in "[a-z]{0,12}") {
        let level = Level::from_config(&s);
        if !["info", "warn", "error", "fatal", "panic"].contains(&s.as_str()) {
            prop_assert_eq!(level, Level::Debug);
        }
    }
}

// ============================================================================
// Tee Tests
// ============================================================================

proptest! {
    /// A tee accepts a level iff at least one of its sinks does
    #[test]
    fn test_tee_enabled_is_or(
        thresholds in prop::collection::vec(any_level(), 0..6),
        level in any_level(),
    ) {
        let sinks: Vec<Arc<dyn Sink>> = thresholds
            .iter()
            .map(|t| Arc::new(Threshold(*t)) as Arc<dyn Sink>)
            .collect();
        let tee = Tee::new(sinks);

        let expected = thresholds.iter().any(|t| level >= *t);
        prop_assert_eq!(tee.enabled(level), expected);
    }
}

// ============================================================================
// Encoder Tests
// ============================================================================

proptest! {
    /// Plain output never contains escape bytes and is exactly one line
    #[test]
    fn test_plain_line_is_single_and_uncolored(
        level in any_level(),
        message in any::<String>(),
        key in any::<String>(),
        value in any::<String>(),
        scope in any::<String>(),
        nested_key in any::<String>(),
        bytes in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let record = Record::new(
            level,
            Caller::new("src/lib.rs", 1),
            &message,
            vec![
                Field::string(key, value),
                Field::namespace(scope),
                Field::byte_string("raw", bytes),
                Field::object("obj", vec![Field::bool(nested_key, true)]),
            ],
        );
        let line = ConsoleEncoder::new(EncoderConfig::plain()).encode(&record);

        prop_assert!(!line.contains('\x1b'));
        prop_assert!(line.ends_with('\n'));
        let body = &line[..line.len() - 1];
        prop_assert!(!body.contains('\n'));
        prop_assert!(!body.contains('\r'));
        prop_assert_eq!(body.matches('\t').count(), 2);
        prop_assert!(body.chars().all(|c| c == '\t' || !c.is_control()));
    }

    /// Color only ever wraps the level token
    #[test]
    fn test_colored_line_differs_only_in_level(level in any_level(), message in "[ -~]{0,40}") {
        let record = Record::new(level, Caller::new("src/lib.rs", 1), &message, Vec::new());
        let plain = ConsoleEncoder::new(EncoderConfig::plain()).encode(&record);
        let colored = ConsoleEncoder::new(EncoderConfig::colored()).encode(&record);

        let token = format!("{:<6}", level.as_str());
        let wrapped = format!("\x1b[{}m{}\x1b[0m", level.color_code().to_fg_str(), token);
        prop_assert_eq!(colored.replacen(&wrapped, &token, 1), plain);
    }
}
