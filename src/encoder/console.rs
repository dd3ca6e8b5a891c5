//! Human-readable single-line encoder
//!
//! Produces lines of the form
//!
//! ```text
//! [2025-01-08T10:30:45.123] INFO   server/listener.rs:42	listening	{port=8080, tls=true}
//! ```
//!
//! The bracketed timestamp is UTC; the default format carries no zone
//! designator.
//!
//! The separators are part of the contract with downstream log scrapers:
//! a space after the bracketed timestamp and after the level token, a tab
//! after the caller, and a tab before the brace-enclosed field list. The
//! field list is left out entirely when no field renders.

use super::level::{encode_level, encode_level_color};
use super::EncoderConfig;
use crate::core::{Field, FieldValue, Record, TimestampFormat};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::fmt::Write;

#[derive(Debug, Clone, Default)]
pub struct ConsoleEncoder {
    config: EncoderConfig,
}

impl ConsoleEncoder {
    pub fn new(config: EncoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    /// Render one record as a newline-terminated line
    pub fn encode(&self, record: &Record) -> String {
        let mut line = String::with_capacity(128);

        line.push('[');
        line.push_str(&self.config.time_format.format(&record.timestamp));
        line.push_str("] ");

        if self.config.color {
            line.push_str(&encode_level_color(record.level));
        } else {
            line.push_str(encode_level(record.level));
        }
        line.push(' ');

        let _ = write!(line, "{}", record.caller);
        line.push('\t');
        escape_into(&record.message, &mut line);

        let pairs = flatten_fields(&record.fields);
        if !pairs.is_empty() {
            line.push('\t');
            push_pairs(&pairs, &mut line);
        }

        line.push('\n');
        line
    }
}

/// Scoped key and rendered value for every field that produces output.
///
/// Namespaces prefix the keys of all following fields; a reflected value
/// that failed to serialize becomes a `<key>Error` entry carrying the
/// failure message. Keys are escaped like values.
pub fn flatten_fields(fields: &[Field]) -> Vec<(String, String)> {
    let mut pairs = Vec::with_capacity(fields.len());
    let mut prefix = String::new();

    for field in fields {
        match &field.value {
            FieldValue::Skip => {}
            FieldValue::Namespace => {
                escape_into(&field.key, &mut prefix);
                prefix.push('.');
            }
            FieldValue::Reflect(Err(e)) => {
                let mut value = String::new();
                escape_into(e, &mut value);
                pairs.push((scoped_key(&prefix, &field.key, "Error"), value));
            }
            value => {
                let mut rendered = String::new();
                render_value(value, &mut rendered);
                pairs.push((scoped_key(&prefix, &field.key, ""), rendered));
            }
        }
    }

    pairs
}

/// `prefix` is already escaped; `key` is escaped here
fn scoped_key(prefix: &str, key: &str, suffix: &str) -> String {
    let mut out = String::with_capacity(prefix.len() + key.len() + suffix.len());
    out.push_str(prefix);
    escape_into(key, &mut out);
    out.push_str(suffix);
    out
}

fn push_pairs(pairs: &[(String, String)], out: &mut String) {
    out.push('{');
    for (idx, (key, value)) in pairs.iter().enumerate() {
        if idx > 0 {
            out.push_str(", ");
        }
        out.push_str(key);
        out.push('=');
        out.push_str(value);
    }
    out.push('}');
}

fn render_value(value: &FieldValue, out: &mut String) {
    match value {
        FieldValue::Bool(v) => {
            let _ = write!(out, "{}", v);
        }
        FieldValue::I8(v) => {
            let _ = write!(out, "{}", v);
        }
        FieldValue::I16(v) => {
            let _ = write!(out, "{}", v);
        }
        FieldValue::I32(v) => {
            let _ = write!(out, "{}", v);
        }
        FieldValue::I64(v) => {
            let _ = write!(out, "{}", v);
        }
        FieldValue::U8(v) => {
            let _ = write!(out, "{}", v);
        }
        FieldValue::U16(v) => {
            let _ = write!(out, "{}", v);
        }
        FieldValue::U32(v) => {
            let _ = write!(out, "{}", v);
        }
        FieldValue::U64(v) => {
            let _ = write!(out, "{}", v);
        }
        FieldValue::Usize(v) => {
            let _ = write!(out, "{}", v);
        }
        FieldValue::F32(v) => push_float(f64::from(*v), out),
        FieldValue::F64(v) => push_float(*v, out),
        FieldValue::Complex64(re, im) => push_complex(f64::from(*re), f64::from(*im), out),
        FieldValue::Complex128(re, im) => push_complex(*re, *im, out),
        FieldValue::String(s) => escape_into(s, out),
        FieldValue::Strings(items) => {
            out.push('[');
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push_str(", ");
                }
                escape_into(item, out);
            }
            out.push(']');
        }
        FieldValue::Binary(bytes) => out.push_str(&STANDARD.encode(bytes)),
        FieldValue::ByteString(bytes) => escape_into(&String::from_utf8_lossy(bytes), out),
        FieldValue::Duration(d) => {
            let _ = write!(out, "{:?}", d);
        }
        FieldValue::Time(t) => out.push_str(&TimestampFormat::Millis.format(t)),
        FieldValue::Object(fields) => push_pairs(&flatten_fields(fields), out),
        FieldValue::Reflect(Ok(json)) => escape_into(&json.to_string(), out),
        FieldValue::Reflect(Err(e)) => {
            out.push_str("<error: ");
            escape_into(e, out);
            out.push('>');
        }
        FieldValue::Error(msg) => escape_into(msg, out),
        FieldValue::Stack(trace) => escape_into(trace.trim_end(), out),
        FieldValue::Null => out.push_str("null"),
        FieldValue::Namespace | FieldValue::Skip => {}
    }
}

fn push_float(v: f64, out: &mut String) {
    if v.is_nan() {
        out.push_str("NaN");
    } else if v == f64::INFINITY {
        out.push_str("+Inf");
    } else if v == f64::NEG_INFINITY {
        out.push_str("-Inf");
    } else {
        let _ = write!(out, "{}", v);
    }
}

fn push_complex(re: f64, im: f64, out: &mut String) {
    push_float(re, out);
    // push_float already signs infinities
    if im.is_nan() || (im.is_finite() && im.is_sign_positive()) {
        out.push('+');
    }
    push_float(im, out);
    out.push('i');
}

/// Append `s` with every control character escaped, keeping lines printable
fn escape_into(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\u{{{:04x}}}", c as u32);
            }
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Caller, Level};
    use chrono::{TimeZone, Utc};
    use std::time::Duration;

    fn record(level: Level, message: &str, fields: Vec<Field>) -> Record {
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap()
            + chrono::Duration::milliseconds(42);
        Record::new(level, Caller::new("/srv/app/src/net/server.rs", 88), message, fields)
            .with_timestamp(ts)
    }

    fn plain() -> ConsoleEncoder {
        ConsoleEncoder::new(EncoderConfig::plain())
    }

    #[test]
    fn test_golden_line() {
        let line = plain().encode(&record(
            Level::Info,
            "start",
            vec![Field::int("port", 8080), Field::string("host", "0.0.0.0")],
        ));
        assert_eq!(
            line,
            "[2024-03-09T14:05:07.042] INFO   net/server.rs:88\tstart\t{port=8080, host=0.0.0.0}\n"
        );
    }

    #[test]
    fn test_no_fields_omits_braces() {
        let line = plain().encode(&record(Level::Warn, "idle", Vec::new()));
        assert_eq!(line, "[2024-03-09T14:05:07.042] WARN   net/server.rs:88\tidle\n");
    }

    #[test]
    fn test_color_wraps_level_only() {
        let encoder = ConsoleEncoder::new(EncoderConfig::colored());
        let line = encoder.encode(&record(Level::Error, "failed", Vec::new()));
        assert_eq!(
            line,
            "[2024-03-09T14:05:07.042] \x1b[31mERROR \x1b[0m net/server.rs:88\tfailed\n"
        );
    }

    #[test]
    fn test_plain_has_no_escape_bytes() {
        let line = plain().encode(&record(
            Level::Debug,
            "esc \x1b[31m inside",
            vec![Field::string("raw", "\x1b[0m")],
        ));
        assert!(!line.contains('\x1b'));
        assert!(line.contains("\\u{001b}"));
    }

    #[test]
    fn test_null_field() {
        let line = plain().encode(&record(
            Level::Info,
            "lookup",
            vec![Field::optional::<u32>("user_id", None)],
        ));
        assert!(line.ends_with("{user_id=null}\n"));
    }

    #[test]
    fn test_skip_field_renders_nothing() {
        let line = plain().encode(&record(Level::Info, "ok", vec![Field::skip()]));
        assert!(line.ends_with("\tok\n"));
    }

    #[test]
    fn test_binary_and_byte_string_are_printable() {
        let pairs = flatten_fields(&[
            Field::binary("blob", vec![0u8, 159, 146, 150, 10]),
            Field::byte_string("text", b"a\nb\x07".to_vec()),
        ]);
        assert_eq!(pairs[0], ("blob".to_string(), "AJ+Slgo=".to_string()));
        assert_eq!(pairs[1], ("text".to_string(), "a\\nb\\u{0007}".to_string()));
    }

    #[test]
    fn test_numeric_rendering() {
        let pairs = flatten_fields(&[
            Field::f64("nan", f64::NAN),
            Field::f64("inf", f64::INFINITY),
            Field::f32("half", 0.5),
            Field::complex128("z", 1.0, -2.5),
            Field::complex64("w", 0.0, 3.0),
            Field::u8("small", 255),
            Field::i16("neg", -12),
        ]);
        let rendered: Vec<_> = pairs.iter().map(|(_, v)| v.as_str()).collect();
        assert_eq!(rendered, vec!["NaN", "+Inf", "0.5", "1-2.5i", "0+3i", "255", "-12"]);
    }

    #[test]
    fn test_namespace_prefixes_following_fields() {
        let pairs = flatten_fields(&[
            Field::string("service", "api"),
            Field::namespace("request"),
            Field::string("method", "GET"),
            Field::namespace("client"),
            Field::string("ip", "10.0.0.1"),
        ]);
        let keys: Vec<_> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["service", "request.method", "request.client.ip"]);
    }

    #[test]
    fn test_object_and_strings() {
        let pairs = flatten_fields(&[
            Field::object("user", vec![Field::int("id", 7), Field::bool("admin", false)]),
            Field::strings("tags", ["a", "b"]),
        ]);
        assert_eq!(pairs[0].1, "{id=7, admin=false}");
        assert_eq!(pairs[1].1, "[a, b]");
    }

    #[test]
    fn test_reflect_failure_is_inline_marker() {
        let mut bad = std::collections::HashMap::new();
        bad.insert(vec![1u8], 1);
        let line = plain().encode(&record(
            Level::Info,
            "reflect",
            vec![Field::reflect("payload", &bad), Field::int("after", 1)],
        ));
        assert!(line.contains("payloadError="));
        assert!(line.contains("after=1"));
    }

    #[test]
    fn test_reflect_success_is_json() {
        let pairs = flatten_fields(&[Field::reflect("ids", &vec![1, 2, 3])]);
        assert_eq!(pairs[0].1, "[1,2,3]");
    }

    #[test]
    fn test_duration_time_and_stack() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let pairs = flatten_fields(&[
            Field::duration("elapsed", Duration::from_millis(1500)),
            Field::time("at", ts),
            Field::stack_trace("stack", "frame one\nframe two\n"),
        ]);
        assert_eq!(pairs[0].1, "1.5s");
        assert_eq!(pairs[1].1, "2024-01-02T03:04:05.000");
        assert_eq!(pairs[2].1, "frame one\\nframe two");
    }

    #[test]
    fn test_control_characters_in_keys_are_escaped() {
        let line = plain().encode(&record(
            Level::Info,
            "msg",
            vec![
                Field::string("a\nb\x1b[31m", "v"),
                Field::namespace("ns\tx"),
                Field::int("k", 1),
                Field::object("o\rbj", vec![Field::bool("in\nner", true)]),
            ],
        ));
        assert_eq!(
            line,
            "[2024-03-09T14:05:07.042] INFO   net/server.rs:88\tmsg\t\
             {a\\nb\\u{001b}[31m=v, ns\\tx.k=1, ns\\tx.o\\rbj={in\\nner=true}}\n"
        );
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let rec = record(Level::Info, "same", vec![Field::reflect("m", &[("k", 1)])]);
        assert_eq!(plain().encode(&rec), plain().encode(&rec));
    }
}
