//! Structured key/value fields attached to log records
//!
//! A [`Field`] pairs a key with a typed [`FieldValue`]. Values are captured
//! eagerly at the call site, so a record never borrows from the caller.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::backtrace::Backtrace;
use std::fmt;
use std::time::Duration;

/// Value payload of a structured field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    Usize(usize),
    F32(f32),
    F64(f64),
    Complex64(f32, f32),
    Complex128(f64, f64),
    String(String),
    Strings(Vec<String>),
    /// Opaque binary blob
    Binary(Vec<u8>),
    /// UTF-8 text carried as bytes
    ByteString(Vec<u8>),
    Duration(Duration),
    Time(DateTime<Utc>),
    Object(Vec<Field>),
    /// Eagerly serialized value; `Err` holds the serialization failure
    Reflect(Result<serde_json::Value, String>),
    /// Opens a scope: every following field is keyed under this one
    Namespace,
    Error(String),
    Stack(String),
    Null,
    /// Renders nothing
    Skip,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: String,
    pub value: FieldValue,
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    fn with_value(key: impl Into<String>, value: FieldValue) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }

    /// A field that is dropped by every encoder
    pub fn skip() -> Self {
        Self::with_value("", FieldValue::Skip)
    }

    /// Explicit null for a key
    pub fn null(key: impl Into<String>) -> Self {
        Self::with_value(key, FieldValue::Null)
    }

    /// Field for an optional value; `None` produces an explicit `null`.
    ///
    /// ```
    /// use tee_logger::Field;
    ///
    /// let missing: Option<u16> = None;
    /// assert_eq!(Field::optional("port", missing), Field::null("port"));
    /// assert_eq!(Field::optional("port", Some(8080u16)), Field::u16("port", 8080));
    /// ```
    pub fn optional<T: Into<FieldValue>>(key: impl Into<String>, value: Option<T>) -> Self {
        match value {
            Some(v) => Self::new(key, v),
            None => Self::null(key),
        }
    }

    pub fn bool(key: impl Into<String>, val: bool) -> Self {
        Self::with_value(key, FieldValue::Bool(val))
    }

    pub fn int(key: impl Into<String>, val: i64) -> Self {
        Self::i64(key, val)
    }

    pub fn i8(key: impl Into<String>, val: i8) -> Self {
        Self::with_value(key, FieldValue::I8(val))
    }

    pub fn i16(key: impl Into<String>, val: i16) -> Self {
        Self::with_value(key, FieldValue::I16(val))
    }

    pub fn i32(key: impl Into<String>, val: i32) -> Self {
        Self::with_value(key, FieldValue::I32(val))
    }

    pub fn i64(key: impl Into<String>, val: i64) -> Self {
        Self::with_value(key, FieldValue::I64(val))
    }

    pub fn u8(key: impl Into<String>, val: u8) -> Self {
        Self::with_value(key, FieldValue::U8(val))
    }

    pub fn u16(key: impl Into<String>, val: u16) -> Self {
        Self::with_value(key, FieldValue::U16(val))
    }

    pub fn u32(key: impl Into<String>, val: u32) -> Self {
        Self::with_value(key, FieldValue::U32(val))
    }

    pub fn u64(key: impl Into<String>, val: u64) -> Self {
        Self::with_value(key, FieldValue::U64(val))
    }

    pub fn usize(key: impl Into<String>, val: usize) -> Self {
        Self::with_value(key, FieldValue::Usize(val))
    }

    pub fn f32(key: impl Into<String>, val: f32) -> Self {
        Self::with_value(key, FieldValue::F32(val))
    }

    pub fn f64(key: impl Into<String>, val: f64) -> Self {
        Self::with_value(key, FieldValue::F64(val))
    }

    pub fn complex64(key: impl Into<String>, re: f32, im: f32) -> Self {
        Self::with_value(key, FieldValue::Complex64(re, im))
    }

    pub fn complex128(key: impl Into<String>, re: f64, im: f64) -> Self {
        Self::with_value(key, FieldValue::Complex128(re, im))
    }

    pub fn string(key: impl Into<String>, val: impl Into<String>) -> Self {
        Self::with_value(key, FieldValue::String(val.into()))
    }

    pub fn strings<I, S>(key: impl Into<String>, vals: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_value(
            key,
            FieldValue::Strings(vals.into_iter().map(Into::into).collect()),
        )
    }

    /// Opaque binary data, rendered in an encoding-appropriate text form
    pub fn binary(key: impl Into<String>, val: impl Into<Vec<u8>>) -> Self {
        Self::with_value(key, FieldValue::Binary(val.into()))
    }

    /// UTF-8 text carried as bytes. Use [`Field::binary`] for arbitrary blobs.
    pub fn byte_string(key: impl Into<String>, val: impl Into<Vec<u8>>) -> Self {
        Self::with_value(key, FieldValue::ByteString(val.into()))
    }

    pub fn duration(key: impl Into<String>, val: Duration) -> Self {
        Self::with_value(key, FieldValue::Duration(val))
    }

    pub fn time(key: impl Into<String>, val: DateTime<Utc>) -> Self {
        Self::with_value(key, FieldValue::Time(val))
    }

    /// Nested group of fields rendered under one key
    pub fn object(key: impl Into<String>, fields: Vec<Field>) -> Self {
        Self::with_value(key, FieldValue::Object(fields))
    }

    /// Serializes `val` now. A serialization failure is kept and rendered
    /// inline instead of aborting the record.
    pub fn reflect<T: Serialize + ?Sized>(key: impl Into<String>, val: &T) -> Self {
        Self::with_value(
            key,
            FieldValue::Reflect(serde_json::to_value(val).map_err(|e| e.to_string())),
        )
    }

    /// Every field after this one is keyed as `key.<field>`
    pub fn namespace(key: impl Into<String>) -> Self {
        Self::with_value(key, FieldValue::Namespace)
    }

    /// Uses the value's `Display` output
    pub fn stringer<D: fmt::Display + ?Sized>(key: impl Into<String>, val: &D) -> Self {
        Self::with_value(key, FieldValue::String(val.to_string()))
    }

    /// Error under a custom key; `None` yields a skipped field.
    pub fn named_error<E>(key: impl Into<String>, err: Option<&E>) -> Self
    where
        E: std::error::Error + ?Sized,
    {
        match err {
            Some(e) => Self::with_value(key, FieldValue::Error(error_chain(e))),
            None => Self::skip(),
        }
    }

    /// Error under the conventional `error` key
    pub fn error<E: std::error::Error + ?Sized>(err: &E) -> Self {
        Self::named_error("error", Some(err))
    }

    /// Captures the current stack trace
    pub fn stack(key: impl Into<String>) -> Self {
        Self::with_value(key, FieldValue::Stack(Backtrace::force_capture().to_string()))
    }

    /// Stack trace captured elsewhere
    pub fn stack_trace(key: impl Into<String>, trace: impl Into<String>) -> Self {
        Self::with_value(key, FieldValue::Stack(trace.into()))
    }

    pub fn is_skip(&self) -> bool {
        matches!(self.value, FieldValue::Skip)
    }
}

/// Joins an error with its sources: `outer: inner: root`
fn error_chain<E: std::error::Error + ?Sized>(err: &E) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str(": ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}

macro_rules! impl_from_primitive {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(v: $ty) -> Self {
                    FieldValue::$variant(v)
                }
            }
        )*
    };
}

impl_from_primitive! {
    bool => Bool,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    usize => Usize,
    f32 => F32,
    f64 => F64,
    String => String,
    Duration => Duration,
    DateTime<Utc> => Time,
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(v: Vec<String>) -> Self {
        FieldValue::Strings(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(FieldValue::Null, Into::into)
    }
}
