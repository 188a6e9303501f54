//! The in-memory value model
//!
//! [`Value`] is the tagged variant a writer hands to the encoder and a
//! reader gets back from a fully-materialized decode. Every signed integer
//! width collapses to `Int`, every unsigned width to `Uint`, and both float
//! widths to `Float`.

use hashive_format::ValueKind;
use std::collections::BTreeMap;

/// A Hashive value tree
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// JSON null / absent value
    Null,
    /// Signed integer, widened to 64 bits
    Int(i64),
    /// Unsigned integer, widened to 64 bits
    Uint(u64),
    /// Boolean
    Bool(bool),
    /// IEEE-754 binary64
    Float(f64),
    /// UTF-8 text
    Text(String),
    /// Raw byte string
    Bytes(Vec<u8>),
    /// Caller-encoded blob carried verbatim
    Opaque(Vec<u8>),
    /// Ordered sequence
    Array(Vec<Value>),
    /// String-keyed mapping; the on-disk format preserves no key order
    Object(BTreeMap<String, Value>),
}

impl Value {
    /// The wire type this value encodes as
    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Null => ValueKind::Null,
            Value::Int(_) => ValueKind::Int,
            Value::Uint(_) => ValueKind::Uint,
            Value::Bool(_) => ValueKind::Bool,
            Value::Float(_) => ValueKind::Float,
            Value::Text(_) => ValueKind::Text,
            Value::Bytes(_) => ValueKind::Bytes,
            Value::Opaque(_) => ValueKind::Opaque,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Uint(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Object(map)
    }
}

impl From<serde_json::Value> for Value {
    /// JSON has a single number type, so every JSON number lands on the
    /// float side of the value universe.
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::Array(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, item)| (key, Value::from(item)))
                    .collect(),
            ),
        }
    }
}

impl From<&Value> for serde_json::Value {
    /// Lossy rendering for display purposes: byte strings and opaque blobs
    /// become arrays of numbers, non-finite floats become null.
    fn from(value: &Value) -> Self {
        use serde_json::json;
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Int(n) => json!(n),
            Value::Uint(n) => json!(n),
            Value::Bool(b) => json!(b),
            Value::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => json!(s),
            Value::Bytes(p) | Value::Opaque(p) => json!(p),
            Value::Array(items) => {
                serde_json::Value::Array(items.iter().map(serde_json::Value::from).collect())
            }
            Value::Object(map) => serde_json::Value::Object(
                map.iter()
                    .map(|(key, item)| (key.clone(), serde_json::Value::from(item)))
                    .collect(),
            ),
        }
    }
}
