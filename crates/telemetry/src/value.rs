//! Loosely structured telemetry values.
//!
//! Snapshots arrive as a tree of named fields. The tree is modelled as an
//! explicit enum so field access is always a checked walk.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Reserved key marking whether a mapping carries fresh data.
pub const NEW_DATA_FLAG: &str = "_new_data";

/// One node of a telemetry snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TelemetryValue {
    /// Explicit null
    Null,
    /// Boolean flag
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point number
    Float(f64),
    /// Text
    Text(String),
    /// Ordered sequence
    List(Vec<TelemetryValue>),
    /// Named fields
    Map(BTreeMap<String, TelemetryValue>),
}

impl TelemetryValue {
    /// Build a mapping from `(name, value)` pairs.
    pub fn map<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, TelemetryValue)>,
    {
        TelemetryValue::Map(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Named child of a mapping, `None` for other variants.
    pub fn get(&self, name: &str) -> Option<&TelemetryValue> {
        match self {
            TelemetryValue::Map(fields) => fields.get(name),
            _ => None,
        }
    }

    /// Boolean view; integers 0/1 are accepted for older status encodings.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TelemetryValue::Bool(b) => Some(*b),
            TelemetryValue::Int(0) => Some(false),
            TelemetryValue::Int(1) => Some(true),
            _ => None,
        }
    }

    /// Integer view
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            TelemetryValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric view (integers widen to float)
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            TelemetryValue::Float(f) => Some(*f),
            TelemetryValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Text view
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TelemetryValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Whether this is `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, TelemetryValue::Null)
    }

    /// Freshness flag carried directly by this mapping, if any.
    pub fn new_data_flag(&self) -> Option<bool> {
        self.get(NEW_DATA_FLAG).and_then(TelemetryValue::as_bool)
    }
}

impl fmt::Display for TelemetryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryValue::Null => write!(f, "null"),
            TelemetryValue::Bool(b) => write!(f, "{}", b),
            TelemetryValue::Int(i) => write!(f, "{}", i),
            TelemetryValue::Float(x) => write!(f, "{}", x),
            TelemetryValue::Text(s) => write!(f, "{}", s),
            TelemetryValue::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            TelemetryValue::Map(fields) => {
                write!(f, "{{")?;
                let visible = fields.iter().filter(|(k, _)| k.as_str() != NEW_DATA_FLAG);
                for (i, (k, v)) in visible.enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", k, v)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl From<serde_json::Value> for TelemetryValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => TelemetryValue::Null,
            serde_json::Value::Bool(b) => TelemetryValue::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => TelemetryValue::Int(i),
                None => TelemetryValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => TelemetryValue::Text(s),
            serde_json::Value::Array(items) => {
                TelemetryValue::List(items.into_iter().map(Into::into).collect())
            }
            serde_json::Value::Object(fields) => {
                TelemetryValue::Map(fields.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<bool> for TelemetryValue {
    fn from(b: bool) -> Self {
        TelemetryValue::Bool(b)
    }
}

impl From<i64> for TelemetryValue {
    fn from(i: i64) -> Self {
        TelemetryValue::Int(i)
    }
}

impl From<f64> for TelemetryValue {
    fn from(x: f64) -> Self {
        TelemetryValue::Float(x)
    }
}

impl From<&str> for TelemetryValue {
    fn from(s: &str) -> Self {
        TelemetryValue::Text(s.to_string())
    }
}

impl From<String> for TelemetryValue {
    fn from(s: String) -> Self {
        TelemetryValue::Text(s)
    }
}
