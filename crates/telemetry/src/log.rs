//! Vehicle log entries and severity classification.

use crate::error::{TelemetryError, TelemetryResult};
use crate::value::TelemetryValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity of a vehicle log entry
///
/// Numeric codes follow the vehicle's bit-flag encoding (1, 2, 4, 8, 16).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Debug output
    Debug,
    /// Informational
    Info,
    /// Warning condition
    Warn,
    /// Error condition
    Error,
    /// Fatal condition
    Fatal,
    /// A level outside the five known severities, kept verbatim
    Unmapped(String),
}

impl LogLevel {
    /// Classify a numeric level code
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => LogLevel::Debug,
            2 => LogLevel::Info,
            4 => LogLevel::Warn,
            8 => LogLevel::Error,
            16 => LogLevel::Fatal,
            other => LogLevel::Unmapped(other.to_string()),
        }
    }

    /// Classify a textual level name (case-insensitive)
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "warn" | "warning" => LogLevel::Warn,
            "error" => LogLevel::Error,
            "fatal" => LogLevel::Fatal,
            _ => LogLevel::Unmapped(name.to_string()),
        }
    }

    /// Display treatment for this level.
    ///
    /// Unmapped levels are an error: the display layer must decide what to
    /// show instead of silently picking a style.
    pub fn display_style(&self) -> TelemetryResult<DisplayStyle> {
        match self {
            LogLevel::Debug => Ok(DisplayStyle::Muted),
            LogLevel::Info => Ok(DisplayStyle::Normal),
            LogLevel::Warn => Ok(DisplayStyle::Warning),
            LogLevel::Error => Ok(DisplayStyle::Error),
            LogLevel::Fatal => Ok(DisplayStyle::Critical),
            LogLevel::Unmapped(raw) => Err(TelemetryError::UnmappedSeverity(raw.clone())),
        }
    }

    /// Whether the level is one of the five known severities
    pub fn is_mapped(&self) -> bool {
        !matches!(self, LogLevel::Unmapped(_))
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warn => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
            LogLevel::Fatal => write!(f, "FATAL"),
            LogLevel::Unmapped(raw) => write!(f, "UNMAPPED({})", raw),
        }
    }
}

/// Distinct display treatment per known severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisplayStyle {
    /// De-emphasised
    Muted,
    /// Default
    Normal,
    /// Highlighted as a warning
    Warning,
    /// Highlighted as an error
    Error,
    /// Highest emphasis
    Critical,
}

/// One entry from the vehicle log feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Severity
    pub level: LogLevel,
    /// Entry timestamp in nanoseconds since epoch
    pub stamp_ns: u64,
    /// Emitting node
    pub node: String,
    /// Message text
    pub message: String,
}

impl LogEntry {
    /// Parse an entry from a feed value.
    ///
    /// Expected fields: `level` (code or name), `msg`, and optionally `name`
    /// and `stamp` (`{secs, nsecs}` or integer nanoseconds).
    pub fn from_value(value: &TelemetryValue) -> TelemetryResult<Self> {
        let level = match value.get("level") {
            Some(TelemetryValue::Int(code)) => LogLevel::from_code(*code),
            Some(TelemetryValue::Text(name)) => LogLevel::from_name(name),
            Some(other) => LogLevel::Unmapped(other.to_string()),
            None => return Err(TelemetryError::MalformedEntry("missing level".into())),
        };

        let message = value
            .get("msg")
            .and_then(TelemetryValue::as_str)
            .ok_or_else(|| TelemetryError::MalformedEntry("missing msg".into()))?
            .to_string();

        let node = value
            .get("name")
            .and_then(TelemetryValue::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(Self {
            level,
            stamp_ns: value.get("stamp").map(stamp_ns).transpose()?.unwrap_or(0),
            node,
            message,
        })
    }
}

fn stamp_ns(stamp: &TelemetryValue) -> TelemetryResult<u64> {
    if let Some(ns) = stamp.as_i64() {
        return Ok(ns.max(0) as u64);
    }
    let secs = stamp.get("secs").and_then(TelemetryValue::as_i64).unwrap_or(0).max(0) as u64;
    let nsecs = stamp.get("nsecs").and_then(TelemetryValue::as_i64).unwrap_or(0).max(0) as u64;
    secs.checked_mul(1_000_000_000)
        .and_then(|ns| ns.checked_add(nsecs))
        .ok_or_else(|| TelemetryError::MalformedEntry(format!("stamp out of range: {}s", secs)))
}
