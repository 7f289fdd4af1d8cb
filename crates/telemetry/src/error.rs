//! Error types for telemetry access, field resolution and log classification.

use thiserror::Error;

/// Errors raised while reading telemetry.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum TelemetryError {
    /// The source has no snapshot for this key yet
    #[error("No data available for {key}")]
    NotAvailable {
        /// Telemetry key
        key: String,
    },

    /// Subscribe-and-wait gave up at the source level
    #[error("Timed out waiting for {key}")]
    Timeout {
        /// Telemetry key
        key: String,
    },

    /// A path segment does not exist in the snapshot
    #[error("Missing path segment '{segment}' in {path}")]
    MissingPath {
        /// Full dotted path
        path: String,
        /// First segment that could not be found
        segment: String,
    },

    /// The snapshot answered "no new data yet"
    #[error("No new data for {path}")]
    Stale {
        /// Full dotted path
        path: String,
    },

    /// The value exists but has the wrong shape
    #[error("Type mismatch at {path}: expected {expected}")]
    TypeMismatch {
        /// Full dotted path
        path: String,
        /// Expected kind of value
        expected: &'static str,
    },

    /// Log entry carries a level outside the five known severities
    #[error("Unmapped log severity: {0}")]
    UnmappedSeverity(String),

    /// Malformed log entry
    #[error("Malformed log entry: {0}")]
    MalformedEntry(String),
}

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
