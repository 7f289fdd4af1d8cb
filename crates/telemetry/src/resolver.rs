//! Field path resolution over telemetry snapshots.
//!
//! Paths use `/` as separator (`header/stamp/secs`). Resolution is a checked
//! descent through [`TelemetryValue::Map`] nodes with a typed outcome:
//! a leaf, a missing segment, or a snapshot that has no new data yet.
//!
//! Freshness is decided by the `_new_data` flag nearest the leaf: the deepest
//! mapping on the walked path that carries one. No flag at all counts as
//! "not yet available".

use crate::error::{TelemetryError, TelemetryResult};
use crate::value::TelemetryValue;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Marker shown in place of a field that could not be read.
pub const UNREADABLE: &str = "unreadable";

/// Outcome of walking one path
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The leaf value
    Value(TelemetryValue),
    /// A segment was absent (or the walk hit a non-mapping)
    MissingPath {
        /// The segment that could not be found
        segment: String,
    },
    /// The snapshot reports no new data
    NotYetAvailable,
}

impl Resolution {
    /// Convert into a `Result`, naming `path` in the error.
    pub fn into_result(self, path: &str) -> TelemetryResult<TelemetryValue> {
        match self {
            Resolution::Value(v) => Ok(v),
            Resolution::MissingPath { segment } => Err(TelemetryError::MissingPath {
                path: path.to_string(),
                segment,
            }),
            Resolution::NotYetAvailable => Err(TelemetryError::Stale {
                path: path.to_string(),
            }),
        }
    }
}

/// Walk `path` through `snapshot`.
pub fn resolve(path: &str, snapshot: &TelemetryValue) -> Resolution {
    let mut node = snapshot;
    let mut fresh = snapshot.new_data_flag();

    for segment in path.split('/').filter(|s| !s.is_empty()) {
        match node.get(segment) {
            Some(child) => {
                node = child;
                if let Some(flag) = node.new_data_flag() {
                    fresh = Some(flag);
                }
            }
            // A stale snapshot may legitimately lack fields.
            None if fresh == Some(false) => return Resolution::NotYetAvailable,
            None => {
                return Resolution::MissingPath {
                    segment: segment.to_string(),
                }
            }
        }
    }

    match fresh {
        Some(true) => Resolution::Value(node.clone()),
        _ => Resolution::NotYetAvailable,
    }
}

/// Walk `path` without consulting freshness flags.
///
/// Status pollers read the latest value whether or not it is new.
pub fn lookup<'a>(path: &str, snapshot: &'a TelemetryValue) -> Option<&'a TelemetryValue> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .try_fold(snapshot, |node, segment| node.get(segment))
}

/// Displayable outcome for a single checklist field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FieldValue {
    /// Field read successfully, rendered as text
    Resolved {
        /// Rendered value
        value: String,
    },
    /// Field could not be read
    Unreadable {
        /// Why the read failed
        reason: String,
    },
}

impl FieldValue {
    /// Whether the field resolved
    pub fn is_resolved(&self) -> bool {
        matches!(self, FieldValue::Resolved { .. })
    }

    /// Text shown to the operator: the value, or the unreadable marker.
    pub fn display_text(&self) -> &str {
        match self {
            FieldValue::Resolved { value } => value,
            FieldValue::Unreadable { .. } => UNREADABLE,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_text())
    }
}

/// Resolve every path against one fetched snapshot.
///
/// A failed fetch marks every path unreadable with the same reason; a failed
/// path never stops its siblings from being resolved.
pub fn resolve_fields(
    topic: &str,
    snapshot: &TelemetryResult<TelemetryValue>,
    paths: &[&str],
) -> Vec<FieldValue> {
    paths
        .iter()
        .map(|path| {
            let outcome = match snapshot {
                Ok(snapshot) => resolve(path, snapshot).into_result(path),
                Err(e) => Err(e.clone()),
            };
            match outcome {
                Ok(value) => FieldValue::Resolved {
                    value: value.to_string(),
                },
                Err(e) => {
                    warn!(topic = %topic, path = %path, error = %e, "field unreadable");
                    FieldValue::Unreadable {
                        reason: e.to_string(),
                    }
                }
            }
        })
        .collect()
}
