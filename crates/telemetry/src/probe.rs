//! Sampling strategies for the edge-trigger poller.
//!
//! A [`Probe`] knows which key it reads, how to turn the source's answer into
//! zero or more values, and which [`ChangeRule`] the poller applies to them.

use crate::error::{TelemetryError, TelemetryResult};
use crate::log::LogEntry;
use crate::resolver::lookup;
use crate::source::TelemetrySource;
use std::fmt;
use tracing::warn;

/// How fetched values turn into notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeRule {
    /// Notify only when the value differs from the last notified one
    OnChange,
    /// Notify once per fetched entry, in fetch order, without dedup
    EveryEntry,
}

/// One monitored quantity.
pub trait Probe: Send + Sync + 'static {
    /// Value carried by notifications
    type Value: Clone + PartialEq + fmt::Debug + Send + 'static;

    /// Key the probe monitors (used for notifications and logging)
    fn key(&self) -> &str;

    /// Comparison rule applied by the poller
    fn rule(&self) -> ChangeRule {
        ChangeRule::OnChange
    }

    /// Read the source. An empty result means "no data", never a change.
    fn fetch(&self, source: &dyn TelemetrySource) -> TelemetryResult<Vec<Self::Value>>;
}

/// Boolean status flag at `field` inside the snapshot for `key`
#[derive(Debug, Clone)]
pub struct FlagProbe {
    key: String,
    field: String,
}

impl FlagProbe {
    /// Flag at `field` within the snapshot; an empty field means the
    /// snapshot itself is the flag.
    pub fn new(key: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            field: field.into(),
        }
    }

    /// Add a legacy source consulted when this one yields nothing.
    pub fn with_fallback<L>(self, legacy: L) -> WithFallback<Self, L>
    where
        L: Probe<Value = bool>,
    {
        WithFallback::new(self, legacy)
    }
}

impl Probe for FlagProbe {
    type Value = bool;

    fn key(&self) -> &str {
        &self.key
    }

    fn fetch(&self, source: &dyn TelemetrySource) -> TelemetryResult<Vec<bool>> {
        let Some(snapshot) = source.get(&self.key) else {
            return Ok(Vec::new());
        };

        match lookup(&self.field, &snapshot) {
            None => Ok(Vec::new()),
            Some(value) if value.is_null() => Ok(Vec::new()),
            Some(value) => value.as_bool().map(|b| vec![b]).ok_or_else(|| {
                TelemetryError::TypeMismatch {
                    path: format!("{}/{}", self.key, self.field),
                    expected: "bool",
                }
            }),
        }
    }
}

/// Primary probe with a legacy fallback for when the primary yields null.
///
/// Errors from the primary are reported as-is; only absence falls through.
#[derive(Debug, Clone)]
pub struct WithFallback<P, L> {
    primary: P,
    legacy: L,
}

impl<P, L> WithFallback<P, L>
where
    P: Probe,
    L: Probe<Value = P::Value>,
{
    /// Combine two probes
    pub fn new(primary: P, legacy: L) -> Self {
        Self { primary, legacy }
    }
}

impl<P, L> Probe for WithFallback<P, L>
where
    P: Probe,
    L: Probe<Value = P::Value>,
{
    type Value = P::Value;

    fn key(&self) -> &str {
        self.primary.key()
    }

    fn rule(&self) -> ChangeRule {
        self.primary.rule()
    }

    fn fetch(&self, source: &dyn TelemetrySource) -> TelemetryResult<Vec<P::Value>> {
        let values = self.primary.fetch(source)?;
        if !values.is_empty() {
            return Ok(values);
        }
        self.legacy.fetch(source)
    }
}

/// Rolling vehicle log feed
#[derive(Debug, Clone)]
pub struct LogProbe {
    key: String,
}

impl LogProbe {
    /// Read entries from the append-only feed `key`
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl Probe for LogProbe {
    type Value = LogEntry;

    fn key(&self) -> &str {
        &self.key
    }

    fn rule(&self) -> ChangeRule {
        ChangeRule::EveryEntry
    }

    fn fetch(&self, source: &dyn TelemetrySource) -> TelemetryResult<Vec<LogEntry>> {
        let mut entries = Vec::new();
        for raw in source.drain(&self.key) {
            match LogEntry::from_value(&raw) {
                Ok(entry) => {
                    if !entry.level.is_mapped() {
                        warn!(key = %self.key, level = %entry.level, "log entry with unmapped severity");
                    }
                    entries.push(entry);
                }
                Err(e) => warn!(key = %self.key, error = %e, "dropping malformed log entry"),
            }
        }
        Ok(entries)
    }
}
