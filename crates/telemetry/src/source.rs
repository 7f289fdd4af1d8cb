//! Telemetry snapshot sources.
//!
//! The transport that reaches the vehicle lives outside this crate. It feeds
//! a [`TelemetrySource`]; pollers and the checklist engine only ever read.

use crate::error::{TelemetryError, TelemetryResult};
use crate::value::TelemetryValue;
use std::collections::{HashMap, VecDeque};
use std::sync::{Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::debug;

/// Read-only view of the latest telemetry, shared by pollers and checklist runs.
pub trait TelemetrySource: Send + Sync {
    /// Latest snapshot for `key`, `None` when nothing has been received.
    fn get(&self, key: &str) -> Option<TelemetryValue>;

    /// Subscribe-and-wait: block until a snapshot for `key` is available.
    ///
    /// Any timeout is the source's own; callers add none.
    fn wait_for(&self, key: &str) -> TelemetryResult<TelemetryValue> {
        self.get(key).ok_or_else(|| TelemetryError::NotAvailable {
            key: key.to_string(),
        })
    }

    /// Entries received on an append-only feed since the previous drain.
    fn drain(&self, _key: &str) -> Vec<TelemetryValue> {
        Vec::new()
    }
}

#[derive(Default)]
struct StoreInner {
    snapshots: HashMap<String, TelemetryValue>,
    feeds: HashMap<String, VecDeque<TelemetryValue>>,
}

/// Thread-safe in-memory [`TelemetrySource`].
///
/// The transport publishes snapshots and pushes feed entries; readers block
/// in [`TelemetrySource::wait_for`] for at most `wait_timeout`.
pub struct SnapshotStore {
    inner: Mutex<StoreInner>,
    published: Condvar,
    wait_timeout: Duration,
}

impl SnapshotStore {
    /// Default subscribe-and-wait timeout
    pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Create an empty store with the default wait timeout
    pub fn new() -> Self {
        Self::with_wait_timeout(Self::DEFAULT_WAIT_TIMEOUT)
    }

    /// Create an empty store with a custom wait timeout
    pub fn with_wait_timeout(wait_timeout: Duration) -> Self {
        Self {
            inner: Mutex::new(StoreInner::default()),
            published: Condvar::new(),
            wait_timeout,
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Replace the snapshot for `key` and wake any waiters.
    pub fn publish(&self, key: impl Into<String>, value: TelemetryValue) {
        let key = key.into();
        debug!(key = %key, "snapshot published");
        self.lock().snapshots.insert(key, value);
        self.published.notify_all();
    }

    /// Forget the snapshot for `key`.
    pub fn clear(&self, key: &str) {
        self.lock().snapshots.remove(key);
    }

    /// Queue one entry on the append-only feed `key`.
    pub fn push_entry(&self, key: impl Into<String>, entry: TelemetryValue) {
        self.lock().feeds.entry(key.into()).or_default().push_back(entry);
    }

    /// Forget every snapshot and queued entry.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.snapshots.clear();
        inner.feeds.clear();
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetrySource for SnapshotStore {
    fn get(&self, key: &str) -> Option<TelemetryValue> {
        self.lock().snapshots.get(key).cloned()
    }

    fn wait_for(&self, key: &str) -> TelemetryResult<TelemetryValue> {
        let deadline = Instant::now() + self.wait_timeout;
        let mut inner = self.lock();

        loop {
            if let Some(value) = inner.snapshots.get(key) {
                return Ok(value.clone());
            }

            let now = Instant::now();
            if now >= deadline {
                debug!(key = %key, "subscribe-and-wait timed out");
                return Err(TelemetryError::Timeout {
                    key: key.to_string(),
                });
            }

            inner = match self.published.wait_timeout(inner, deadline - now) {
                Ok((guard, _)) => guard,
                Err(poisoned) => poisoned.into_inner().0,
            };
        }
    }

    fn drain(&self, key: &str) -> Vec<TelemetryValue> {
        self.lock()
            .feeds
            .get_mut(key)
            .map(|queue| queue.drain(..).collect())
            .unwrap_or_default()
    }
}
