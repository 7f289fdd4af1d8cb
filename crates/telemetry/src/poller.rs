//! Edge-trigger status poller.
//!
//! One generic component samples a [`Probe`] on a fixed period and emits
//! [`StatusSample`]s only on change (or per entry for append-only feeds).
//! The notification rule lives in [`PollerState`] so it can be driven without
//! timers; [`EdgeTriggerPoller::spawn`] wraps it in a tokio task.
//!
//! # Semantics
//! - Ticks while stopped do nothing.
//! - An empty fetch (no data) never notifies.
//! - `stop()` forgets the last value and emits one `value: None` sample so
//!   displays can reset to "unknown".
//! - Notifications go out in tick order; ticks never overlap.

use crate::probe::{ChangeRule, Probe};
use crate::source::TelemetrySource;
use nautilus_core::current_timestamp_ns;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Default sampling period
pub const DEFAULT_POLL_PERIOD: Duration = Duration::from_secs(1);

/// Shortest sampling period a spawned poller accepts
pub const MIN_POLL_PERIOD: Duration = Duration::from_millis(1);

/// Change notification for one monitored key
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSample<T> {
    /// Monitored key
    pub key: String,
    /// New value, `None` when the poller was stopped and the state is unknown
    pub value: Option<T>,
    /// Observation time in nanoseconds since epoch
    pub observed_at_ns: u64,
}

impl<T> StatusSample<T> {
    /// Whether this is the "now unknown" notification
    pub fn is_unknown(&self) -> bool {
        self.value.is_none()
    }
}

/// Subscription flag and last notified value for one poller
#[derive(Debug, Clone)]
pub struct PollerState<V> {
    subscribed: bool,
    last_value: Option<V>,
    rule: ChangeRule,
}

impl<V: Clone + PartialEq> PollerState<V> {
    /// Create a stopped state
    pub fn new(rule: ChangeRule) -> Self {
        Self {
            subscribed: false,
            last_value: None,
            rule,
        }
    }

    /// Whether sampling is active
    pub fn is_subscribed(&self) -> bool {
        self.subscribed
    }

    /// Last notified value
    pub fn last_value(&self) -> Option<&V> {
        self.last_value.as_ref()
    }

    /// Begin sampling.
    pub fn start(&mut self) {
        self.subscribed = true;
    }

    /// Stop sampling and forget history.
    ///
    /// Returns `true` when an "unknown" notification is due, i.e. the poller
    /// was running. Stopping an already stopped poller is a no-op.
    pub fn stop(&mut self) -> bool {
        let was_subscribed = self.subscribed;
        self.subscribed = false;
        self.last_value = None;
        was_subscribed
    }

    /// Apply the change rule to one fetched batch; returns the values to notify.
    pub fn observe(&mut self, batch: Vec<V>) -> Vec<V> {
        if !self.subscribed {
            return Vec::new();
        }

        match self.rule {
            ChangeRule::EveryEntry => {
                if let Some(last) = batch.last() {
                    self.last_value = Some(last.clone());
                }
                batch
            }
            ChangeRule::OnChange => {
                let mut changed = Vec::new();
                for value in batch {
                    if self.last_value.as_ref() != Some(&value) {
                        self.last_value = Some(value.clone());
                        changed.push(value);
                    }
                }
                changed
            }
        }
    }
}

enum Command {
    Start,
    Stop,
    Shutdown,
}

/// Periodic sampler for one [`Probe`].
pub struct EdgeTriggerPoller<P: Probe> {
    probe: P,
    state: PollerState<P::Value>,
    source: Arc<dyn TelemetrySource>,
    notify: mpsc::UnboundedSender<StatusSample<P::Value>>,
}

impl<P: Probe> EdgeTriggerPoller<P> {
    /// Create a stopped poller and the receiver its notifications arrive on.
    pub fn new(
        probe: P,
        source: Arc<dyn TelemetrySource>,
    ) -> (Self, mpsc::UnboundedReceiver<StatusSample<P::Value>>) {
        let (notify, rx) = mpsc::unbounded_channel();
        let state = PollerState::new(probe.rule());
        (
            Self {
                probe,
                state,
                source,
                notify,
            },
            rx,
        )
    }

    /// Monitored key
    pub fn key(&self) -> &str {
        self.probe.key()
    }

    /// Current subscription state
    pub fn state(&self) -> &PollerState<P::Value> {
        &self.state
    }

    /// Begin sampling.
    pub fn start(&mut self) {
        if !self.state.is_subscribed() {
            info!(key = %self.probe.key(), "status poller started");
        }
        self.state.start();
    }

    /// Stop sampling and emit the "unknown" notification.
    pub fn stop(&mut self) {
        if self.state.stop() {
            info!(key = %self.probe.key(), "status poller stopped");
            self.emit(None);
        }
    }

    /// Sample once.
    pub fn tick(&mut self) {
        if !self.state.is_subscribed() {
            return;
        }

        let batch = match self.probe.fetch(self.source.as_ref()) {
            Ok(batch) => batch,
            Err(e) => {
                warn!(key = %self.probe.key(), error = %e, "status sample failed");
                return;
            }
        };

        for value in self.state.observe(batch) {
            debug!(key = %self.probe.key(), value = ?value, "status changed");
            self.emit(Some(value));
        }
    }

    fn emit(&self, value: Option<P::Value>) {
        let sample = StatusSample {
            key: self.probe.key().to_string(),
            value,
            observed_at_ns: current_timestamp_ns(),
        };
        if self.notify.send(sample).is_err() {
            debug!(key = %self.probe.key(), "no listener for status notification");
        }
    }

    /// Run the poller on a background task sampling every `period`.
    ///
    /// The poller starts stopped; call [`PollerHandle::start`]. Ticks that
    /// would fire while a previous one is still running are skipped.
    /// Periods below [`MIN_POLL_PERIOD`] are raised to it.
    pub fn spawn(mut self, period: Duration) -> PollerHandle {
        let (commands, mut command_rx) = mpsc::unbounded_channel();
        let key = self.probe.key().to_string();
        if period < MIN_POLL_PERIOD {
            warn!(key = %key, period = ?period, "poll period too short, using minimum");
        }
        let period = period.max(MIN_POLL_PERIOD);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    biased;
                    command = command_rx.recv() => match command {
                        Some(Command::Start) => self.start(),
                        Some(Command::Stop) => self.stop(),
                        Some(Command::Shutdown) | None => {
                            self.stop();
                            break;
                        }
                    },
                    _ = ticker.tick() => self.tick(),
                }
            }
            debug!(key = %self.probe.key(), "status poller task exited");
        });

        PollerHandle { key, commands, task }
    }
}

/// Control handle for a spawned poller
pub struct PollerHandle {
    key: String,
    commands: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Begin sampling
    pub fn start(&self) {
        self.send(Command::Start);
    }

    /// Stop sampling; the poller emits its "unknown" notification
    pub fn stop(&self) {
        self.send(Command::Stop);
    }

    /// Monitored key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Whether the background task is still alive
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    fn send(&self, command: Command) -> bool {
        let sent = self.commands.send(command).is_ok();
        if !sent {
            warn!(key = %self.key, "status poller task is gone");
        }
        sent
    }

    /// Stop the poller and wait for its task to exit.
    pub async fn shutdown(self) {
        self.send(Command::Shutdown);
        if let Err(e) = self.task.await {
            warn!(error = %e, "status poller task failed");
        }
    }
}
