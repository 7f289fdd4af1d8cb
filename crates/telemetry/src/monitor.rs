//! Vehicle status monitor: the mission, thruster and log pollers as one unit.

use crate::log::LogEntry;
use crate::poller::{EdgeTriggerPoller, PollerHandle, StatusSample};
use crate::probe::{FlagProbe, LogProbe};
use crate::source::TelemetrySource;
use nautilus_core::TelemetryConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

/// Notification receivers for the three status pollers
pub struct MonitorFeeds {
    /// Mission-active flag changes
    pub mission_active: UnboundedReceiver<StatusSample<bool>>,
    /// Thrusters-enabled flag changes
    pub thrusters_enabled: UnboundedReceiver<StatusSample<bool>>,
    /// Every new vehicle log entry
    pub log: UnboundedReceiver<StatusSample<LogEntry>>,
}

/// Independently scheduled mission, thruster and log pollers.
///
/// The pollers share nothing but the read-only telemetry source.
pub struct VehicleMonitor {
    mission_active: PollerHandle,
    thrusters_enabled: PollerHandle,
    log: PollerHandle,
}

impl VehicleMonitor {
    /// Spawn the three pollers (stopped) from the telemetry config.
    pub fn spawn(
        config: &TelemetryConfig,
        source: Arc<dyn TelemetrySource>,
    ) -> (Self, MonitorFeeds) {
        let period = config.poll_interval();

        let (mission_active, mission_rx) = spawn_flag_poller(
            FlagProbe::new(&config.mission_active_key, &config.mission_active_field),
            config.legacy_mission_active_key.as_deref(),
            Arc::clone(&source),
            period,
        );
        let (thrusters_enabled, thrusters_rx) = spawn_flag_poller(
            FlagProbe::new(&config.thrusters_enabled_key, &config.thrusters_enabled_field),
            config.legacy_thrusters_enabled_key.as_deref(),
            Arc::clone(&source),
            period,
        );
        let (log_poller, log_rx) = EdgeTriggerPoller::new(LogProbe::new(&config.log_key), source);

        let monitor = Self {
            mission_active,
            thrusters_enabled,
            log: log_poller.spawn(period),
        };
        let feeds = MonitorFeeds {
            mission_active: mission_rx,
            thrusters_enabled: thrusters_rx,
            log: log_rx,
        };
        (monitor, feeds)
    }

    /// Start all pollers (vehicle connected).
    pub fn connect(&self) {
        info!("vehicle monitor connected");
        self.mission_active.start();
        self.thrusters_enabled.start();
        self.log.start();
    }

    /// Stop all pollers; each emits its "unknown" notification.
    pub fn disconnect(&self) {
        info!("vehicle monitor disconnected");
        self.mission_active.stop();
        self.thrusters_enabled.stop();
        self.log.stop();
    }

    /// Stop all pollers and wait for their tasks to exit.
    pub async fn shutdown(self) {
        self.mission_active.shutdown().await;
        self.thrusters_enabled.shutdown().await;
        self.log.shutdown().await;
    }
}

/// Legacy status keys carry the flag as their whole value.
fn spawn_flag_poller(
    probe: FlagProbe,
    legacy_key: Option<&str>,
    source: Arc<dyn TelemetrySource>,
    period: Duration,
) -> (PollerHandle, UnboundedReceiver<StatusSample<bool>>) {
    match legacy_key {
        Some(legacy_key) => {
            let probe = probe.with_fallback(FlagProbe::new(legacy_key, ""));
            let (poller, rx) = EdgeTriggerPoller::new(probe, source);
            (poller.spawn(period), rx)
        }
        None => {
            let (poller, rx) = EdgeTriggerPoller::new(probe, source);
            (poller.spawn(period), rx)
        }
    }
}
