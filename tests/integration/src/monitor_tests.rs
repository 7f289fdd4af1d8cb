//! Status monitor over a live snapshot store
//!
//! Runs the mission, thruster and log pollers on paused time so every
//! sampling period is deterministic.

use crate::test_utils::{init_test_logging, publish_json, push_log, test_config};
use nautilus_telemetry::{
    DisplayStyle, LogLevel, MonitorFeeds, SnapshotStore, StatusSample, TelemetryValue,
    VehicleMonitor,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

/// Let several sampling periods elapse.
async fn settle() {
    tokio::time::sleep(Duration::from_secs(3)).await;
}

fn drain<T>(rx: &mut UnboundedReceiver<StatusSample<T>>) -> Vec<StatusSample<T>> {
    let mut samples = Vec::new();
    while let Ok(sample) = rx.try_recv() {
        samples.push(sample);
    }
    samples
}

fn monitor(store: &Arc<SnapshotStore>) -> (VehicleMonitor, MonitorFeeds) {
    init_test_logging();
    let config = test_config();
    VehicleMonitor::spawn(&config.telemetry, store.clone())
}

#[tokio::test(start_paused = true)]
async fn test_mission_flag_notifies_only_on_edges() {
    let store = Arc::new(SnapshotStore::new());
    let (monitor, mut feeds) = monitor(&store);
    let key = test_config().telemetry.mission_active_key;

    publish_json(&store, &key, json!({ "mission_active": false }));
    monitor.connect();
    settle().await;

    let samples = drain(&mut feeds.mission_active);
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].value, Some(false));
    assert_eq!(samples[0].key, key);

    // Unchanged across many periods: silent
    settle().await;
    assert!(drain(&mut feeds.mission_active).is_empty());

    publish_json(&store, &key, json!({ "mission_active": true }));
    settle().await;
    let samples = drain(&mut feeds.mission_active);
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].value, Some(true));

    monitor.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_disconnect_reports_unknown_and_restart_renotifies() {
    let store = Arc::new(SnapshotStore::new());
    let (monitor, mut feeds) = monitor(&store);
    let config = test_config().telemetry;

    publish_json(&store, &config.thrusters_enabled_key, json!({ "enabled": true }));
    monitor.connect();
    settle().await;
    assert_eq!(drain(&mut feeds.thrusters_enabled)[0].value, Some(true));

    monitor.disconnect();
    settle().await;
    let samples = drain(&mut feeds.thrusters_enabled);
    assert_eq!(samples.len(), 1);
    assert!(samples[0].is_unknown());

    // Disconnecting twice emits nothing more
    monitor.disconnect();
    settle().await;
    assert!(drain(&mut feeds.thrusters_enabled).is_empty());

    // History was cleared: the same value is reported again
    monitor.connect();
    settle().await;
    let samples = drain(&mut feeds.thrusters_enabled);
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].value, Some(true));

    monitor.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_legacy_keys_used_when_primary_absent() {
    let store = Arc::new(SnapshotStore::new());
    let (monitor, mut feeds) = monitor(&store);
    let config = test_config().telemetry;

    let legacy = config.legacy_mission_active_key.clone().unwrap();
    store.publish(legacy.as_str(), TelemetryValue::Bool(true));
    monitor.connect();
    settle().await;
    assert_eq!(drain(&mut feeds.mission_active)[0].value, Some(true));

    // Once the primary key appears it wins
    publish_json(&store, &config.mission_active_key, json!({ "mission_active": false }));
    settle().await;
    let samples = drain(&mut feeds.mission_active);
    assert_eq!(samples.len(), 1);
    assert_eq!(samples[0].value, Some(false));

    monitor.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_log_batches_are_forwarded_entry_by_entry() {
    let store = Arc::new(SnapshotStore::new());
    let (monitor, mut feeds) = monitor(&store);
    let key = test_config().telemetry.log_key;

    monitor.connect();
    settle().await;
    assert!(drain(&mut feeds.log).is_empty());

    push_log(&store, &key, 2, "mission loaded");
    push_log(&store, &key, 4, "low battery");
    settle().await;
    let entries: Vec<_> = drain(&mut feeds.log)
        .into_iter()
        .filter_map(|s| s.value)
        .collect();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].message, "mission loaded");
    assert_eq!(entries[1].level, LogLevel::Warn);
    assert_eq!(entries[1].level.display_style().unwrap(), DisplayStyle::Warning);
    assert_eq!(entries[1].stamp_ns, 1_700_000_000_000_000_500);

    push_log(&store, &key, 16, "thruster driver lost");
    settle().await;
    let entries = drain(&mut feeds.log);
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].value.as_ref().unwrap().level, LogLevel::Fatal);

    monitor.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_unmapped_log_severity_is_delivered_and_flagged() {
    let store = Arc::new(SnapshotStore::new());
    let (monitor, mut feeds) = monitor(&store);
    let key = test_config().telemetry.log_key;

    push_log(&store, &key, 3, "odd severity");
    monitor.connect();
    settle().await;

    let entries = drain(&mut feeds.log);
    assert_eq!(entries.len(), 1);
    let entry = entries[0].value.as_ref().unwrap();
    assert!(!entry.level.is_mapped());
    assert!(entry.level.display_style().is_err());

    monitor.shutdown().await;
}
