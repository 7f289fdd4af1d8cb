//! Test utilities for end-to-end console tests

use nautilus_core::{ConsoleConfig, VehicleEndpoint};
use nautilus_telemetry::{SnapshotStore, TelemetryValue};
use nautilus_vehicle::{
    InvocationError, RemoteActionInvoker, ServiceCaller, ServiceParameters, ServiceResponse,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub use nautilus_core::current_timestamp_ns;

/// Namespace every scripted vehicle lives under
pub const TEST_NAMESPACE: &str = "girona500";

/// Short subscribe-and-wait timeout so unpublished topics fail fast
pub const TEST_WAIT_TIMEOUT: Duration = Duration::from_millis(20);

/// Install a test subscriber once; later calls are no-ops.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .with_test_writer()
        .try_init();
}

/// One call received by a [`ScriptedVehicle`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub host: String,
    pub port: u16,
    pub service: String,
    pub parameters: Option<ServiceParameters>,
}

/// In-process vehicle answering service calls from a script.
///
/// Services listed as raising fail with a transport error; services listed
/// as refusing answer with `success == false`; everything else succeeds.
#[derive(Debug, Default)]
pub struct ScriptedVehicle {
    calls: Mutex<Vec<RecordedCall>>,
    raising: HashSet<String>,
    refusing: HashSet<String>,
}

impl ScriptedVehicle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the fully qualified `service` raise
    pub fn raising(mut self, service: &str) -> Self {
        self.raising.insert(service.to_string());
        self
    }

    /// Make the fully qualified `service` answer `success == false`
    pub fn refusing(mut self, service: &str) -> Self {
        self.refusing.insert(service.to_string());
        self
    }

    /// Calls received so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Service names received so far, in order
    pub fn services(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.service).collect()
    }
}

impl ServiceCaller for ScriptedVehicle {
    fn call(
        &self,
        host: &str,
        port: u16,
        service: &str,
        parameters: Option<&ServiceParameters>,
    ) -> Result<ServiceResponse, InvocationError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedCall {
                host: host.to_string(),
                port,
                service: service.to_string(),
                parameters: parameters.cloned(),
            });

        if self.raising.contains(service) {
            return Err(InvocationError::CallFailed {
                service: service.to_string(),
                reason: "service call timed out".into(),
            });
        }
        if self.refusing.contains(service) {
            return Ok(ServiceResponse::failed("refused by vehicle"));
        }
        Ok(ServiceResponse::ok("done"))
    }
}

/// Console config pointing at the scripted vehicle
pub fn test_config() -> ConsoleConfig {
    let mut config = ConsoleConfig::default_config();
    config.vehicle.namespace = TEST_NAMESPACE.to_string();
    config
}

/// Invoker bound to `vehicle` at the test endpoint
pub fn test_invoker(vehicle: Arc<ScriptedVehicle>) -> RemoteActionInvoker {
    let config = test_config();
    RemoteActionInvoker::new(vehicle, config.endpoint())
}

/// Fully qualified service name on the test vehicle
pub fn qualified(service: &str) -> String {
    VehicleEndpoint::new("localhost", 9090, TEST_NAMESPACE).qualify(service)
}

/// Snapshot store with the short test timeout
pub fn test_store() -> Arc<SnapshotStore> {
    Arc::new(SnapshotStore::with_wait_timeout(TEST_WAIT_TIMEOUT))
}

/// Publish a JSON snapshot under `key`
pub fn publish_json(store: &SnapshotStore, key: &str, value: serde_json::Value) {
    store.publish(key, TelemetryValue::from(value));
}

/// Append one log entry to the feed under `key`
pub fn push_log(store: &SnapshotStore, key: &str, level: i64, message: &str) {
    store.push_entry(
        key,
        TelemetryValue::from(serde_json::json!({
            "level": level,
            "msg": message,
            "name": "/girona500/captain",
            "stamp": { "secs": 1_700_000_000, "nsecs": 500 },
        })),
    );
}
