//! Core types

use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Address of the vehicle bridge plus the namespace its services live under
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleEndpoint {
    /// Hostname or address
    pub host: String,
    /// Port
    pub port: u16,
    /// Vehicle namespace (may be empty)
    pub namespace: String,
}

impl VehicleEndpoint {
    /// Create a new endpoint
    pub fn new(host: impl Into<String>, port: u16, namespace: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            namespace: namespace.into(),
        }
    }

    /// Build the fully qualified name of a service or topic.
    ///
    /// Names already starting with `/` are treated as absolute and returned
    /// unchanged.
    pub fn qualify(&self, name: &str) -> String {
        if name.starts_with('/') {
            return name.to_string();
        }
        let namespace = self.namespace.trim_matches('/');
        if namespace.is_empty() {
            format!("/{}", name)
        } else {
            format!("/{}/{}", namespace, name)
        }
    }
}

/// Current wall-clock time in nanoseconds since the Unix epoch.
///
/// Clocks set before the epoch read as 0.
pub fn current_timestamp_ns() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
