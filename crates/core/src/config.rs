//! Configuration management for the operator console.
//!
//! The surrounding interaction surface supplies host, port and namespace
//! strings; everything else (telemetry keys, service names, poll period)
//! lives in a TOML document with the sections below.

use crate::error::{CoreError, Result};
use crate::types::VehicleEndpoint;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level console configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Vehicle connection parameters
    pub vehicle: VehicleConfig,
    /// Telemetry keys and poll period
    pub telemetry: TelemetryConfig,
    /// Remote service names
    pub services: ServiceConfig,
    /// Checklist document location
    pub checklists: ChecklistConfig,
    /// Logging output
    pub logging: LoggingConfig,
}

/// Vehicle connection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// Hostname or address of the vehicle bridge
    pub host: String,
    /// Bridge port
    pub port: u16,
    /// Vehicle namespace prefixed to every service name
    pub namespace: String,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 9090,
            namespace: String::new(),
        }
    }
}

/// Telemetry keys monitored by the status pollers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Poll period in milliseconds
    pub poll_interval_ms: u64,
    /// Snapshot key carrying the mission-active flag
    pub mission_active_key: String,
    /// Field path of the flag inside the snapshot
    pub mission_active_field: String,
    /// Older status key consulted when the primary yields nothing
    pub legacy_mission_active_key: Option<String>,
    /// Snapshot key carrying the thrusters-enabled flag
    pub thrusters_enabled_key: String,
    /// Field path of the flag inside the snapshot
    pub thrusters_enabled_field: String,
    /// Older status key consulted when the primary yields nothing
    pub legacy_thrusters_enabled_key: Option<String>,
    /// Feed key for rolling log entries
    pub log_key: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 1000,
            mission_active_key: "captain/state_feedback".to_string(),
            mission_active_field: "mission_active".to_string(),
            legacy_mission_active_key: Some("captain/mission_active".to_string()),
            thrusters_enabled_key: "controller/thruster_state".to_string(),
            thrusters_enabled_field: "enabled".to_string(),
            legacy_thrusters_enabled_key: Some("controller/thrusters_enabled".to_string()),
            log_key: "rosout_agg".to_string(),
        }
    }
}

impl TelemetryConfig {
    /// Poll period as a `Duration`
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Remote service names, relative to the vehicle namespace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Service enabling the thrusters
    pub enable_thrusters: String,
    /// Service starting magnetometer calibration
    pub calibrate_magnetometer: String,
    /// Service stopping magnetometer calibration
    pub stop_magnetometer_calibration: String,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            enable_thrusters: "controller/enable_thrusters".to_string(),
            calibrate_magnetometer: "imu_angle_estimator/calibrate_magnetometer".to_string(),
            stop_magnetometer_calibration: "imu_angle_estimator/stop_magnetometer_calibration"
                .to_string(),
        }
    }
}

/// Checklist document location
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChecklistConfig {
    /// Path to the checklist document (TOML or JSON)
    pub path: Option<PathBuf>,
}

/// Logging output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Fallback level filter when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl ConsoleConfig {
    /// Load and validate configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded console config");
        Ok(config)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Built-in defaults.
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Reject values the pollers and invoker cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.vehicle.host.trim().is_empty() {
            return Err(CoreError::InvalidConfig("vehicle.host is empty".into()));
        }
        if self.vehicle.port == 0 {
            return Err(CoreError::InvalidConfig("vehicle.port must be non-zero".into()));
        }
        if self.telemetry.poll_interval_ms == 0 {
            return Err(CoreError::InvalidConfig(
                "telemetry.poll_interval_ms must be non-zero".into(),
            ));
        }

        let required = [
            ("telemetry.mission_active_key", &self.telemetry.mission_active_key),
            ("telemetry.thrusters_enabled_key", &self.telemetry.thrusters_enabled_key),
            ("telemetry.log_key", &self.telemetry.log_key),
            ("services.enable_thrusters", &self.services.enable_thrusters),
            ("services.calibrate_magnetometer", &self.services.calibrate_magnetometer),
            (
                "services.stop_magnetometer_calibration",
                &self.services.stop_magnetometer_calibration,
            ),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(CoreError::InvalidConfig(format!("{} is empty", name)));
            }
        }

        Ok(())
    }

    /// Endpoint the remote invoker talks to.
    pub fn endpoint(&self) -> VehicleEndpoint {
        VehicleEndpoint::new(
            self.vehicle.host.clone(),
            self.vehicle.port,
            self.vehicle.namespace.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ConsoleConfig::default_config();
        assert!(config.validate().is_ok());
        assert_eq!(config.telemetry.poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ConsoleConfig::from_toml_str(
            r#"
            [vehicle]
            host = "10.0.0.5"
            namespace = "girona500"

            [telemetry]
            poll_interval_ms = 250
            legacy_thrusters_enabled_key = "old/thrusters"
            "#,
        )
        .unwrap();

        assert_eq!(config.vehicle.host, "10.0.0.5");
        assert_eq!(config.vehicle.port, 9090);
        assert_eq!(config.telemetry.poll_interval_ms, 250);
        assert_eq!(
            config.telemetry.legacy_thrusters_enabled_key.as_deref(),
            Some("old/thrusters")
        );
        assert_eq!(config.services, ServiceConfig::default());
    }

    #[test]
    fn test_zero_poll_interval_rejected() {
        let err = ConsoleConfig::from_toml_str("[telemetry]\npoll_interval_ms = 0\n").unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfig(_)));
    }

    #[test]
    fn test_empty_service_name_rejected() {
        let err =
            ConsoleConfig::from_toml_str("[services]\nenable_thrusters = \"  \"\n").unwrap_err();
        assert!(err.to_string().contains("services.enable_thrusters"));
    }

    #[test]
    fn test_malformed_toml_is_parse_error() {
        let err = ConsoleConfig::from_toml_str("[vehicle\nhost=").unwrap_err();
        assert!(matches!(err, CoreError::Parse(_)));
    }

    #[test]
    fn test_from_file_missing_path() {
        assert!(ConsoleConfig::from_file("/nonexistent/nautilus.toml").is_err());
    }

    #[test]
    fn test_endpoint_from_config() {
        let mut config = ConsoleConfig::default_config();
        config.vehicle.namespace = "sparus2".into();
        let endpoint = config.endpoint();
        assert_eq!(endpoint.port, 9090);
        assert_eq!(endpoint.qualify("controller/enable_thrusters"), "/sparus2/controller/enable_thrusters");
    }
}
