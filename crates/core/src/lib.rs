//! Core functionality for the Nautilus operator console.
//!
//! This crate provides the configuration, error, logging and endpoint types
//! shared by the telemetry, vehicle and checklist crates.

pub mod config;
pub mod error;
pub mod logging;
pub mod types;

pub use config::{
    ChecklistConfig, ConsoleConfig, LoggingConfig, ServiceConfig, TelemetryConfig, VehicleConfig,
};
pub use error::{CoreError, Result};
pub use types::{current_timestamp_ns, VehicleEndpoint};
