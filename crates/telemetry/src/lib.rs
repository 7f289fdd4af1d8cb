//! Nautilus Telemetry - live vehicle state for the operator console
//!
//! This crate provides:
//! - A checked tree model of loosely structured telemetry snapshots
//! - The [`TelemetrySource`] boundary plus an in-memory [`SnapshotStore`]
//! - Dotted-path field resolution with explicit "no new data" handling
//! - A generic edge-trigger poller parameterized by sampling strategy
//! - Mission, thruster and log monitors built on that poller
//!
//! # Examples
//!
//! ```no_run
//! use nautilus_telemetry::{resolve, Resolution, TelemetryValue};
//!
//! let snapshot = TelemetryValue::map([
//!     ("_new_data", TelemetryValue::Bool(true)),
//!     ("depth", TelemetryValue::Float(12.5)),
//! ]);
//! assert_eq!(resolve("depth", &snapshot), Resolution::Value(TelemetryValue::Float(12.5)));
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod log;
pub mod monitor;
pub mod poller;
pub mod probe;
pub mod resolver;
pub mod source;
pub mod value;

pub use error::{TelemetryError, TelemetryResult};
pub use log::{DisplayStyle, LogEntry, LogLevel};
pub use monitor::{MonitorFeeds, VehicleMonitor};
pub use poller::{
    EdgeTriggerPoller, PollerHandle, PollerState, StatusSample, DEFAULT_POLL_PERIOD,
    MIN_POLL_PERIOD,
};
pub use probe::{ChangeRule, FlagProbe, LogProbe, Probe, WithFallback};
pub use resolver::{lookup, resolve, resolve_fields, FieldValue, Resolution, UNREADABLE};
pub use source::{SnapshotStore, TelemetrySource};
pub use value::{TelemetryValue, NEW_DATA_FLAG};
