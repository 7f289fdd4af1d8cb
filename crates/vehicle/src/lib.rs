//! Nautilus Vehicle - remote commands for the operator console
//!
//! This crate provides:
//! - The [`ServiceCaller`] boundary to the vehicle transport
//! - [`RemoteActionInvoker`], which runs calls on the blocking pool and
//!   reports a success/failure outcome
//! - Magnetometer calibration sequencing

#![warn(missing_docs)]

pub mod calibration;
pub mod invoker;

pub use calibration::{CalibrationOutcome, CalibrationRun, CalibrationStep, MagnetometerCalibration};
pub use invoker::{
    InvocationError, InvocationOutcome, RemoteActionInvoker, ServiceCaller, ServiceParameters,
    ServiceResponse,
};
