//! End-to-end tests across the console crates
//!
//! This test suite validates:
//! - Status monitoring of a live snapshot store, including disconnects
//! - Checklist runs loaded from a document against live telemetry
//! - Magnetometer calibration sequencing over a scripted vehicle

pub mod test_utils;

#[cfg(test)]
mod monitor_tests;

#[cfg(test)]
mod checklist_tests;

#[cfg(test)]
mod calibration_tests;
