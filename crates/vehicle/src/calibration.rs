//! Magnetometer calibration sequencing
//!
//! Calibration is two calls run as one background unit: enable the
//! thrusters, then start the calibration. A single attempt is made; the
//! run reports success only if neither call raised. Stopping is a separate
//! fire-and-forget call.

use crate::invoker::RemoteActionInvoker;
use nautilus_core::ServiceConfig;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Result of one calibration attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalibrationOutcome {
    /// Both calls completed
    Success,
    /// A call raised
    Failure {
        /// Step that failed
        step: CalibrationStep,
        /// Failure reason
        reason: String,
    },
}

impl CalibrationOutcome {
    /// Check if the sequence completed
    pub fn is_success(&self) -> bool {
        matches!(self, CalibrationOutcome::Success)
    }
}

/// Steps of the calibration sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalibrationStep {
    /// Enabling the thrusters
    EnableThrusters,
    /// Starting the magnetometer calibration
    Calibrate,
}

/// One calibration attempt, marked started by [`MagnetometerCalibration::run`].
#[derive(Debug, Default)]
pub struct CalibrationRun {
    started: bool,
}

impl CalibrationRun {
    /// Create a fresh, unstarted run
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the sequence has begun
    pub fn is_started(&self) -> bool {
        self.started
    }
}

/// Calibration commands for one vehicle
#[derive(Clone)]
pub struct MagnetometerCalibration {
    invoker: RemoteActionInvoker,
    services: ServiceConfig,
}

impl MagnetometerCalibration {
    /// Create from an invoker and the configured service names
    pub fn new(invoker: RemoteActionInvoker, services: ServiceConfig) -> Self {
        Self { invoker, services }
    }

    /// Run the enable-thrusters / calibrate sequence once.
    ///
    /// Only a raised call counts as failure; service messages are logged.
    pub async fn run(&self, run: &mut CalibrationRun) -> CalibrationOutcome {
        run.started = true;
        info!("magnetometer calibration started");

        let steps = [
            (CalibrationStep::EnableThrusters, &self.services.enable_thrusters),
            (CalibrationStep::Calibrate, &self.services.calibrate_magnetometer),
        ];

        for (step, service) in steps {
            if let Err(e) = self.invoker.call(service, None).await {
                warn!(step = ?step, error = %e, "magnetometer calibration failed");
                return CalibrationOutcome::Failure {
                    step,
                    reason: e.to_string(),
                };
            }
        }

        info!("magnetometer calibration sequence completed");
        CalibrationOutcome::Success
    }

    /// Run the sequence as a background unit of work.
    pub fn spawn(&self) -> JoinHandle<CalibrationOutcome> {
        let calibration = self.clone();
        tokio::spawn(async move { calibration.run(&mut CalibrationRun::new()).await })
    }

    /// Ask the vehicle to stop calibrating. The result is only logged.
    pub fn stop(&self) -> JoinHandle<()> {
        let invoker = self.invoker.clone();
        let service = self.services.stop_magnetometer_calibration.clone();

        tokio::spawn(async move {
            match invoker.call(&service, None).await {
                Ok(_) => info!("magnetometer calibration stop requested"),
                Err(e) => warn!(error = %e, "stop magnetometer calibration failed"),
            }
        })
    }
}
