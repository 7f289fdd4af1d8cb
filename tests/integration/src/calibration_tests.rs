//! Magnetometer calibration sequencing against a scripted vehicle

use crate::test_utils::{init_test_logging, qualified, test_config, test_invoker, ScriptedVehicle};
use nautilus_vehicle::{CalibrationOutcome, CalibrationStep, MagnetometerCalibration};
use std::sync::Arc;

fn calibration(vehicle: Arc<ScriptedVehicle>) -> MagnetometerCalibration {
    init_test_logging();
    MagnetometerCalibration::new(test_invoker(vehicle), test_config().services)
}

#[tokio::test]
async fn test_calibration_then_stop() {
    let vehicle = Arc::new(ScriptedVehicle::new());
    let calibration = calibration(vehicle.clone());

    let outcome = calibration.spawn().await.unwrap();
    assert_eq!(outcome, CalibrationOutcome::Success);

    calibration.stop().await.unwrap();
    assert_eq!(
        vehicle.services(),
        vec![
            "/girona500/controller/enable_thrusters",
            "/girona500/imu_angle_estimator/calibrate_magnetometer",
            "/girona500/imu_angle_estimator/stop_magnetometer_calibration",
        ]
    );
}

#[tokio::test]
async fn test_raising_enable_skips_calibrate() {
    let vehicle = Arc::new(
        ScriptedVehicle::new().raising(&qualified("controller/enable_thrusters")),
    );
    let calibration = calibration(vehicle.clone());

    match calibration.spawn().await.unwrap() {
        CalibrationOutcome::Failure { step, reason } => {
            assert_eq!(step, CalibrationStep::EnableThrusters);
            assert!(reason.contains("timed out"));
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(vehicle.services().len(), 1);

    // Stop is still sent after a failed run
    calibration.stop().await.unwrap();
    assert_eq!(vehicle.services().len(), 2);
}

#[tokio::test]
async fn test_refused_calls_do_not_fail_the_sequence() {
    let vehicle = Arc::new(
        ScriptedVehicle::new().refusing(&qualified("imu_angle_estimator/calibrate_magnetometer")),
    );
    let calibration = calibration(vehicle.clone());

    assert!(calibration.spawn().await.unwrap().is_success());
    assert_eq!(vehicle.services().len(), 2);
}

#[tokio::test]
async fn test_failing_stop_is_only_logged() {
    let vehicle = Arc::new(
        ScriptedVehicle::new()
            .raising(&qualified("imu_angle_estimator/stop_magnetometer_calibration")),
    );
    let calibration = calibration(vehicle.clone());

    calibration.stop().await.unwrap();
    assert_eq!(
        vehicle.services(),
        vec!["/girona500/imu_angle_estimator/stop_magnetometer_calibration"]
    );
}
