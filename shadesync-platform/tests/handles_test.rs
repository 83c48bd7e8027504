mod common;

use std::time::Duration;

use shadesync_api::models::DevicePosition;
use shadesync_mock::motor::SimulatedMotor;
use shadesync_platform::handles::{
    BatteryHandle, ChargingState, LowBattery, MotionState, WindowCoveringHandle,
};

use crate::common::rig;

#[tokio::test]
async fn test_window_handle_round_trip() {
    let rig = rig(SimulatedMotor::battery_powered(DevicePosition::new(30), 10)).await;
    let handle = WindowCoveringHandle::new(rig.coordinator.clone());

    assert_eq!(handle.current_position().await, 70);

    // Host 40 is device 60; the shade closes down to get there.
    handle.set_target_position(40).await;

    rig.clock.advance(Duration::from_millis(600));
    assert_eq!(handle.motion_state().await, MotionState::Increasing);
    assert_eq!(handle.target_position().await, 40);
}

#[tokio::test]
async fn test_motion_stops_on_arrival() {
    let rig = rig(SimulatedMotor::battery_powered(DevicePosition::new(30), 30)).await;
    let handle = WindowCoveringHandle::new(rig.coordinator.clone());

    handle.set_target_position(40).await;

    // One poll is enough at this travel speed.
    rig.clock.advance(Duration::from_millis(600));
    assert_eq!(handle.motion_state().await, MotionState::Stopped);
    assert_eq!(handle.current_position().await, 40);
}

#[tokio::test]
async fn test_battery_surface_for_battery_unit() {
    let rig = rig(SimulatedMotor::battery_powered(DevicePosition::new(30), 10)).await;

    let handle = BatteryHandle::try_new(rig.coordinator.clone())
        .await
        .expect("battery unit exposes the surface");

    assert_eq!(handle.battery_level().await, 100);
    assert_eq!(handle.low_battery_status().await, LowBattery::Normal);
    assert_eq!(handle.charging_state().await, ChargingState::NotCharging);
}

#[tokio::test]
async fn test_no_battery_surface_for_mains_unit() {
    let rig = rig(SimulatedMotor::mains_powered(DevicePosition::new(30), 10)).await;

    assert!(BatteryHandle::try_new(rig.coordinator.clone()).await.is_none());
}
