//! Drives one coordinator end to end against the simulated bridge.

use std::sync::Arc;
use std::time::Duration;

use shadesync_api::models::{DeviceIdentity, DevicePosition, DeviceType, MacAddr};
use shadesync_api::time::SystemClock;
use shadesync_mock::bridge::SimulatedBridge;
use shadesync_mock::motor::SimulatedMotor;
use shadesync_platform::configs::Coordinator;
use shadesync_platform::handles::{BatteryHandle, WindowCoveringHandle};
use shadesync_platform::services::CoordinatorRegistry;
use tracing::info;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let bridge = Arc::new(SimulatedBridge::with_latency(Duration::from_millis(40)));
    let identity = DeviceIdentity::new(DeviceType::RadioMotor433, MacAddr::new("f4:cf:a2:66:01:aa"));
    bridge
        .add_motor(
            identity.clone(),
            SimulatedMotor::battery_powered(DevicePosition::new(100), 8),
        )
        .await;

    let registry = CoordinatorRegistry::new(bridge, Arc::new(SystemClock), Coordinator::default());
    let coordinator = registry.register(identity).await;
    let window = WindowCoveringHandle::new(coordinator.clone());

    info!("Shade starts at {}", window.current_position().await);
    window.set_target_position(25).await;

    loop {
        tokio::time::sleep(Duration::from_millis(600)).await;

        let current = window.current_position().await;
        let target = window.target_position().await;
        info!(
            "current {} target {} ({:?})",
            current,
            target,
            window.motion_state().await
        );

        if current == target {
            break;
        }
    }

    if let Some(battery) = BatteryHandle::try_new(coordinator).await {
        info!("Battery at {}%", battery.battery_level().await);
    }
}
