use std::sync::Arc;
use std::time::Duration;

use shadesync_api::models::{DeviceIdentity, DeviceType, MacAddr};
use shadesync_api::time::ManualClock;
use shadesync_mock::bridge::SimulatedBridge;
use shadesync_mock::motor::SimulatedMotor;
use shadesync_platform::configs::Coordinator;
use shadesync_platform::services::DeviceCoordinator;
use time::OffsetDateTime;

pub fn identity() -> DeviceIdentity {
    DeviceIdentity::new(DeviceType::RadioMotor433, MacAddr::new("f4:cf:a2:66:01:aa"))
}

pub struct TestRig {
    pub bridge: Arc<SimulatedBridge>,
    pub clock: Arc<ManualClock>,
    pub coordinator: Arc<DeviceCoordinator<SimulatedBridge, ManualClock>>,
}

pub async fn rig(motor: SimulatedMotor) -> TestRig {
    rig_inner(motor, None).await
}

pub async fn rig_with_latency(motor: SimulatedMotor, latency: Duration) -> TestRig {
    rig_inner(motor, Some(latency)).await
}

async fn rig_inner(motor: SimulatedMotor, latency: Option<Duration>) -> TestRig {
    let bridge = Arc::new(SimulatedBridge::with_latency(latency));
    bridge.add_motor(identity(), motor).await;

    let clock = Arc::new(ManualClock::new(OffsetDateTime::UNIX_EPOCH));
    let coordinator = Arc::new(DeviceCoordinator::new(
        identity(),
        bridge.clone(),
        clock.clone(),
        &Coordinator::default(),
    ));

    TestRig {
        bridge,
        clock,
        coordinator,
    }
}
