use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use shadesync_api::message::BridgeRequest;
use shadesync_api::models::{DeviceCommand, DeviceIdentity, DevicePosition, DeviceType, MacAddr};
use shadesync_api::transport::BridgeConnector;
use time::OffsetDateTime;
use tokio::time::interval;
use tracing::{error, info};

use crate::bridge::SimulatedBridge;
use crate::motor::SimulatedMotor;
use crate::settings::Settings;

pub mod bridge;
pub mod motor;
pub mod settings;

/// Ticks between randomly retargeting one of the simulated motors.
const RETARGET_EVERY: u32 = 10;

/// Runs the simulation standalone: registers the configured motors, then
/// polls them once a second and occasionally sends one off to a new target,
/// logging the protocol traffic for manual inspection.
pub async fn run(settings: &Arc<Settings>) {
    let bridge = Arc::new(SimulatedBridge::with_latency(settings.simulation.latency()));

    let mut identities = Vec::new();
    for index in 0..settings.simulation.motors {
        let identity = DeviceIdentity::new(
            DeviceType::RadioMotor433,
            MacAddr::new(format!("f4:cf:a2:66:01:{index:02x}")),
        );
        let initial = DevicePosition::new(index.wrapping_mul(37) % 101);

        bridge
            .add_motor(
                identity.clone(),
                SimulatedMotor::battery_powered(initial, settings.simulation.step),
            )
            .await;
        info!("Registered simulated device {} at {}", identity, initial);
        identities.push(identity);
    }

    let mut poll = interval(Duration::from_secs(1));
    let mut tick: u32 = 0;
    loop {
        poll.tick().await;

        if tick % RETARGET_EVERY == 0 {
            let identity = &identities[rand::rng().random_range(0..identities.len())];
            let target = DevicePosition::new(rand::rng().random_range(0..=100));
            let request = BridgeRequest::write_device(
                identity.clone(),
                bridge.access_token().expect("simulated session has a token"),
                DeviceCommand::SetPosition { target },
                OffsetDateTime::now_utc(),
            );

            match bridge.send(request).await {
                Ok(_) => info!("Device {} now heading to {}", identity, target),
                Err(e) => error!("Retarget of device {} failed: {}", identity, e),
            }
        }

        for identity in &identities {
            let request = BridgeRequest::read_device(identity.clone(), OffsetDateTime::now_utc());
            match bridge.send(request).await.and_then(|r| r.into_read_status()) {
                Ok(status) => info!(
                    "Device {} at {} ({:?})",
                    identity, status.current_position, status.operation
                ),
                Err(e) => error!("Poll of device {} failed: {}", identity, e),
            }
        }

        tick = tick.wrapping_add(1);
    }
}
