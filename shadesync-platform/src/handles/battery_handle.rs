use std::sync::Arc;

use shadesync_api::time::Clock;
use shadesync_api::transport::BridgeConnector;
use tracing::debug;

use crate::services::DeviceCoordinator;

/// Charge state as exposed to the host. Radio motors report no charging
/// information, so this is always `NotCharging`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargingState {
    NotCharging,
}

/// Low battery indication, flagged below 20 % of full charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LowBattery {
    Normal,
    Low,
}

/// Raw device charge units per normalized percent point.
const RAW_UNITS_PER_PERCENT: u16 = 10;
/// Raw charge level below which the unit counts as low battery.
const RAW_LOW_BATTERY_THRESHOLD: u16 = 200;
/// Raw full-scale charge, assumed when a battery unit omits its level.
const RAW_FULL_CHARGE: u16 = 1000;

/// Host read surface for the battery capability.
pub struct BatteryHandle<B, C> {
    coordinator: Arc<DeviceCoordinator<B, C>>,
}

impl<B, C> BatteryHandle<B, C>
where
    B: BridgeConnector,
    C: Clock,
{
    /// Returns a handle only for units that actually have a battery surface;
    /// mains-powered motors expose nothing, which is capability absence,
    /// not an error.
    pub async fn try_new(coordinator: Arc<DeviceCoordinator<B, C>>) -> Option<Self> {
        if coordinator.supports_battery().await {
            Some(Self { coordinator })
        } else {
            None
        }
    }

    /// Battery charge normalized to 0-100.
    pub async fn battery_level(&self) -> u8 {
        debug!("Triggered GET BatteryLevel");

        let raw = self.coordinator.battery_level().await.unwrap_or(0);
        ((raw / RAW_UNITS_PER_PERCENT).min(100)) as u8
    }

    pub async fn low_battery_status(&self) -> LowBattery {
        debug!("Triggered GET StatusLowBattery");

        // A unit that stops reporting its level reads as full charge.
        let raw = self
            .coordinator
            .battery_level()
            .await
            .unwrap_or(RAW_FULL_CHARGE);
        if raw < RAW_LOW_BATTERY_THRESHOLD {
            LowBattery::Low
        } else {
            LowBattery::Normal
        }
    }

    pub async fn charging_state(&self) -> ChargingState {
        debug!("Triggered GET ChargingState");

        ChargingState::NotCharging
    }
}

#[cfg(test)]
mod tests {
    use shadesync_api::models::{DeviceStatus, Operation, VoltageMode};
    use shadesync_api::time::ManualClock;
    use time::OffsetDateTime;

    use crate::configs::Coordinator;
    use crate::test_support::{ScriptedBridge, status_at, test_identity};

    use super::*;

    fn mains_status(position: u8) -> DeviceStatus {
        DeviceStatus {
            battery_level: None,
            voltage_mode: VoltageMode::AcMotor,
            operation: Operation::Stopped,
            ..status_at(position)
        }
    }

    fn coordinator(
        bridge: Arc<ScriptedBridge>,
    ) -> Arc<DeviceCoordinator<ScriptedBridge, ManualClock>> {
        let clock = Arc::new(ManualClock::new(OffsetDateTime::UNIX_EPOCH));
        Arc::new(DeviceCoordinator::new(
            test_identity(),
            bridge,
            clock,
            &Coordinator::default(),
        ))
    }

    #[tokio::test]
    async fn test_mains_unit_has_no_battery_surface() {
        let bridge = Arc::new(ScriptedBridge::new(vec![Ok(mains_status(30))]));
        let handle = BatteryHandle::try_new(coordinator(bridge)).await;

        assert!(handle.is_none());
    }

    #[tokio::test]
    async fn test_level_normalized_to_percent() {
        let mut status = status_at(30);
        status.battery_level = Some(940);

        let bridge = Arc::new(ScriptedBridge::new(vec![Ok(status)]));
        let handle = BatteryHandle::try_new(coordinator(bridge)).await.unwrap();

        assert_eq!(handle.battery_level().await, 94);
        assert_eq!(handle.low_battery_status().await, LowBattery::Normal);
    }

    #[tokio::test]
    async fn test_low_battery_below_threshold() {
        let mut status = status_at(30);
        status.battery_level = Some(180);

        let bridge = Arc::new(ScriptedBridge::new(vec![Ok(status)]));
        let handle = BatteryHandle::try_new(coordinator(bridge)).await.unwrap();

        assert_eq!(handle.battery_level().await, 18);
        assert_eq!(handle.low_battery_status().await, LowBattery::Low);
        assert_eq!(handle.charging_state().await, ChargingState::NotCharging);
    }
}
