use shadesync_api::models::{DevicePosition, DeviceStatus, Operation, VoltageMode};

// Battery simulation constants
const BATTERY_FULL: u16 = 1000;
const BATTERY_DRAIN_MOVING: u16 = 2;

const BASE_RSSI: i16 = -50;

/// Motor model for the simulated bridge: device-space position walks toward
/// its target a fixed step on every status poll, so simulations stay
/// deterministic without a clock.
#[derive(Debug, Clone)]
pub struct SimulatedMotor {
    position: DevicePosition,
    target: DevicePosition,
    battery: Option<u16>,
    voltage_mode: VoltageMode,
    step: u8,
}

impl SimulatedMotor {
    pub fn battery_powered(initial: DevicePosition, step: u8) -> Self {
        Self {
            position: initial,
            target: initial,
            battery: Some(BATTERY_FULL),
            voltage_mode: VoltageMode::DcMotor,
            step: step.max(1),
        }
    }

    pub fn mains_powered(initial: DevicePosition, step: u8) -> Self {
        Self {
            position: initial,
            target: initial,
            battery: None,
            voltage_mode: VoltageMode::AcMotor,
            step: step.max(1),
        }
    }

    pub fn set_target(&mut self, target: DevicePosition) {
        self.target = target;
    }

    /// Advances one poll tick toward the target, draining the battery while
    /// the motor is in motion.
    pub fn advance(&mut self) {
        let position = self.position.value();
        let target = self.target.value();
        if position == target {
            return;
        }

        let step = self.step.min(position.abs_diff(target));
        let next = if target > position {
            position + step
        } else {
            position - step
        };
        self.position = DevicePosition::new(next);

        if let Some(battery) = &mut self.battery {
            *battery = battery.saturating_sub(BATTERY_DRAIN_MOVING);
        }
    }

    /// Device position grows toward fully closed, so remaining travel maps
    /// directly onto the reported direction.
    pub fn operation(&self) -> Operation {
        match self.target.value().cmp(&self.position.value()) {
            core::cmp::Ordering::Greater => Operation::CloseDown,
            core::cmp::Ordering::Less => Operation::OpenUp,
            core::cmp::Ordering::Equal => Operation::Stopped,
        }
    }

    pub fn status(&self) -> DeviceStatus {
        DeviceStatus {
            current_position: self.position,
            operation: self.operation(),
            battery_level: self.battery,
            voltage_mode: self.voltage_mode,
            rssi: Some(BASE_RSSI),
        }
    }
}
