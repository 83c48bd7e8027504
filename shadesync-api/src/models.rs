use core::fmt;

use serde::{Deserialize, Serialize};

/// Device categories reported by the bridge's device list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum DeviceType {
    /// The Wi-Fi bridge itself.
    Bridge,
    /// 433 MHz radio roller shutter motor.
    RadioMotor433,
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceType::Bridge => write!(f, "bridge"),
            DeviceType::RadioMotor433 => write!(f, "radio-motor-433"),
        }
    }
}

/// Radio MAC address of one unit, as reported by the bridge.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MacAddr(String);

impl MacAddr {
    pub fn new(mac: impl Into<String>) -> Self {
        Self(mac.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identity of one physical motor unit.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DeviceIdentity {
    /// Device category.
    pub device_type: DeviceType,
    /// Radio MAC address.
    pub mac: MacAddr,
}

impl DeviceIdentity {
    pub fn new(device_type: DeviceType, mac: MacAddr) -> Self {
        Self { device_type, mac }
    }
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.device_type, self.mac)
    }
}

/// Position in the host's coordinate space, 0 (closed) to 100 (open).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct HostPosition(u8);

/// Position in the device's own coordinate space, inverted relative to
/// host space.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DevicePosition(u8);

pub const POSITION_MAX: u8 = 100;

impl HostPosition {
    /// Clamps out-of-range input to the valid scale.
    pub fn new(value: u8) -> Self {
        Self(value.min(POSITION_MAX))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl DevicePosition {
    /// Clamps out-of-range input to the valid scale.
    pub fn new(value: u8) -> Self {
        Self(value.min(POSITION_MAX))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl From<DevicePosition> for HostPosition {
    fn from(position: DevicePosition) -> Self {
        Self(POSITION_MAX - position.0)
    }
}

impl From<HostPosition> for DevicePosition {
    fn from(position: HostPosition) -> Self {
        Self(POSITION_MAX - position.0)
    }
}

impl fmt::Display for HostPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for DevicePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Motion direction reported by the motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Operation {
    /// Travelling up towards open.
    OpenUp,
    /// Travelling down towards closed.
    CloseDown,
    /// Not moving.
    Stopped,
}

/// Power source class of the motor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoltageMode {
    /// Mains-powered unit.
    AcMotor,
    /// Battery-backed DC unit.
    DcMotor,
}

/// Last reported state of one motor, replaced wholesale on every fetch or
/// command acknowledgement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceStatus {
    /// Shade position in device coordinate space.
    pub current_position: DevicePosition,
    /// Motion direction at report time.
    pub operation: Operation,
    /// Battery charge in raw device units, absent on mains-powered units.
    pub battery_level: Option<u16>,
    /// Power source class.
    pub voltage_mode: VoltageMode,
    /// Radio signal strength in dBm.
    pub rssi: Option<i16>,
}

impl DeviceStatus {
    /// Whether the unit exposes a battery surface. DC motors always do;
    /// other units only when they actually report a charge level.
    pub fn supports_battery(&self) -> bool {
        self.voltage_mode == VoltageMode::DcMotor || self.battery_level.is_some()
    }
}

/// Command payload accepted by a motor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeviceCommand {
    /// Move the shade to a target position.
    SetPosition {
        /// Requested position in device coordinate space.
        target: DevicePosition,
    },
}
