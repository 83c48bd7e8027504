pub mod message;
pub mod models;
pub mod time;
pub mod transport;

pub use message::{AccessToken, BridgeRequest, BridgeResponse, MessageHeader};
pub use models::{
    DeviceCommand, DeviceIdentity, DevicePosition, DeviceStatus, DeviceType, HostPosition,
    MacAddr, Operation, VoltageMode,
};
#[cfg(feature = "mock")]
pub use time::ManualClock;
pub use time::{Clock, SystemClock};
pub use transport::{BridgeConnector, BridgeError};
