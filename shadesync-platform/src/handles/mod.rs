mod battery_handle;
mod window_handle;

pub use battery_handle::{BatteryHandle, ChargingState, LowBattery};
pub use window_handle::{MotionState, WindowCoveringHandle};
