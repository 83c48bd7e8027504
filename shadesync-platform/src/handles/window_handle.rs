use std::sync::Arc;

use shadesync_api::models::{HostPosition, Operation};
use shadesync_api::time::Clock;
use shadesync_api::transport::BridgeConnector;
use tracing::debug;

use crate::services::DeviceCoordinator;

/// Direction of travel as exposed to the host, in host coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionState {
    Increasing,
    Decreasing,
    Stopped,
}

/// Host read/write surface for the window covering capability.
pub struct WindowCoveringHandle<B, C> {
    coordinator: Arc<DeviceCoordinator<B, C>>,
}

impl<B, C> WindowCoveringHandle<B, C>
where
    B: BridgeConnector,
    C: Clock,
{
    pub fn new(coordinator: Arc<DeviceCoordinator<B, C>>) -> Self {
        Self { coordinator }
    }

    pub async fn current_position(&self) -> u8 {
        debug!("Triggered GET CurrentPosition");

        self.coordinator.current_position().await.value()
    }

    pub async fn target_position(&self) -> u8 {
        debug!("Triggered GET TargetPosition");

        self.coordinator.target_position().await.value()
    }

    /// Acknowledges as soon as the intent is recorded and dispatched;
    /// delivery is fire-and-forget.
    pub async fn set_target_position(&self, value: u8) {
        debug!("Triggered SET TargetPosition: {}", value);

        self.coordinator
            .set_target_position(HostPosition::new(value))
            .await;
    }

    pub async fn motion_state(&self) -> MotionState {
        debug!("Triggered GET PositionState");

        match self.coordinator.operation().await {
            Operation::OpenUp => MotionState::Decreasing,
            Operation::CloseDown => MotionState::Increasing,
            Operation::Stopped => MotionState::Stopped,
        }
    }
}

#[cfg(test)]
mod tests {
    use shadesync_api::time::ManualClock;
    use time::OffsetDateTime;

    use crate::configs::Coordinator;
    use crate::test_support::{ScriptedBridge, moving_status, status_at, test_identity};

    use super::*;

    fn handle(bridge: Arc<ScriptedBridge>) -> WindowCoveringHandle<ScriptedBridge, ManualClock> {
        let clock = Arc::new(ManualClock::new(OffsetDateTime::UNIX_EPOCH));
        let coordinator = Arc::new(DeviceCoordinator::new(
            test_identity(),
            bridge,
            clock,
            &Coordinator::default(),
        ));
        WindowCoveringHandle::new(coordinator)
    }

    #[tokio::test]
    async fn test_positions_are_host_space() {
        let bridge = Arc::new(ScriptedBridge::new(vec![Ok(status_at(30))]));
        let handle = handle(bridge);

        assert_eq!(handle.current_position().await, 70);
        assert_eq!(handle.target_position().await, 70);
    }

    #[tokio::test]
    async fn test_motion_state_mapping() {
        let bridge = Arc::new(ScriptedBridge::new(vec![Ok(moving_status(
            50,
            Operation::OpenUp,
        ))]));
        let handle = handle(bridge);

        assert_eq!(handle.motion_state().await, MotionState::Decreasing);
    }

    #[tokio::test]
    async fn test_set_target_clamps_host_input() {
        let bridge = Arc::new(ScriptedBridge::new(vec![
            Ok(moving_status(30, Operation::OpenUp)),
        ]));
        let handle = handle(bridge);

        handle.set_target_position(150).await;

        // Clamped to 100 and held as the optimistic target.
        assert_eq!(handle.target_position().await, 100);
    }
}
