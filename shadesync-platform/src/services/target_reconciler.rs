use std::sync::Arc;
use std::time::Duration;

use shadesync_api::models::{DeviceCommand, DevicePosition, HostPosition, Operation};
use shadesync_api::time::Clock;
use shadesync_api::transport::BridgeConnector;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::command_dispatcher::CommandDispatcher;
use super::status_cache::StatusCache;

/// Most recent locally requested target and when it was set. Only an
/// explicit host write replaces it.
#[derive(Debug, Clone, Copy)]
pub struct TargetState {
    pub value: HostPosition,
    pub set_at: OffsetDateTime,
}

/// Reconciles the locally requested target position against the position the
/// device actually reports.
///
/// The motor reports only where it is, never where it is going, and a move
/// takes tens of seconds. While the shade travels, host polls must keep
/// seeing the requested target rather than the position it is passing
/// through. Once the cache's freshest data has disagreed with the target for
/// longer than the reconciliation window, the target counts as lost and the
/// reported value falls back to the device. The window is anchored to the
/// snapshot's fetch time, so it lapses only when refreshes stop succeeding.
pub struct TargetReconciler<B, C> {
    cache: Arc<StatusCache<B, C>>,
    dispatcher: Arc<CommandDispatcher<B, C>>,
    clock: Arc<C>,
    window: Duration,
    target: Mutex<Option<TargetState>>,
}

impl<B, C> TargetReconciler<B, C>
where
    B: BridgeConnector,
    C: Clock,
{
    pub fn new(
        cache: Arc<StatusCache<B, C>>,
        dispatcher: Arc<CommandDispatcher<B, C>>,
        clock: Arc<C>,
        window: Duration,
    ) -> Self {
        Self {
            cache,
            dispatcher,
            clock,
            window,
            target: Mutex::new(None),
        }
    }

    /// Position reported to the host, in host coordinate space. Never
    /// consults the target.
    pub async fn current_position(&self) -> HostPosition {
        self.cache.refresh_soft().await;

        match self.cache.latest().await {
            Some(snapshot) => HostPosition::from(snapshot.status.current_position),
            None => HostPosition::default(),
        }
    }

    /// Target position reported to the host.
    pub async fn target_position(&self) -> HostPosition {
        self.cache.refresh_soft().await;

        let target = *self.target.lock().await;
        let snapshot = self.cache.latest().await;

        let Some(target) = target else {
            return snapshot
                .map(|s| HostPosition::from(s.status.current_position))
                .unwrap_or_default();
        };

        let Some(snapshot) = snapshot else {
            // No device data at all yet; the outstanding request is all
            // there is to report.
            return target.value;
        };

        let device_current = HostPosition::from(snapshot.status.current_position);
        if target.value == device_current {
            return target.value;
        }

        let elapsed = self.clock.now() - snapshot.fetched_at;
        if elapsed > time::Duration::milliseconds(self.window.as_millis() as i64) {
            debug!(
                "Target {} for device {} aged out, reporting device position {}",
                target.value,
                self.cache.identity(),
                device_current
            );
            device_current
        } else {
            target.value
        }
    }

    /// Records the requested target before any network traffic, then
    /// dispatches the move. A dispatch failure is logged, not surfaced; the
    /// next read-triggered refresh is the de facto retry.
    pub async fn set_target_position(&self, value: HostPosition) {
        {
            let mut target = self.target.lock().await;
            *target = Some(TargetState {
                value,
                set_at: self.clock.now(),
            });
        }

        let command = DeviceCommand::SetPosition {
            target: DevicePosition::from(value),
        };
        if let Err(e) = self.dispatcher.send_command(command).await {
            warn!(
                "Target dispatch for device {} failed: {}",
                self.cache.identity(),
                e
            );
        }
    }

    /// Momentary motion direction from the last device report.
    pub async fn operation(&self) -> Operation {
        self.cache.refresh_soft().await;

        self.cache
            .latest()
            .await
            .map(|snapshot| snapshot.status.operation)
            .unwrap_or(Operation::Stopped)
    }
}
