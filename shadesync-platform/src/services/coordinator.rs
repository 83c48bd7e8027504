use std::sync::Arc;

use shadesync_api::models::{DeviceIdentity, HostPosition, Operation};
use shadesync_api::time::Clock;
use shadesync_api::transport::BridgeConnector;

use crate::configs::Coordinator;

use super::command_dispatcher::CommandDispatcher;
use super::status_cache::StatusCache;
use super::target_reconciler::TargetReconciler;

/// One device's coordinator: status cache, command dispatcher and target
/// reconciler bundled behind the host read/write contract. Constructed once
/// per device identity and owned for the device's registered lifetime.
pub struct DeviceCoordinator<B, C> {
    cache: Arc<StatusCache<B, C>>,
    reconciler: TargetReconciler<B, C>,
}

impl<B, C> DeviceCoordinator<B, C>
where
    B: BridgeConnector,
    C: Clock,
{
    pub fn new(
        identity: DeviceIdentity,
        bridge: Arc<B>,
        clock: Arc<C>,
        config: &Coordinator,
    ) -> Self {
        let cache = Arc::new(StatusCache::new(
            identity.clone(),
            bridge.clone(),
            clock.clone(),
            config.staleness(),
        ));
        let dispatcher = Arc::new(CommandDispatcher::new(
            identity,
            bridge,
            clock.clone(),
            cache.clone(),
        ));
        let reconciler = TargetReconciler::new(
            cache.clone(),
            dispatcher,
            clock,
            config.reconcile_window(),
        );

        Self { cache, reconciler }
    }

    pub fn identity(&self) -> &DeviceIdentity {
        self.cache.identity()
    }

    pub async fn current_position(&self) -> HostPosition {
        self.reconciler.current_position().await
    }

    pub async fn target_position(&self) -> HostPosition {
        self.reconciler.target_position().await
    }

    pub async fn set_target_position(&self, value: HostPosition) {
        self.reconciler.set_target_position(value).await
    }

    pub async fn operation(&self) -> Operation {
        self.reconciler.operation().await
    }

    /// Battery charge in raw device units, if the unit reports one.
    pub async fn battery_level(&self) -> Option<u16> {
        self.cache.refresh_soft().await;

        self.cache
            .latest()
            .await
            .and_then(|snapshot| snapshot.status.battery_level)
    }

    /// One-time capability probe: whether the unit exposes a battery
    /// surface at all.
    pub async fn supports_battery(&self) -> bool {
        self.cache.refresh_soft().await;

        self.cache
            .latest()
            .await
            .map(|snapshot| snapshot.status.supports_battery())
            .unwrap_or(false)
    }
}
