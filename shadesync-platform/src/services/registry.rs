use std::collections::BTreeMap;
use std::sync::Arc;

use shadesync_api::models::DeviceIdentity;
use shadesync_api::time::Clock;
use shadesync_api::transport::BridgeConnector;
use tokio::sync::RwLock;
use tracing::debug;

use crate::configs::Coordinator;

use super::coordinator::DeviceCoordinator;

/// Coordinator instances keyed by device identity.
///
/// Each physical unit gets exactly one coordinator, constructed on first
/// registration and dropped when the device leaves the accessory set.
pub struct CoordinatorRegistry<B, C> {
    bridge: Arc<B>,
    clock: Arc<C>,
    config: Coordinator,
    coordinators: RwLock<BTreeMap<DeviceIdentity, Arc<DeviceCoordinator<B, C>>>>,
}

impl<B, C> CoordinatorRegistry<B, C>
where
    B: BridgeConnector,
    C: Clock,
{
    pub fn new(bridge: Arc<B>, clock: Arc<C>, config: Coordinator) -> Self {
        Self {
            bridge,
            clock,
            config,
            coordinators: RwLock::new(BTreeMap::new()),
        }
    }

    /// Returns the coordinator for this identity, constructing it on first
    /// registration. Repeat registration hands back the existing instance.
    pub async fn register(&self, identity: DeviceIdentity) -> Arc<DeviceCoordinator<B, C>> {
        let mut coordinators = self.coordinators.write().await;

        coordinators
            .entry(identity.clone())
            .or_insert_with(|| {
                debug!("Registering coordinator for device {}", identity);
                Arc::new(DeviceCoordinator::new(
                    identity,
                    self.bridge.clone(),
                    self.clock.clone(),
                    &self.config,
                ))
            })
            .clone()
    }

    pub async fn get(&self, identity: &DeviceIdentity) -> Option<Arc<DeviceCoordinator<B, C>>> {
        self.coordinators.read().await.get(identity).cloned()
    }

    /// Drops the coordinator when the device is removed from the accessory
    /// set.
    pub async fn deregister(&self, identity: &DeviceIdentity) -> bool {
        let mut coordinators = self.coordinators.write().await;
        if coordinators.remove(identity).is_some() {
            debug!("Removed coordinator for device {}", identity);
            true
        } else {
            false
        }
    }

    pub async fn len(&self) -> usize {
        self.coordinators.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.coordinators.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use shadesync_api::models::{DeviceType, MacAddr};
    use shadesync_api::time::ManualClock;
    use time::OffsetDateTime;

    use crate::test_support::ScriptedBridge;

    use super::*;

    fn identity(mac: &str) -> DeviceIdentity {
        DeviceIdentity::new(DeviceType::RadioMotor433, MacAddr::new(mac))
    }

    #[tokio::test]
    async fn test_register_reuses_instance() {
        let bridge = Arc::new(ScriptedBridge::new(vec![]));
        let clock = Arc::new(ManualClock::new(OffsetDateTime::UNIX_EPOCH));
        let registry = CoordinatorRegistry::new(bridge, clock, Coordinator::default());

        let first = registry.register(identity("aa:bb:cc:dd:ee:01")).await;
        let second = registry.register(identity("aa:bb:cc:dd:ee:01")).await;

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.len().await, 1);
    }

    #[tokio::test]
    async fn test_deregister_drops_only_named_device() {
        let bridge = Arc::new(ScriptedBridge::new(vec![]));
        let clock = Arc::new(ManualClock::new(OffsetDateTime::UNIX_EPOCH));
        let registry = CoordinatorRegistry::new(bridge, clock, Coordinator::default());

        registry.register(identity("aa:bb:cc:dd:ee:01")).await;
        registry.register(identity("aa:bb:cc:dd:ee:02")).await;

        assert!(registry.deregister(&identity("aa:bb:cc:dd:ee:01")).await);
        assert!(!registry.deregister(&identity("aa:bb:cc:dd:ee:01")).await);

        assert!(registry.get(&identity("aa:bb:cc:dd:ee:01")).await.is_none());
        assert!(registry.get(&identity("aa:bb:cc:dd:ee:02")).await.is_some());
    }
}
