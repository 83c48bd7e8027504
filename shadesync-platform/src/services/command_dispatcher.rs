use std::sync::Arc;

use shadesync_api::message::BridgeRequest;
use shadesync_api::models::{DeviceCommand, DeviceIdentity, DeviceStatus};
use shadesync_api::time::Clock;
use shadesync_api::transport::{BridgeConnector, BridgeError};
use tracing::{debug, warn};

use super::status_cache::StatusCache;

/// Sends write commands to one device and folds the acknowledged state back
/// into the status cache.
///
/// Writes carry explicit user intent, so they are never throttled or
/// deduplicated; every call reaches the device.
pub struct CommandDispatcher<B, C> {
    identity: DeviceIdentity,
    bridge: Arc<B>,
    clock: Arc<C>,
    cache: Arc<StatusCache<B, C>>,
}

impl<B, C> CommandDispatcher<B, C>
where
    B: BridgeConnector,
    C: Clock,
{
    pub fn new(
        identity: DeviceIdentity,
        bridge: Arc<B>,
        clock: Arc<C>,
        cache: Arc<StatusCache<B, C>>,
    ) -> Self {
        Self {
            identity,
            bridge,
            clock,
            cache,
        }
    }

    /// Dispatches one command and returns the device state reported by the
    /// acknowledgement. A transport failure leaves the cache untouched.
    pub async fn send_command(&self, command: DeviceCommand) -> Result<DeviceStatus, BridgeError> {
        let outcome = match self.bridge.access_token() {
            Some(token) => {
                let request = BridgeRequest::write_device(
                    self.identity.clone(),
                    token,
                    command.clone(),
                    self.clock.now(),
                );

                debug!("Dispatching {:?} to device {}", command, self.identity);

                match self.bridge.send(request).await {
                    Ok(response) => response.into_write_status(),
                    Err(e) => Err(e),
                }
            }
            None => Err(BridgeError::Unauthorized),
        };

        match outcome {
            Ok(status) => {
                self.cache.apply_ack(status.clone()).await;
                Ok(status)
            }
            Err(e) => {
                warn!("Command for device {} failed: {}", self.identity, e);
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use shadesync_api::models::DevicePosition;
    use shadesync_api::time::ManualClock;
    use time::OffsetDateTime;

    use crate::test_support::{ScriptedBridge, status_at, test_identity};

    use super::*;

    fn setup(
        bridge: Arc<ScriptedBridge>,
    ) -> (
        CommandDispatcher<ScriptedBridge, ManualClock>,
        Arc<StatusCache<ScriptedBridge, ManualClock>>,
    ) {
        let clock = Arc::new(ManualClock::new(OffsetDateTime::UNIX_EPOCH));
        let cache = Arc::new(StatusCache::new(
            test_identity(),
            bridge.clone(),
            clock.clone(),
            Duration::from_millis(500),
        ));
        let dispatcher = CommandDispatcher::new(test_identity(), bridge, clock, cache.clone());
        (dispatcher, cache)
    }

    fn set_position(target: u8) -> DeviceCommand {
        DeviceCommand::SetPosition {
            target: DevicePosition::new(target),
        }
    }

    #[tokio::test]
    async fn test_ack_folds_into_cache() {
        let bridge = Arc::new(ScriptedBridge::new(vec![Ok(status_at(60))]));
        let (dispatcher, cache) = setup(bridge.clone());

        let status = dispatcher.send_command(set_position(60)).await.unwrap();
        assert_eq!(status.current_position.value(), 60);

        // The ack is fresh data; the next refresh answers from cache.
        let refreshed = cache.refresh().await.unwrap();
        assert_eq!(refreshed.current_position.value(), 60);
        assert_eq!(bridge.requests(), 1);
    }

    #[tokio::test]
    async fn test_failure_leaves_cache_untouched() {
        let bridge = Arc::new(ScriptedBridge::new(vec![Err(BridgeError::Timeout)]));
        let (dispatcher, cache) = setup(bridge);

        let result = dispatcher.send_command(set_position(60)).await;
        assert_eq!(result, Err(BridgeError::Timeout));
        assert!(cache.latest().await.is_none());
    }

    #[tokio::test]
    async fn test_every_command_reaches_the_device() {
        let bridge = Arc::new(ScriptedBridge::new(vec![
            Ok(status_at(60)),
            Ok(status_at(60)),
        ]));
        let (dispatcher, _cache) = setup(bridge.clone());

        dispatcher.send_command(set_position(60)).await.unwrap();
        dispatcher.send_command(set_position(60)).await.unwrap();

        assert_eq!(bridge.writes(), 2);
    }
}
