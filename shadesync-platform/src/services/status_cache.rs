use std::sync::Arc;
use std::time::Duration;

use shadesync_api::message::BridgeRequest;
use shadesync_api::models::{DeviceIdentity, DeviceStatus};
use shadesync_api::time::Clock;
use shadesync_api::transport::{BridgeConnector, BridgeError};
use time::OffsetDateTime;
use tokio::sync::{Mutex, watch};
use tracing::{debug, error};

/// Last known device status and when it was fetched. Replaced wholesale on
/// every successful fetch or command acknowledgement, never mutated in place.
#[derive(Debug, Clone)]
pub struct StatusSnapshot {
    pub status: DeviceStatus,
    pub fetched_at: OffsetDateTime,
}

type FetchOutcome = Result<DeviceStatus, BridgeError>;

/// Snapshot and in-flight marker share one lock so no caller can observe the
/// pair half-updated.
struct CacheState {
    snapshot: Option<StatusSnapshot>,
    inflight: Option<watch::Receiver<Option<FetchOutcome>>>,
}

enum Role {
    Leader(watch::Sender<Option<FetchOutcome>>),
    Waiter(watch::Receiver<Option<FetchOutcome>>),
}

/// Freshness-bounded cache of one device's reported status.
///
/// A refresh inside the staleness threshold answers from the snapshot
/// without any device traffic; concurrent refreshes past the threshold share
/// a single in-flight request and all observe its outcome. A failed fetch
/// leaves the snapshot untouched, stale data being preferred over none.
pub struct StatusCache<B, C> {
    identity: DeviceIdentity,
    bridge: Arc<B>,
    clock: Arc<C>,
    staleness: Duration,
    state: Mutex<CacheState>,
}

impl<B, C> StatusCache<B, C>
where
    B: BridgeConnector,
    C: Clock,
{
    pub fn new(
        identity: DeviceIdentity,
        bridge: Arc<B>,
        clock: Arc<C>,
        staleness: Duration,
    ) -> Self {
        Self {
            identity,
            bridge,
            clock,
            staleness,
            state: Mutex::new(CacheState {
                snapshot: None,
                inflight: None,
            }),
        }
    }

    pub fn identity(&self) -> &DeviceIdentity {
        &self.identity
    }

    /// Snapshot currently held, without issuing any device request.
    pub async fn latest(&self) -> Option<StatusSnapshot> {
        self.state.lock().await.snapshot.clone()
    }

    /// Returns a status no older than the staleness threshold, fetching from
    /// the device only when the snapshot has aged out.
    pub async fn refresh(&self) -> Result<DeviceStatus, BridgeError> {
        loop {
            let role = {
                let mut state = self.state.lock().await;

                if let Some(snapshot) = &state.snapshot {
                    let age = self.clock.now() - snapshot.fetched_at;
                    if age < time::Duration::milliseconds(self.staleness.as_millis() as i64) {
                        return Ok(snapshot.status.clone());
                    }
                }

                match &state.inflight {
                    Some(rx) => Role::Waiter(rx.clone()),
                    None => {
                        let (tx, rx) = watch::channel(None);
                        state.inflight = Some(rx);
                        Role::Leader(tx)
                    }
                }
            };

            match role {
                Role::Leader(tx) => {
                    let outcome = self.fetch().await;

                    let mut state = self.state.lock().await;
                    if let Ok(status) = &outcome {
                        state.snapshot = Some(StatusSnapshot {
                            status: status.clone(),
                            fetched_at: self.clock.now(),
                        });
                    }
                    state.inflight = None;
                    drop(state);

                    // Waiters may already be gone; an unobserved send is fine.
                    let _ = tx.send(Some(outcome.clone()));
                    return outcome;
                }
                Role::Waiter(mut rx) => {
                    loop {
                        if let Some(outcome) = rx.borrow_and_update().clone() {
                            return outcome;
                        }
                        if rx.changed().await.is_err() {
                            // The leader was dropped mid-fetch. Clear the dead
                            // marker and contend for leadership again.
                            let mut state = self.state.lock().await;
                            if let Some(inflight) = &state.inflight {
                                if inflight.same_channel(&rx) {
                                    state.inflight = None;
                                }
                            }
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Refresh that degrades to the cached snapshot on failure; the failure
    /// itself has already been logged by the fetch path.
    pub async fn refresh_soft(&self) {
        let _ = self.refresh().await;
    }

    /// Folds a command acknowledgement into the cache as authoritative fresh
    /// data, bypassing the staleness gate.
    pub async fn apply_ack(&self, status: DeviceStatus) {
        let mut state = self.state.lock().await;
        state.snapshot = Some(StatusSnapshot {
            status,
            fetched_at: self.clock.now(),
        });
    }

    async fn fetch(&self) -> FetchOutcome {
        let request = BridgeRequest::read_device(self.identity.clone(), self.clock.now());

        debug!("Polling status of device {}", self.identity);

        match self.bridge.send(request).await {
            Ok(response) => response.into_read_status(),
            Err(e) => {
                error!("Status poll for device {} failed: {}", self.identity, e);
                Err(e)
            }
        }
    }
}
