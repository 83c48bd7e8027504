use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use shadesync_api::message::{AccessToken, BridgeRequest, BridgeResponse, RequestPayload};
use shadesync_api::models::{DeviceCommand, DeviceIdentity};
use shadesync_api::transport::{BridgeConnector, BridgeError};
use time::OffsetDateTime;
use tokio::sync::Mutex;
use tracing::debug;

use crate::motor::SimulatedMotor;

/// In-process stand-in for the physical bridge: a motor table behind the
/// `BridgeConnector` contract, with optional latency and fault injection.
pub struct SimulatedBridge {
    motors: Mutex<BTreeMap<DeviceIdentity, SimulatedMotor>>,
    token: AccessToken,
    offline: AtomicBool,
    latency: Option<Duration>,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

impl SimulatedBridge {
    pub fn new() -> Self {
        Self::with_latency(None)
    }

    pub fn with_latency(latency: impl Into<Option<Duration>>) -> Self {
        Self {
            motors: Mutex::new(BTreeMap::new()),
            token: AccessToken::new("simulated-session-token"),
            offline: AtomicBool::new(false),
            latency: latency.into(),
            reads: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    pub async fn add_motor(&self, identity: DeviceIdentity, motor: SimulatedMotor) {
        self.motors.lock().await.insert(identity, motor);
    }

    /// While offline every exchange fails like a transport timeout.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

impl Default for SimulatedBridge {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BridgeConnector for SimulatedBridge {
    async fn send(&self, request: BridgeRequest) -> Result<BridgeResponse, BridgeError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(BridgeError::Timeout);
        }

        let mut motors = self.motors.lock().await;
        let identity = request.identity().clone();
        let motor = motors
            .get_mut(&identity)
            .ok_or_else(|| BridgeError::Transport(format!("unknown device {identity}")))?;

        let now = OffsetDateTime::now_utc();
        match &request.payload {
            RequestPayload::ReadDevice { .. } => {
                self.reads.fetch_add(1, Ordering::SeqCst);
                motor.advance();

                let mut status = motor.status();
                // Radio conditions wobble between polls.
                status.rssi = status.rssi.map(|rssi| rssi + rand::rng().random_range(-4..=4));

                debug!("Read of device {} answered with {:?}", identity, status);
                Ok(BridgeResponse::read_ack(&request, status, now))
            }
            RequestPayload::WriteDevice { token, command, .. } => {
                self.writes.fetch_add(1, Ordering::SeqCst);
                if *token != self.token {
                    return Err(BridgeError::Unauthorized);
                }

                match command {
                    DeviceCommand::SetPosition { target } => motor.set_target(*target),
                }

                debug!("Write to device {} acknowledged", identity);
                Ok(BridgeResponse::write_ack(&request, motor.status(), now))
            }
        }
    }

    fn access_token(&self) -> Option<AccessToken> {
        Some(self.token.clone())
    }
}
