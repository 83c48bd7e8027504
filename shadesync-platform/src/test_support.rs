use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use shadesync_api::message::{AccessToken, BridgeRequest, BridgeResponse, RequestPayload};
use shadesync_api::models::{
    DeviceIdentity, DevicePosition, DeviceStatus, DeviceType, MacAddr, Operation, VoltageMode,
};
use shadesync_api::transport::{BridgeConnector, BridgeError};
use time::OffsetDateTime;
use tokio::sync::Notify;

pub fn test_identity() -> DeviceIdentity {
    DeviceIdentity::new(DeviceType::RadioMotor433, MacAddr::new("f4:cf:a2:66:01:aa"))
}

/// Idle status at the given device-space position.
pub fn status_at(position: u8) -> DeviceStatus {
    moving_status(position, Operation::Stopped)
}

pub fn moving_status(position: u8, operation: Operation) -> DeviceStatus {
    DeviceStatus {
        current_position: DevicePosition::new(position),
        operation,
        battery_level: Some(900),
        voltage_mode: VoltageMode::DcMotor,
        rssi: Some(-48),
    }
}

/// Bridge double answering each request from a scripted queue of outcomes.
pub struct ScriptedBridge {
    script: Mutex<VecDeque<Result<DeviceStatus, BridgeError>>>,
    requests: AtomicUsize,
    writes: AtomicUsize,
}

impl ScriptedBridge {
    pub fn new(script: Vec<Result<DeviceStatus, BridgeError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    /// Total requests seen, reads and writes alike.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BridgeConnector for ScriptedBridge {
    async fn send(&self, request: BridgeRequest) -> Result<BridgeResponse, BridgeError> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        let outcome = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .expect("bridge script exhausted");
        let status = outcome?;

        let now = OffsetDateTime::UNIX_EPOCH;
        match &request.payload {
            RequestPayload::ReadDevice { .. } => {
                Ok(BridgeResponse::read_ack(&request, status, now))
            }
            RequestPayload::WriteDevice { .. } => {
                self.writes.fetch_add(1, Ordering::SeqCst);
                Ok(BridgeResponse::write_ack(&request, status, now))
            }
        }
    }

    fn access_token(&self) -> Option<AccessToken> {
        Some(AccessToken::new("scripted-token"))
    }
}

/// Bridge double that blocks each request until the test releases it, for
/// exercising in-flight deduplication.
pub struct GatedBridge {
    status: DeviceStatus,
    release: Notify,
    requests: AtomicUsize,
    failing: AtomicBool,
}

impl GatedBridge {
    pub fn new(status: DeviceStatus) -> Self {
        Self {
            status,
            release: Notify::new(),
            requests: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        }
    }

    pub fn release(&self) {
        self.release.notify_one();
    }

    /// Makes every released request come back as a timeout.
    pub fn fail_requests(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BridgeConnector for GatedBridge {
    async fn send(&self, request: BridgeRequest) -> Result<BridgeResponse, BridgeError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.release.notified().await;

        if self.failing.load(Ordering::SeqCst) {
            return Err(BridgeError::Timeout);
        }

        Ok(BridgeResponse::read_ack(
            &request,
            self.status.clone(),
            OffsetDateTime::UNIX_EPOCH,
        ))
    }

    fn access_token(&self) -> Option<AccessToken> {
        Some(AccessToken::new("gated-token"))
    }
}
