use core::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::models::{DeviceCommand, DeviceIdentity, DeviceStatus};
use crate::transport::BridgeError;

/// Session token authorizing write requests, issued by the bridge after the
/// device-list handshake.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Message metadata shared by requests and responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageHeader {
    /// Unique message identifier.
    pub id: Uuid,
    /// Message creation time.
    pub timestamp: OffsetDateTime,
}

impl MessageHeader {
    pub fn new(timestamp: OffsetDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp,
        }
    }
}

/// Request frame sent to the bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeRequest {
    /// Message metadata.
    pub header: MessageHeader,
    /// Message content.
    pub payload: RequestPayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RequestPayload {
    /// Poll a device for its current status.
    ReadDevice {
        /// Addressed device.
        identity: DeviceIdentity,
    },
    /// Execute a command on a device.
    WriteDevice {
        /// Addressed device.
        identity: DeviceIdentity,
        /// Session token authorizing the write.
        token: AccessToken,
        /// Command to execute.
        command: DeviceCommand,
    },
}

impl BridgeRequest {
    pub fn read_device(identity: DeviceIdentity, timestamp: OffsetDateTime) -> Self {
        Self {
            header: MessageHeader::new(timestamp),
            payload: RequestPayload::ReadDevice { identity },
        }
    }

    pub fn write_device(
        identity: DeviceIdentity,
        token: AccessToken,
        command: DeviceCommand,
        timestamp: OffsetDateTime,
    ) -> Self {
        Self {
            header: MessageHeader::new(timestamp),
            payload: RequestPayload::WriteDevice {
                identity,
                token,
                command,
            },
        }
    }

    /// Device this request is addressed to.
    pub fn identity(&self) -> &DeviceIdentity {
        match &self.payload {
            RequestPayload::ReadDevice { identity } => identity,
            RequestPayload::WriteDevice { identity, .. } => identity,
        }
    }
}

/// Response frame from the bridge, correlated to the request it answers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeResponse {
    /// Message metadata.
    pub header: MessageHeader,
    /// Identifier of the request this frame answers.
    pub in_reply_to: Uuid,
    /// Message content.
    pub payload: ResponsePayload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ResponsePayload {
    /// Status snapshot answering a read.
    ReadDeviceAck {
        /// Reported device state.
        status: DeviceStatus,
    },
    /// Post-command status answering a write.
    WriteDeviceAck {
        /// Reported device state after the command.
        status: DeviceStatus,
    },
}

impl BridgeResponse {
    pub fn read_ack(
        request: &BridgeRequest,
        status: DeviceStatus,
        timestamp: OffsetDateTime,
    ) -> Self {
        Self {
            header: MessageHeader::new(timestamp),
            in_reply_to: request.header.id,
            payload: ResponsePayload::ReadDeviceAck { status },
        }
    }

    pub fn write_ack(
        request: &BridgeRequest,
        status: DeviceStatus,
        timestamp: OffsetDateTime,
    ) -> Self {
        Self {
            header: MessageHeader::new(timestamp),
            in_reply_to: request.header.id,
            payload: ResponsePayload::WriteDeviceAck { status },
        }
    }

    /// Unwraps a read acknowledgement.
    pub fn into_read_status(self) -> Result<DeviceStatus, BridgeError> {
        match self.payload {
            ResponsePayload::ReadDeviceAck { status } => Ok(status),
            ResponsePayload::WriteDeviceAck { .. } => Err(BridgeError::UnexpectedAck),
        }
    }

    /// Unwraps a write acknowledgement.
    pub fn into_write_status(self) -> Result<DeviceStatus, BridgeError> {
        match self.payload {
            ResponsePayload::WriteDeviceAck { status } => Ok(status),
            ResponsePayload::ReadDeviceAck { .. } => Err(BridgeError::UnexpectedAck),
        }
    }
}
