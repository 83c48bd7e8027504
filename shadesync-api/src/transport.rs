use async_trait::async_trait;

use crate::message::{AccessToken, BridgeRequest, BridgeResponse};

/// Failure of a bridge exchange. `Clone` so a single in-flight outcome can be
/// handed to every caller waiting on the same request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BridgeError {
    #[error("bridge request timed out")]
    Timeout,

    #[error("bridge transport error: {0}")]
    Transport(String),

    #[error("bridge rejected the access token")]
    Unauthorized,

    #[error("unexpected acknowledgement kind from bridge")]
    UnexpectedAck,

    #[error("bridge request cancelled before completion")]
    Cancelled,
}

/// Session layer exchanging authenticated request/response frames with the
/// physical bridge. Framing, reconnection and deadline enforcement live
/// behind this trait; a timeout is reported as a plain failure and callers
/// do not retry.
#[async_trait]
pub trait BridgeConnector: Send + Sync {
    /// Sends one request and waits for its correlated response.
    async fn send(&self, request: BridgeRequest) -> Result<BridgeResponse, BridgeError>;

    /// Current write-access token for this session, if one has been issued.
    fn access_token(&self) -> Option<AccessToken>;
}
