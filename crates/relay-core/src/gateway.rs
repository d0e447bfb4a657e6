//! Signaling gateway abstraction
//!
//! The remote call-control platform is reached through [`SignalingGateway`].
//! Implementations only report whether the platform could be reached; the
//! relay decides whether a reply means the action succeeded.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::error::TransportError;
use crate::session::CallId;

/// Value of `sdp_type` for answers
pub const SDP_TYPE_ANSWER: &str = "answer";

/// Raw reply from the signaling platform
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayResponse {
    /// HTTP status code
    pub status: u16,
    /// Decoded JSON body; non-JSON bodies are kept as a JSON string
    pub body: Value,
}

impl GatewayResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// Whether the transport layer reported success
    pub fn is_success_status(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Application level `success` flag, if the body carries one
    pub fn success_flag(&self) -> Option<bool> {
        self.body.get("success").and_then(Value::as_bool)
    }

    /// Remote supplied `message`, or `"Unknown error"`
    pub fn message(&self) -> String {
        self.body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Unknown error")
            .to_string()
    }
}

/// Session description sent alongside an answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionDescription {
    pub sdp: String,
    pub sdp_type: &'static str,
}

/// Body of an answer submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerSubmission {
    pub id: CallId,
    pub session: SessionDescription,
}

impl AnswerSubmission {
    pub fn new(id: CallId, answer_sdp: String) -> Self {
        Self {
            id,
            session: SessionDescription {
                sdp: answer_sdp,
                sdp_type: SDP_TYPE_ANSWER,
            },
        }
    }
}

/// Client for the remote signaling platform
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SignalingGateway: Send + Sync {
    /// Fetch the calls currently ringing on the platform
    async fn list_incoming_calls(&self) -> Result<GatewayResponse, TransportError>;

    /// Submit an SDP answer for a call
    async fn submit_answer(&self, answer: &AnswerSubmission) -> Result<GatewayResponse, TransportError>;

    /// Reject a call
    async fn submit_rejection(&self, id: &CallId) -> Result<GatewayResponse, TransportError>;
}
