//! Error types for the call relay
//!
//! Failures are split into four kinds so the HTTP layer can report them
//! distinctly:
//!
//! - **Validation**: a required request field is missing, no remote call is made
//! - **Invalid offer**: the offer could not be parsed or lacks an attribute the
//!   answer cannot be built without
//! - **Transport**: the signaling platform could not be reached
//! - **Application**: the platform was reached but refused the action

use serde_json::Value;
use thiserror::Error;

use crate::session::SessionPhase;

/// Result type for SDP parsing and synthesis
pub type SdpResult<T> = Result<T, SdpError>;

/// Result type for relay operations
pub type RelayResult<T> = Result<T, RelayError>;

/// Errors raised while reading an offer or writing an answer
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SdpError {
    /// The offer text was empty or only whitespace
    #[error("SDP offer is empty")]
    EmptyOffer,

    /// The offer text does not start with a version line
    #[error("SDP offer is not a session description: {reason}")]
    NotSdp { reason: String },

    /// An attribute needed to build the answer was absent from the offer
    #[error("SDP offer is missing required attribute a={attribute}")]
    MissingAttribute { attribute: &'static str },
}

/// Failure to reach the remote signaling platform
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Request exception: {message}")]
pub struct TransportError {
    /// Human readable cause from the underlying client
    pub message: String,
    /// Whether the request was abandoned because it ran out of time
    pub timed_out: bool,
}

impl TransportError {
    /// Create a transport error for a connection-level failure
    pub fn connection(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: false,
        }
    }

    /// Create a transport error for a request that timed out
    pub fn timeout(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            timed_out: true,
        }
    }
}

/// Errors surfaced to callers of the relay
#[derive(Debug, Error)]
pub enum RelayError {
    /// A required request field was missing or empty
    #[error("{message}")]
    Validation { message: String },

    /// The offer could not be turned into an answer
    #[error("Invalid SDP offer: {0}")]
    InvalidOffer(#[from] SdpError),

    /// The signaling platform could not be reached
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The signaling platform answered but did not accept the action
    #[error("{message}")]
    Application {
        message: String,
        status: u16,
        response: Value,
    },

    /// A call session was driven through a transition it does not allow
    #[error("Invalid call session transition from {from:?} to {to:?}")]
    InvalidTransition { from: SessionPhase, to: SessionPhase },
}

impl RelayError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an application error from an upstream reply
    pub fn application(message: impl Into<String>, status: u16, response: Value) -> Self {
        Self::Application {
            message: message.into(),
            status,
            response,
        }
    }

    /// Short machine readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "validation",
            Self::InvalidOffer(_) => "invalid_offer",
            Self::Transport(_) => "transport",
            Self::Application { .. } => "application",
            Self::InvalidTransition { .. } => "internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(RelayError::validation("SDP is required").kind(), "validation");
        assert_eq!(RelayError::from(SdpError::EmptyOffer).kind(), "invalid_offer");
        assert_eq!(RelayError::from(TransportError::timeout("slow")).kind(), "transport");
        assert_eq!(
            RelayError::application("already ended", 200, Value::Null).kind(),
            "application"
        );
    }

    #[test]
    fn test_messages() {
        let err = RelayError::application("already ended", 200, Value::Null);
        assert_eq!(err.to_string(), "already ended");

        let err = RelayError::from(TransportError::connection("connection refused"));
        assert_eq!(err.to_string(), "Request exception: connection refused");

        let err = RelayError::from(SdpError::MissingAttribute { attribute: "fingerprint" });
        assert!(err.to_string().contains("a=fingerprint"));
    }
}
