//! Per-request call session state
//!
//! A [`CallSession`] lives only for the duration of one answer or reject
//! exchange. The relay keeps no session table; the signaling platform owns
//! the real call lifecycle and this type only tracks how far the current
//! request got.
//!
//! ```text
//! answer:  Received ─► Synthesizing ─► Submitting ─┬─► Succeeded
//!                                                  ├─► RejectedByRemote
//!                                                  └─► Failed
//! reject:  Received ─────────────────► Submitting ─┬─► Succeeded
//!                                                  ├─► RejectedByRemote
//!                                                  └─► Failed
//! ```
//!
//! Any non-terminal phase may also move straight to `Failed` when local
//! validation or synthesis fails.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::{RelayError, RelayResult};

/// Identifier issued by the signaling platform for one call
///
/// The relay never generates these; it only forwards ids it was given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CallId(String);

impl CallId {
    /// Wrap a caller supplied id, rejecting blank values
    pub fn parse(id: impl Into<String>) -> RelayResult<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(RelayError::validation("Call ID is required"));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Action requested for a call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallAction {
    Answer,
    Reject,
}

/// Progress of one relay request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Request accepted for processing
    Received,
    /// Building the SDP answer (answer path only)
    Synthesizing,
    /// Waiting on the signaling platform
    Submitting,
    /// Platform accepted the action
    Succeeded,
    /// Platform was reached but refused the action
    RejectedByRemote,
    /// Local or transport failure
    Failed,
}

impl SessionPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::RejectedByRemote | Self::Failed)
    }
}

/// Caller-visible state of a call after a relay request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallState {
    Incoming,
    Answered,
    Rejected,
    Failed,
}

/// State of a single answer or reject exchange
#[derive(Debug, Clone)]
pub struct CallSession {
    id: CallId,
    action: CallAction,
    phase: SessionPhase,
}

impl CallSession {
    /// Start a session in the `Received` phase
    pub fn new(id: CallId, action: CallAction) -> Self {
        debug!(call_id = %id, ?action, "Call session received");
        Self {
            id,
            action,
            phase: SessionPhase::Received,
        }
    }

    pub fn id(&self) -> &CallId {
        &self.id
    }

    pub fn action(&self) -> CallAction {
        self.action
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Move to `next`, refusing transitions the action does not allow
    pub fn transition(&mut self, next: SessionPhase) -> RelayResult<()> {
        if !self.allows(next) {
            return Err(RelayError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        debug!(call_id = %self.id, from = ?self.phase, to = ?next, "Call session transition");
        self.phase = next;
        Ok(())
    }

    fn allows(&self, next: SessionPhase) -> bool {
        use SessionPhase::*;

        if self.phase.is_terminal() {
            return false;
        }
        if next == Failed {
            return true;
        }
        match (self.action, self.phase, next) {
            (CallAction::Answer, Received, Synthesizing) => true,
            (CallAction::Answer, Synthesizing, Submitting) => true,
            (CallAction::Reject, Received, Submitting) => true,
            (_, Submitting, Succeeded | RejectedByRemote) => true,
            _ => false,
        }
    }

    /// Caller-visible call state implied by the current phase
    pub fn call_state(&self) -> CallState {
        match (self.phase, self.action) {
            (SessionPhase::Succeeded, CallAction::Answer) => CallState::Answered,
            (SessionPhase::Succeeded, CallAction::Reject) => CallState::Rejected,
            (SessionPhase::RejectedByRemote | SessionPhase::Failed, _) => CallState::Failed,
            _ => CallState::Incoming,
        }
    }
}
