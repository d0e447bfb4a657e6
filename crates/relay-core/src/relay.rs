//! Call session relay
//!
//! [`CallRelay`] turns one inbound answer or reject request into exactly one
//! outbound action against the signaling platform and maps the platform's
//! reply to a caller-visible outcome.
//!
//! The relay is stateless across requests. Each request gets a fresh
//! [`CallSession`]; nothing is remembered once the request completes, so
//! requests for different calls need no coordination. Two requests for the
//! *same* call (an answer racing a reject, say) are forwarded as they come
//! and the platform decides which one wins.
//!
//! # Outcome Rules
//!
//! | Action | Succeeds when |
//! |--------|---------------|
//! | list   | status is 2xx |
//! | answer | status is 2xx and body `success` is `true` |
//! | reject | status is 2xx and body `success` is not `false` |
//!
//! Transport failures are reported as [`RelayError::Transport`], refusals as
//! [`RelayError::Application`]. Nothing is retried.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::error::{RelayError, RelayResult, TransportError};
use crate::gateway::{AnswerSubmission, GatewayResponse, SignalingGateway};
use crate::sdp::{answer_for_offer, OfferParser, PrefixScanParser};
use crate::session::{CallAction, CallId, CallSession, CallState, SessionPhase};

/// Inbound request to answer a call
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnswerCallRequest {
    /// Platform issued call id
    pub id: Option<String>,
    /// Raw SDP offer received with the call
    pub sdp: Option<String>,
}

/// Inbound request to reject a call
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RejectCallRequest {
    /// Platform issued call id
    pub id: Option<String>,
}

/// Result of a successful answer or reject
#[derive(Debug, Clone, PartialEq)]
pub struct CallOutcome {
    pub call_id: CallId,
    pub state: CallState,
    /// Body returned by the platform
    pub response: Value,
}

/// Relays answer and reject requests to a [`SignalingGateway`]
#[derive(Clone)]
pub struct CallRelay {
    gateway: Arc<dyn SignalingGateway>,
    parser: Arc<dyn OfferParser>,
}

impl CallRelay {
    /// Create a relay using the prefix scanning offer parser
    pub fn new(gateway: Arc<dyn SignalingGateway>) -> Self {
        Self::with_parser(gateway, Arc::new(PrefixScanParser::new()))
    }

    /// Create a relay with a custom offer parser
    pub fn with_parser(gateway: Arc<dyn SignalingGateway>, parser: Arc<dyn OfferParser>) -> Self {
        Self { gateway, parser }
    }

    /// Fetch the platform's incoming calls, returning its body verbatim
    pub async fn list_incoming_calls(&self) -> RelayResult<Value> {
        let response = self.gateway.list_incoming_calls().await.map_err(|e| {
            error!("Failed to fetch incoming calls: {}", e);
            RelayError::from(e)
        })?;

        if response.is_success_status() {
            return Ok(response.body);
        }

        error!("Incoming calls request returned status {}", response.status);
        Err(RelayError::application(
            "Failed to fetch data",
            response.status,
            response.body,
        ))
    }

    /// Answer a call with an answer synthesized from the request's offer
    ///
    /// # Errors
    ///
    /// * `RelayError::Validation` - `sdp` or `id` is missing; no remote call is made
    /// * `RelayError::InvalidOffer` - the offer cannot be answered; no remote call is made
    /// * `RelayError::Transport` - the platform could not be reached
    /// * `RelayError::Application` - the platform refused the answer
    pub async fn answer_call(&self, request: AnswerCallRequest) -> RelayResult<CallOutcome> {
        let Some(offer) = request.sdp.filter(|sdp| !sdp.is_empty()) else {
            error!("SDP is missing from the request data");
            return Err(RelayError::validation("SDP is required"));
        };
        let id = CallId::parse(request.id.unwrap_or_default())?;

        let mut session = CallSession::new(id, CallAction::Answer);
        session.transition(SessionPhase::Synthesizing)?;

        let answer = match answer_for_offer(self.parser.as_ref(), &offer) {
            Ok(answer) => answer,
            Err(e) => {
                warn!(call_id = %session.id(), "Cannot answer offer: {}", e);
                session.transition(SessionPhase::Failed)?;
                return Err(e.into());
            }
        };

        session.transition(SessionPhase::Submitting)?;
        let submission = AnswerSubmission::new(session.id().clone(), answer);
        let result = self.gateway.submit_answer(&submission).await;

        conclude(session, result, |response| response.success_flag() == Some(true))
    }

    /// Reject a call
    ///
    /// # Errors
    ///
    /// * `RelayError::Validation` - `id` is missing; no remote call is made
    /// * `RelayError::Transport` - the platform could not be reached
    /// * `RelayError::Application` - the platform refused the rejection
    pub async fn reject_call(&self, request: RejectCallRequest) -> RelayResult<CallOutcome> {
        let id = CallId::parse(request.id.unwrap_or_default())?;

        let mut session = CallSession::new(id, CallAction::Reject);
        session.transition(SessionPhase::Submitting)?;

        let result = self.gateway.submit_rejection(session.id()).await;

        conclude(session, result, |response| response.success_flag() != Some(false))
    }
}

fn conclude(
    mut session: CallSession,
    result: Result<GatewayResponse, TransportError>,
    accepted: impl Fn(&GatewayResponse) -> bool,
) -> RelayResult<CallOutcome> {
    let action = session.action();

    let response = match result {
        Ok(response) => response,
        Err(e) => {
            error!(call_id = %session.id(), ?action, "Request exception: {}", e);
            session.transition(SessionPhase::Failed)?;
            return Err(e.into());
        }
    };

    if response.is_success_status() && accepted(&response) {
        session.transition(SessionPhase::Succeeded)?;
        info!(call_id = %session.id(), ?action, "Call {:?} accepted by platform", action);
        return Ok(CallOutcome {
            call_id: session.id().clone(),
            state: session.call_state(),
            response: response.body,
        });
    }

    session.transition(SessionPhase::RejectedByRemote)?;
    let message = response.message();
    error!(
        call_id = %session.id(),
        ?action,
        status = response.status,
        "Platform refused call action: {}",
        message
    );
    Err(RelayError::application(message, response.status, response.body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockSignalingGateway;
    use serde_json::json;

    const OFFER: &str = "v=0\r\n\
        o=- 1 2 IN IP4 127.0.0.1\r\n\
        s=-\r\n\
        t=0 0\r\n\
        m=audio 9 UDP/TLS/RTP/SAVPF 111\r\n\
        a=ice-ufrag:abc123\r\n\
        a=ice-pwd:xyz789\r\n\
        a=fingerprint:sha-256 AA:BB:CC\r\n\
        a=msid:stream1 track1\r\n";

    fn relay(gateway: MockSignalingGateway) -> CallRelay {
        CallRelay::new(Arc::new(gateway))
    }

    fn answer_request(id: Option<&str>, sdp: Option<&str>) -> AnswerCallRequest {
        AnswerCallRequest {
            id: id.map(str::to_string),
            sdp: sdp.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_answer_without_sdp_makes_no_remote_call() {
        let mut gateway = MockSignalingGateway::new();
        gateway.expect_submit_answer().times(0);

        let err = relay(gateway)
            .answer_call(answer_request(Some("call-1"), None))
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::Validation { .. }));
        assert_eq!(err.to_string(), "SDP is required");

        let mut gateway = MockSignalingGateway::new();
        gateway.expect_submit_answer().times(0);
        let err = relay(gateway)
            .answer_call(answer_request(Some("call-1"), Some("")))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "validation");
    }

    #[tokio::test]
    async fn test_answer_without_id_makes_no_remote_call() {
        let mut gateway = MockSignalingGateway::new();
        gateway.expect_submit_answer().times(0);

        let err = relay(gateway)
            .answer_call(answer_request(None, Some(OFFER)))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Call ID is required");
    }

    #[tokio::test]
    async fn test_answer_with_unanswerable_offer_makes_no_remote_call() {
        let mut gateway = MockSignalingGateway::new();
        gateway.expect_submit_answer().times(0);

        let offer = OFFER.replace("a=fingerprint:sha-256 AA:BB:CC\r\n", "");
        let err = relay(gateway)
            .answer_call(answer_request(Some("call-1"), Some(&offer)))
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::InvalidOffer(_)));
    }

    #[tokio::test]
    async fn test_answer_success() {
        let mut gateway = MockSignalingGateway::new();
        gateway
            .expect_submit_answer()
            .withf(|submission| {
                submission.id.as_str() == "call-1"
                    && submission.session.sdp_type == "answer"
                    && submission.session.sdp.contains("a=ice-ufrag:abc123\r\n")
                    && submission.session.sdp.contains("WMS stream1\r\n")
            })
            .times(1)
            .returning(|_| Ok(GatewayResponse::new(200, json!({ "success": true, "call": "ok" }))));

        let outcome = relay(gateway)
            .answer_call(answer_request(Some("call-1"), Some(OFFER)))
            .await
            .unwrap();
        assert_eq!(outcome.state, CallState::Answered);
        assert_eq!(outcome.call_id.as_str(), "call-1");
        assert_eq!(outcome.response["call"], "ok");
    }

    #[tokio::test]
    async fn test_answer_needs_explicit_success_flag() {
        let mut gateway = MockSignalingGateway::new();
        gateway
            .expect_submit_answer()
            .returning(|_| Ok(GatewayResponse::new(200, json!({ "message": "no flag" }))));

        let err = relay(gateway)
            .answer_call(answer_request(Some("call-1"), Some(OFFER)))
            .await
            .unwrap_err();
        match err {
            RelayError::Application { message, status, .. } => {
                assert_eq!(message, "no flag");
                assert_eq!(status, 200);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_answer_timeout_is_transport_error() {
        let mut gateway = MockSignalingGateway::new();
        gateway
            .expect_submit_answer()
            .returning(|_| Err(TransportError::timeout("operation timed out")));

        let err = relay(gateway)
            .answer_call(answer_request(Some("call-1"), Some(OFFER)))
            .await
            .unwrap_err();
        match err {
            RelayError::Transport(e) => assert!(e.timed_out),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_reject_without_id_makes_no_remote_call() {
        let mut gateway = MockSignalingGateway::new();
        gateway.expect_submit_rejection().times(0);

        let err = relay(gateway)
            .reject_call(RejectCallRequest { id: None })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "validation");
    }

    #[tokio::test]
    async fn test_reject_success_without_flag() {
        let mut gateway = MockSignalingGateway::new();
        gateway
            .expect_submit_rejection()
            .withf(|id| id.as_str() == "call-42")
            .times(1)
            .returning(|_| Ok(GatewayResponse::new(200, json!({ "status": "rejected" }))));

        let outcome = relay(gateway)
            .reject_call(RejectCallRequest { id: Some("call-42".to_string()) })
            .await
            .unwrap();
        assert_eq!(outcome.state, CallState::Rejected);
    }

    #[tokio::test]
    async fn test_reject_refused_by_platform() {
        let mut gateway = MockSignalingGateway::new();
        gateway.expect_submit_rejection().returning(|_| {
            Ok(GatewayResponse::new(
                200,
                json!({ "success": false, "message": "already ended" }),
            ))
        });

        let err = relay(gateway)
            .reject_call(RejectCallRequest { id: Some("call-42".to_string()) })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "application");
        assert!(err.to_string().contains("already ended"));
    }

    #[tokio::test]
    async fn test_reject_error_status() {
        let mut gateway = MockSignalingGateway::new();
        gateway
            .expect_submit_rejection()
            .returning(|_| Ok(GatewayResponse::new(404, json!({ "message": "no such call" }))));

        let err = relay(gateway)
            .reject_call(RejectCallRequest { id: Some("call-404".to_string()) })
            .await
            .unwrap_err();
        match err {
            RelayError::Application { status, message, response } => {
                assert_eq!(status, 404);
                assert_eq!(message, "no such call");
                assert_eq!(response["message"], "no such call");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_list_incoming_calls() {
        let mut gateway = MockSignalingGateway::new();
        gateway
            .expect_list_incoming_calls()
            .returning(|| Ok(GatewayResponse::new(200, json!({ "calls": [{ "id": "call-1" }] }))));

        let body = relay(gateway).list_incoming_calls().await.unwrap();
        assert_eq!(body, json!({ "calls": [{ "id": "call-1" }] }));
    }

    #[tokio::test]
    async fn test_list_incoming_calls_upstream_error() {
        let mut gateway = MockSignalingGateway::new();
        gateway
            .expect_list_incoming_calls()
            .returning(|| Ok(GatewayResponse::new(503, json!("maintenance"))));

        let err = relay(gateway).list_incoming_calls().await.unwrap_err();
        match err {
            RelayError::Application { status, message, .. } => {
                assert_eq!(status, 503);
                assert_eq!(message, "Failed to fetch data");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_relay_calls_are_independent() {
        let mut gateway = MockSignalingGateway::new();
        gateway
            .expect_submit_rejection()
            .times(2)
            .returning(|id| Ok(GatewayResponse::new(200, json!({ "id": id.as_str() }))));
        let relay = relay(gateway);

        let first = tokio_test::block_on(relay.reject_call(RejectCallRequest { id: Some("a".into()) })).unwrap();
        let second = tokio_test::block_on(relay.reject_call(RejectCallRequest { id: Some("b".into()) })).unwrap();
        assert_eq!(first.response["id"], "a");
        assert_eq!(second.response["id"], "b");
    }
}
