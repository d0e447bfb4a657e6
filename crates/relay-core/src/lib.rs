//! # Relay-Core
//!
//! SDP negotiation and call-session logic for the rvoip signaling relay.
//!
//! The relay sits between a browser client and a remote call-control
//! platform. For every offered call it synthesizes a single-audio-track SDP
//! answer and forwards answer or reject actions to the platform.
//!
//! This crate provides:
//! - Offer attribute extraction behind the [`OfferParser`] trait
//! - Deterministic answer synthesis ([`synthesize_answer`])
//! - The per-request [`CallSession`] state machine
//! - The [`SignalingGateway`] seam for the remote platform
//! - [`CallRelay`], which ties them together
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   offer   ┌──────────────┐  answer  ┌───────────────────┐
//! │  CallRelay   │──────────►│ OfferParser  │─────────►│ synthesize_answer │
//! └──────┬───────┘           └──────────────┘          └───────────────────┘
//!        │ answer / reject
//! ┌──────▼───────────┐
//! │ SignalingGateway │  (HTTP client lives in relay-server)
//! └──────────────────┘
//! ```
//!
//! No I/O happens here; the HTTP surface and gateway client live in
//! `rvoip-relay-server`.

pub mod error;
pub mod gateway;
pub mod relay;
pub mod sdp;
pub mod session;

pub use error::{RelayError, RelayResult, SdpError, SdpResult, TransportError};
pub use gateway::{AnswerSubmission, GatewayResponse, SessionDescription, SignalingGateway};
pub use relay::{AnswerCallRequest, CallOutcome, CallRelay, RejectCallRequest};
pub use sdp::{synthesize_answer, OfferAttributes, OfferParser, PrefixScanParser};
pub use session::{CallAction, CallId, CallSession, CallState, SessionPhase};
