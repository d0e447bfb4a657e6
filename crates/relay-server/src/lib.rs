//! # Relay-Server
//!
//! HTTP front end for the rvoip signaling relay.
//!
//! Browser clients list ringing calls, answer them with their SDP offer or
//! reject them. The server synthesizes the SDP answer with
//! `rvoip-relay-core` and forwards the action to the remote call-control
//! platform over HTTPS with a configured bearer token.

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod server;

pub use api::create_router;
pub use config::RelayConfig;
pub use error::{ConfigError, ServerError, ServerResult};
pub use gateway::HttpSignalingGateway;
pub use server::RelayServer;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
