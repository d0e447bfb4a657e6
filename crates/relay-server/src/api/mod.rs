//! REST API for the relay
//!
//! | Method | Path                      | Body            |
//! |--------|---------------------------|-----------------|
//! | GET    | `/api/get_incoming_call`  | none            |
//! | POST   | `/api/answer_call`        | `{ id, sdp }`   |
//! | POST   | `/api/reject_call`        | `{ id }`        |
//!
//! Failures are returned as `{ "error", "kind" }`, plus `status_code` and
//! `response` when the signaling platform replied.

pub mod error;
pub mod handlers;

use std::path::PathBuf;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use rvoip_relay_core::CallRelay;

pub use error::ApiError;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct ApiState {
    pub relay: CallRelay,
}

/// Create the REST API router
///
/// When `static_dir` is set, unmatched paths are served from it.
pub fn create_router(relay: CallRelay, static_dir: Option<PathBuf>) -> Router {
    let mut router = Router::new()
        .route("/api/get_incoming_call", get(handlers::get_incoming_call))
        .route("/api/answer_call", post(handlers::answer_call))
        .route("/api/reject_call", post(handlers::reject_call))
        .with_state(ApiState { relay });

    if let Some(dir) = static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
