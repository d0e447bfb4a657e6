//! Route handlers

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde_json::{json, Value};
use tracing::{debug, info};

use rvoip_relay_core::{AnswerCallRequest, RejectCallRequest};

use super::error::ApiError;
use super::ApiState;

/// `GET /api/get_incoming_call`
pub async fn get_incoming_call(State(state): State<ApiState>) -> Result<Json<Value>, ApiError> {
    let calls = state.relay.list_incoming_calls().await?;
    Ok(Json(calls))
}

/// `POST /api/answer_call` with `{ "id", "sdp" }`
pub async fn answer_call(
    State(state): State<ApiState>,
    payload: Result<Json<AnswerCallRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    debug!(call_id = ?request.id, "Incoming answer request");

    let outcome = state.relay.answer_call(request).await?;
    info!(call_id = %outcome.call_id, state = ?outcome.state, "Answer relayed");
    Ok(Json(json!({
        "message": "Call answered successfully",
        "response": outcome.response,
    })))
}

/// `POST /api/reject_call` with `{ "id" }`
pub async fn reject_call(
    State(state): State<ApiState>,
    payload: Result<Json<RejectCallRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = payload?;
    debug!(call_id = ?request.id, "Incoming reject request");

    let outcome = state.relay.reject_call(request).await?;
    info!(call_id = %outcome.call_id, state = ?outcome.state, "Rejection relayed");
    Ok(Json(json!({
        "message": "Call rejected successfully",
        "response": outcome.response,
    })))
}
