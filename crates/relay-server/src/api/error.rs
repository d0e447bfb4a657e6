//! JSON error responses

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use rvoip_relay_core::RelayError;

/// Relay failure rendered as `{ "error", "kind", ... }`
#[derive(Debug)]
pub struct ApiError(pub RelayError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            RelayError::Validation { .. } | RelayError::InvalidOffer(_) => StatusCode::BAD_REQUEST,
            RelayError::Transport(e) if e.timed_out => StatusCode::GATEWAY_TIMEOUT,
            RelayError::Transport(_) => StatusCode::BAD_GATEWAY,
            RelayError::Application { .. } | RelayError::InvalidTransition { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn body(&self) -> Value {
        let mut body = json!({
            "error": self.0.to_string(),
            "kind": self.0.kind(),
        });
        if let RelayError::Application { status, response, .. } = &self.0 {
            body["status_code"] = json!(status);
            body["response"] = response.clone();
        }
        body
    }
}

impl From<RelayError> for ApiError {
    fn from(err: RelayError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(RelayError::validation(format!(
            "Invalid request body: {}",
            rejection.body_text()
        )))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}
