//! HTTP client for the remote signaling platform
//!
//! [`HttpSignalingGateway`] implements [`SignalingGateway`] over reqwest.
//! It reports every reply it receives, whatever the status, and only fails
//! when the platform cannot be reached or the request times out.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde_json::Value;
use tracing::debug;

use rvoip_relay_core::{AnswerSubmission, CallId, GatewayResponse, SignalingGateway, TransportError};

use crate::config::GatewayConfig;
use crate::error::ConfigError;

/// reqwest-backed [`SignalingGateway`]
#[derive(Clone)]
pub struct HttpSignalingGateway {
    client: Client,
    incoming_calls_url: Url,
    answer_url: Url,
    reject_url: Url,
    bearer_token: String,
}

impl HttpSignalingGateway {
    /// Create a gateway from configuration
    ///
    /// Fails if the base URL or any endpoint path does not form a valid URL,
    /// or if the token is blank.
    pub fn new(config: &GatewayConfig) -> Result<Self, ConfigError> {
        if config.bearer_token.trim().is_empty() {
            return Err(ConfigError::MissingCredential);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ConfigError::invalid("gateway", e.to_string()))?;

        Ok(Self {
            client,
            incoming_calls_url: endpoint(&config.base_url, &config.incoming_calls_path)?,
            answer_url: endpoint(&config.base_url, &config.answer_path)?,
            reject_url: endpoint(&config.base_url, &config.reject_path)?,
            bearer_token: config.bearer_token.clone(),
        })
    }

    async fn send(&self, request: RequestBuilder) -> Result<GatewayResponse, TransportError> {
        let response = request
            .bearer_auth(&self.bearer_token)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status().as_u16();
        let text = response.text().await.map_err(transport_error)?;
        debug!("Response: {} {}", status, text);

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or(Value::String(text))
        };

        Ok(GatewayResponse::new(status, body))
    }
}

#[async_trait]
impl SignalingGateway for HttpSignalingGateway {
    async fn list_incoming_calls(&self) -> Result<GatewayResponse, TransportError> {
        debug!("Making request to {}", self.incoming_calls_url);
        self.send(self.client.get(self.incoming_calls_url.clone())).await
    }

    async fn submit_answer(&self, answer: &AnswerSubmission) -> Result<GatewayResponse, TransportError> {
        debug!(call_id = %answer.id, "Submitting answer to {}", self.answer_url);
        self.send(self.client.post(self.answer_url.clone()).json(answer)).await
    }

    async fn submit_rejection(&self, id: &CallId) -> Result<GatewayResponse, TransportError> {
        debug!(call_id = %id, "Submitting rejection to {}", self.reject_url);
        let request = self
            .client
            .post(self.reject_url.clone())
            .query(&[("id", id.as_str())]);
        self.send(request).await
    }
}

fn endpoint(base_url: &str, path: &str) -> Result<Url, ConfigError> {
    let joined = format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    Url::parse(&joined).map_err(|e| ConfigError::invalid("gateway.base_url", format!("{joined}: {e}")))
}

fn transport_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::timeout(e.to_string())
    } else {
        TransportError::connection(e.to_string())
    }
}
