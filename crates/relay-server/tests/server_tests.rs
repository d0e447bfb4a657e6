//! End-to-end test of the bound relay server over TCP

use serde_json::{json, Value};
use tokio::sync::oneshot;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rvoip_relay_server::{ConfigError, RelayConfig, RelayServer, ServerError};

#[tokio::test]
async fn test_reject_over_tcp() {
    let platform = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat/rejectcall"))
        .and(query_param("id", "call-42"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&platform)
        .await;

    let config = RelayConfig::from_toml_str(&format!(
        "[server]\nbind_address = \"127.0.0.1:0\"\n\n[gateway]\nbase_url = \"{}\"\nbearer_token = \"tcp-token\"\n",
        platform.uri()
    ))
    .unwrap();

    let server = RelayServer::bind(&config).await.unwrap();
    let addr = server.local_addr().unwrap();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(server.run_until(async move {
        let _ = stop_rx.await;
    }));

    let response = reqwest::Client::new()
        .post(format!("http://{}/api/reject_call", addr))
        .json(&json!({ "id": "call-42" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Call rejected successfully");

    let _ = stop_tx.send(());
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_bind_fails_on_invalid_base_url() {
    let config = RelayConfig::from_toml_str(
        "[server]\nbind_address = \"127.0.0.1:0\"\n\n[gateway]\nbase_url = \"not a url\"\nbearer_token = \"t\"\n",
    )
    .unwrap();

    let err = RelayServer::bind(&config).await.err().unwrap();
    assert!(matches!(
        err,
        ServerError::Config(ConfigError::InvalidValue { field: "gateway.base_url", .. })
    ));
}
