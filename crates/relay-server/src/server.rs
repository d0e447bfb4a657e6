//! Relay server lifecycle
//!
//! Wires configuration into the HTTP gateway, the call relay and the router,
//! then serves until Ctrl-C.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::{info, warn};

use rvoip_relay_core::CallRelay;

use crate::api::create_router;
use crate::config::RelayConfig;
use crate::error::ServerResult;
use crate::gateway::HttpSignalingGateway;

/// A bound, not yet running relay server
pub struct RelayServer {
    listener: TcpListener,
    router: Router,
}

impl RelayServer {
    /// Build the relay from `config` and bind its listener
    pub async fn bind(config: &RelayConfig) -> ServerResult<Self> {
        let gateway = HttpSignalingGateway::new(&config.gateway)?;
        let relay = CallRelay::new(Arc::new(gateway));
        let router = create_router(relay, config.server.static_dir.clone());

        let listener = TcpListener::bind(&config.server.bind_address).await?;
        info!(
            "Relay listening on {} (signaling platform {})",
            listener.local_addr()?,
            config.gateway.base_url
        );

        Ok(Self { listener, router })
    }

    pub fn local_addr(&self) -> ServerResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve requests until Ctrl-C is received
    pub async fn run(self) -> ServerResult<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Serve requests until `shutdown` completes
    pub async fn run_until<F>(self, shutdown: F) -> ServerResult<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;
        info!("Relay stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
