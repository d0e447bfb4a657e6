use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use rvoip_relay_server::logging::{log_welcome, setup_logging, LoggingConfig};
use rvoip_relay_server::{RelayConfig, RelayServer, VERSION};

#[derive(Parser, Debug)]
#[command(name = "rvoip-relay")]
#[command(about = "Relay call answers and rejections to a remote signaling platform")]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "RVOIP_RELAY_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind the HTTP API to, overrides server.bind_address
    #[arg(short, long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Emit JSON formatted logs
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    /// Apply command line overrides on top of the loaded configuration
    fn apply(&self, config: &mut RelayConfig) {
        if let Some(bind) = &self.bind {
            config.server.bind_address = bind.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if self.json_logs {
            config.logging.json = true;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = RelayConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    args.apply(&mut config);

    setup_logging(&LoggingConfig::from_settings(&config.logging)?);
    log_welcome("rvoip-relay", VERSION);

    let server = RelayServer::bind(&config).await?;
    server.run().await?;

    Ok(())
}
