//! Configuration for the relay server
//!
//! Settings are layered, later sources overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. An optional TOML file
//! 3. Environment variables prefixed with `RVOIP_RELAY__`, nested with `__`
//!    (for example `RVOIP_RELAY__GATEWAY__BEARER_TOKEN`)
//!
//! The gateway bearer token has no default and must come from the file or
//! the environment.

use std::fmt;
use std::path::{Path, PathBuf};

use ::config::{Config, ConfigBuilder, Environment, File, FileFormat};
use ::config::builder::DefaultState;
use serde::Deserialize;

use crate::error::ConfigError;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "RVOIP_RELAY";

/// Main configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    pub server: ServerConfig,
    pub gateway: GatewayConfig,
    pub logging: LogSettings,
}

/// Inbound HTTP listener settings
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the HTTP API binds to
    pub bind_address: String,
    /// Directory served for any path not matched by the API
    #[serde(default)]
    pub static_dir: Option<PathBuf>,
}

/// Remote signaling platform settings
#[derive(Clone, Deserialize)]
pub struct GatewayConfig {
    /// Scheme and host of the platform, e.g. `https://chat.bol7.com`
    pub base_url: String,
    pub incoming_calls_path: String,
    pub answer_path: String,
    pub reject_path: String,
    /// Bearer credential sent on every request
    #[serde(default)]
    pub bearer_token: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("incoming_calls_path", &self.incoming_calls_path)
            .field("answer_path", &self.answer_path)
            .field("reject_path", &self.reject_path)
            .field("bearer_token", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
pub struct LogSettings {
    /// Default level when `RUST_LOG` is unset
    pub level: String,
    /// Emit JSON lines instead of human readable output
    pub json: bool,
    /// Include file and line information
    pub file_info: bool,
}

impl RelayConfig {
    /// Load configuration from defaults, an optional file and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = defaults()?;
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

        let config: RelayConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from defaults overlaid with a TOML document
    ///
    /// The environment is not consulted.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let config: RelayConfig = defaults()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that deserialization alone cannot catch
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gateway.bearer_token.trim().is_empty() {
            return Err(ConfigError::MissingCredential);
        }
        if self.gateway.timeout_secs == 0 {
            return Err(ConfigError::invalid(
                "gateway.timeout_secs",
                "must be greater than zero",
            ));
        }
        if self.server.bind_address.trim().is_empty() {
            return Err(ConfigError::invalid("server.bind_address", "must not be empty"));
        }
        Ok(())
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Ok(Config::builder()
        .set_default("server.bind_address", "127.0.0.1:5000")?
        .set_default("gateway.base_url", "https://chat.bol7.com")?
        .set_default("gateway.incoming_calls_path", "/api/chat/incomingcalls")?
        .set_default("gateway.answer_path", "/api/chat/answercall")?
        .set_default("gateway.reject_path", "/api/chat/rejectcall")?
        .set_default("gateway.timeout_secs", 10)?
        .set_default("logging.level", "info")?
        .set_default("logging.json", false)?
        .set_default("logging.file_info", false)?)
}
