//! Error types for the relay server

use thiserror::Error;

/// Result type for server setup
pub type ServerResult<T> = Result<T, ServerError>;

/// Configuration problems found at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Layered configuration could not be loaded or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    /// No bearer token was supplied for the signaling platform
    #[error("Missing credential: set gateway.bearer_token or RVOIP_RELAY__GATEWAY__BEARER_TOKEN")]
    MissingCredential,

    /// A setting was present but unusable
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: &'static str, message: String },
}

impl ConfigError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            message: message.into(),
        }
    }
}

/// Errors raised while starting or running the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
