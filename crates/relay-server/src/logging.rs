use std::str::FromStr;

use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::LogSettings;
use crate::error::ConfigError;

/// Configuration for the logging system
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// The log level to use when `RUST_LOG` is unset
    pub level: Level,
    /// Whether to enable JSON formatting
    pub json: bool,
    /// Whether to include file and line information
    pub file_info: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: Level::INFO,
            json: false,
            file_info: false,
        }
    }
}

impl LoggingConfig {
    /// Build from the `[logging]` configuration section
    pub fn from_settings(settings: &LogSettings) -> Result<Self, ConfigError> {
        Ok(LoggingConfig {
            level: parse_log_level(&settings.level)?,
            json: settings.json,
            file_info: settings.file_info,
        })
    }
}

/// Set up the global subscriber
///
/// `RUST_LOG` takes precedence over the configured level. Calling this more
/// than once is harmless; later calls leave the first subscriber in place.
pub fn setup_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str().to_lowercase()));

    let builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_file(config.file_info)
        .with_line_number(config.file_info);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    if result.is_err() {
        tracing::debug!("Global subscriber already installed");
    }
}

/// Parse a log level from a string
pub fn parse_log_level(level: &str) -> Result<Level, ConfigError> {
    Level::from_str(level)
        .map_err(|_| ConfigError::invalid("logging.level", format!("Invalid log level: {}", level)))
}

/// Log a welcome message with version info
pub fn log_welcome(app_name: &str, version: &str) {
    tracing::info!("Starting {} v{}", app_name, version);
}
