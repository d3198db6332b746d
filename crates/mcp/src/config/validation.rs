//! Configuration validation for the server.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::model::{ServerConfig, ServerType};

static ENDPOINT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/([A-Za-z0-9._~-]+(/[A-Za-z0-9._~-]+)*)?$").expect("endpoint regex should compile"));

/// Validate the server configuration.
pub fn validate_config(config: &ServerConfig) -> Result<(), ValidationError> {
    if config.host.trim().is_empty() {
        return Err(ValidationError::InvalidHost {
            host: config.host.clone(),
            reason: "host cannot be empty".to_string(),
        });
    }
    if config.server_type == ServerType::Http && config.port == 0 {
        return Err(ValidationError::InvalidPort { port: config.port });
    }
    if !ENDPOINT_PATTERN.is_match(&config.endpoint) {
        return Err(ValidationError::InvalidEndpoint {
            endpoint: config.endpoint.clone(),
        });
    }
    Url::parse(&config.url()).map_err(|error| ValidationError::InvalidHost {
        host: config.host.clone(),
        reason: error.to_string(),
    })?;
    debug!(server_type = %config.server_type, url = %config.url(), "validated server configuration");
    Ok(())
}

/// Validation errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid host '{host}': {reason}")]
    InvalidHost { host: String, reason: String },

    #[error("Invalid port {port}: the HTTP server needs a fixed port")]
    InvalidPort { port: u16 },

    #[error("Invalid endpoint '{endpoint}': must be an absolute path such as /mcp")]
    InvalidEndpoint { endpoint: String },

    #[error("Invalid server type '{value}': expected 'http' or 'stdio'")]
    InvalidServerType { value: String },
}
