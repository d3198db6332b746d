//! Data model for the server configuration.

use std::fmt;
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};
use std::path::PathBuf;
use std::str::FromStr;

use cmdbridge_types::TransportMode;
use serde::{Deserialize, Serialize};

use crate::config::validation::{ValidationError, validate_config};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_ENDPOINT: &str = "/mcp";

/// Transport the server listens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerType {
    #[default]
    Http,
    Stdio,
}

impl ServerType {
    pub fn transport_mode(&self) -> TransportMode {
        match self {
            Self::Http => TransportMode::Http,
            Self::Stdio => TransportMode::Stdio,
        }
    }
}

impl fmt::Display for ServerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.transport_mode().as_str())
    }
}

impl FromStr for ServerType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<TransportMode>() {
            Ok(TransportMode::Http) => Ok(Self::Http),
            Ok(TransportMode::Stdio) => Ok(Self::Stdio),
            Err(_) => Err(ValidationError::InvalidServerType { value: s.to_string() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Path the streamable HTTP service is mounted at.
    pub endpoint: String,
    pub server_type: ServerType,
    pub debug: bool,
    /// Explicit catalog manifest; `None` selects the default lookup.
    pub catalog_path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            server_type: ServerType::Http,
            debug: false,
            catalog_path: None,
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_config(self)
    }

    /// Base URL clients connect to, e.g. `http://127.0.0.1:8080/mcp`.
    pub fn url(&self) -> String {
        let host = match self.host.parse::<IpAddr>() {
            Ok(IpAddr::V6(ip)) => format!("[{ip}]"),
            _ => self.host.clone(),
        };
        format!("http://{host}:{}{}", self.port, self.endpoint)
    }

    pub fn transport_mode(&self) -> TransportMode {
        self.server_type.transport_mode()
    }

    /// Resolve `host:port` to the first matching socket address.
    pub fn bind_address(&self) -> Result<SocketAddr, ValidationError> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|error| ValidationError::InvalidHost {
                host: self.host.clone(),
                reason: error.to_string(),
            })?
            .next()
            .ok_or_else(|| ValidationError::InvalidHost {
                host: self.host.clone(),
                reason: "no addresses resolved".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_url_matches_documented_endpoint() {
        assert_eq!(ServerConfig::default().url(), "http://127.0.0.1:8080/mcp");
    }

    #[test]
    fn ipv6_hosts_are_bracketed() {
        let config = ServerConfig {
            host: "::1".into(),
            ..ServerConfig::default()
        };
        assert_eq!(config.url(), "http://[::1]:8080/mcp");
    }

    #[test]
    fn server_type_selects_transport_mode() {
        assert_eq!("stdio".parse::<ServerType>().unwrap().transport_mode(), TransportMode::Stdio);
        assert!("sse".parse::<ServerType>().is_err());
    }

    #[test]
    fn loopback_bind_address_resolves() {
        let address = ServerConfig::default().bind_address().unwrap();
        assert!(address.ip().is_loopback());
        assert_eq!(address.port(), 8080);
    }
}
