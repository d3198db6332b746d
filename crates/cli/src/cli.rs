use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use cmdbridge_mcp::config::{DEFAULT_ENDPOINT, DEFAULT_HOST, DEFAULT_PORT};
use cmdbridge_mcp::{ServerConfig, ServerType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ServerTypeArg {
    Http,
    Stdio,
}

impl From<ServerTypeArg> for ServerType {
    fn from(value: ServerTypeArg) -> Self {
        match value {
            ServerTypeArg::Http => ServerType::Http,
            ServerTypeArg::Stdio => ServerType::Stdio,
        }
    }
}

/// Serve a command-line tool's commands as MCP tools and resources.
///
/// Every option can also be set through a `CMDBRIDGE_*` environment variable.
#[derive(Parser, Debug)]
#[command(name = "cmdbridge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Transport to serve on
    #[arg(long, value_enum, env = "CMDBRIDGE_SERVER_TYPE", default_value = "http")]
    pub server_type: ServerTypeArg,

    /// Host the HTTP server binds to
    #[arg(long, env = "CMDBRIDGE_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port the HTTP server binds to
    #[arg(long, env = "CMDBRIDGE_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Path the MCP endpoint is mounted at
    #[arg(long, env = "CMDBRIDGE_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// Enable debug logging
    #[arg(long, env = "CMDBRIDGE_DEBUG")]
    pub debug: bool,

    /// Catalog manifest (YAML or JSON). Defaults to CMDBRIDGE_CATALOG_PATH,
    /// then the per-user catalog, then the built-in catalog.
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,

    /// Print the tool names the catalog exposes and exit
    #[arg(long)]
    pub list_tools: bool,
}

impl Cli {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
            endpoint: self.endpoint.clone(),
            server_type: self.server_type.into(),
            debug: self.debug,
            catalog_path: self.catalog.clone(),
        }
    }
}
