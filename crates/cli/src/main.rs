mod cli;

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use cmdbridge_mcp::{Adapter, McpHttpServer, ServerConfig, ServerType, serve_stdio};
use cmdbridge_registry::{load_catalog_manifest, resolve_catalog_source};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.server_config();
    init_tracing(config.debug);
    config.validate().context("invalid server configuration")?;

    let catalog_path = config.catalog_path.as_ref().map(|path| path.to_string_lossy().into_owned());
    let source = resolve_catalog_source(catalog_path.as_deref());
    let manifest = load_catalog_manifest(&source).with_context(|| format!("loading catalog from {source}"))?;
    let adapter = Arc::new(Adapter::from_manifest(&manifest, config.transport_mode())?);

    if cli.list_tools {
        for id in adapter.tool_names() {
            println!("{id}");
        }
        return Ok(());
    }

    info!(
        server_type = %config.server_type,
        tools = adapter.tool_names().len(),
        templates = manifest.resource_templates.len(),
        "starting cmdbridge"
    );
    match config.server_type {
        ServerType::Http => run_http(&config, adapter).await,
        ServerType::Stdio => run_stdio(adapter).await,
    }
}

// Logs go to stderr so stdout stays reserved for the stdio transport.
fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

async fn run_http(config: &ServerConfig, adapter: Arc<Adapter>) -> Result<()> {
    let running = McpHttpServer::from_config(config, adapter)?.start().await?;
    info!(url = %running.url(), "serving MCP over HTTP");
    tokio::signal::ctrl_c().await.context("waiting for ctrl-c")?;
    info!(clients = running.connected_clients(), "shutting down");
    running.stop().await
}

async fn run_stdio(adapter: Arc<Adapter>) -> Result<()> {
    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if let Err(error) = tokio::signal::ctrl_c().await {
            warn!(%error, "failed to listen for ctrl-c");
            return;
        }
        signal.cancel();
    });
    serve_stdio(adapter, shutdown).await
}
