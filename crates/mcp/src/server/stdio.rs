use std::sync::Arc;

use anyhow::{Context, Result};
use rmcp::ServiceExt;
use rmcp::transport::stdio;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::adapter::Adapter;
use crate::server::core::CmdBridgeMcpCore;

/// Serve over stdin/stdout until the peer disconnects or `shutdown` fires.
pub async fn serve_stdio(adapter: Arc<Adapter>, shutdown: CancellationToken) -> Result<()> {
    let service = CmdBridgeMcpCore::new(adapter)
        .serve(stdio())
        .await
        .context("starting stdio transport")?;
    info!("MCP stdio server ready");

    let cancel = service.cancellation_token();
    tokio::select! {
        result = service.waiting() => {
            result.context("stdio transport terminated")?;
        }
        _ = shutdown.cancelled() => {
            cancel.cancel();
        }
    }
    info!("MCP stdio server stopped");
    Ok(())
}
