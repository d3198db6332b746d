//! Streamable HTTP host for the adapter.

use std::net::{IpAddr, SocketAddr};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use axum::Router;
use rmcp::transport::streamable_http_server::{StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::adapter::Adapter;
use crate::config::ServerConfig;
use crate::server::core::CmdBridgeMcpCore;

/// Host configuration for an HTTP server instance.
#[derive(Debug, Clone)]
pub struct McpHttpServer {
    bind_address: SocketAddr,
    endpoint: String,
    adapter: Arc<Adapter>,
}

impl McpHttpServer {
    pub fn new(bind_address: SocketAddr, endpoint: impl Into<String>, adapter: Arc<Adapter>) -> Self {
        Self {
            bind_address,
            endpoint: endpoint.into(),
            adapter,
        }
    }

    pub fn from_config(config: &ServerConfig, adapter: Arc<Adapter>) -> Result<Self> {
        let bind_address = config.bind_address().context("resolving bind address")?;
        Ok(Self::new(bind_address, config.endpoint.clone(), adapter))
    }

    /// Start serving and return a handle for inspection and shutdown.
    pub async fn start(self) -> Result<RunningMcpHttpServer> {
        if !is_loopback(self.bind_address.ip()) {
            warn!(address = %self.bind_address, "binding to a non-loopback address; tools will be reachable from the network");
        }

        let cancellation_token = CancellationToken::new();
        let session_manager = Arc::new(LocalSessionManager::default());
        let client_counter = Arc::new(AtomicUsize::new(0));
        let monitor_handle = spawn_session_monitor(
            Arc::clone(&session_manager),
            Arc::clone(&client_counter),
            cancellation_token.child_token(),
        );

        let adapter = Arc::clone(&self.adapter);
        let service: StreamableHttpService<CmdBridgeMcpCore, LocalSessionManager> = StreamableHttpService::new(
            move || Ok(CmdBridgeMcpCore::new(Arc::clone(&adapter))),
            Arc::clone(&session_manager),
            StreamableHttpServerConfig {
                stateful_mode: true,
                sse_keep_alive: Some(Duration::from_secs(15)),
                cancellation_token: cancellation_token.child_token(),
                ..Default::default()
            },
        );

        let router = if self.endpoint == "/" {
            Router::new().fallback_service(service)
        } else {
            Router::new().nest_service(&self.endpoint, service)
        };
        let listener = tokio::net::TcpListener::bind(self.bind_address)
            .await
            .with_context(|| format!("binding {}", self.bind_address))?;
        let bound_address = listener.local_addr()?;
        info!(address = %bound_address, endpoint = %self.endpoint, "MCP HTTP server listening");

        let server_handle = tokio::spawn({
            let shutdown = cancellation_token.child_token();
            async move {
                if let Err(error) = axum::serve(listener, router)
                    .with_graceful_shutdown(async move {
                        shutdown.cancelled().await;
                    })
                    .await
                {
                    warn!(%error, "MCP HTTP server stopped with an error");
                }
            }
        });

        Ok(RunningMcpHttpServer {
            bind_address: bound_address,
            endpoint: self.endpoint,
            cancellation_token,
            server_handle,
            monitor_handle,
            client_counter,
        })
    }
}

/// Runtime handle for a running HTTP server.
#[derive(Debug)]
pub struct RunningMcpHttpServer {
    bind_address: SocketAddr,
    endpoint: String,
    cancellation_token: CancellationToken,
    server_handle: JoinHandle<()>,
    monitor_handle: JoinHandle<()>,
    client_counter: Arc<AtomicUsize>,
}

impl RunningMcpHttpServer {
    pub fn bound_address(&self) -> SocketAddr {
        self.bind_address
    }

    pub fn url(&self) -> String {
        format!("http://{}{}", self.bind_address, self.endpoint)
    }

    /// Most recently observed session count.
    pub fn connected_clients(&self) -> usize {
        self.client_counter.load(Ordering::Relaxed)
    }

    /// Stop the server and wait for background tasks to finish.
    pub async fn stop(self) -> Result<()> {
        self.cancellation_token.cancel();
        self.monitor_handle
            .await
            .map_err(|error| anyhow!("MCP HTTP monitor task failed: {error}"))?;
        self.server_handle
            .await
            .map_err(|error| anyhow!("MCP HTTP server task failed: {error}"))?;
        info!("MCP HTTP server stopped");
        Ok(())
    }
}

fn is_loopback(address: IpAddr) -> bool {
    match address {
        IpAddr::V4(ip) => ip.is_loopback(),
        IpAddr::V6(ip) => ip.is_loopback(),
    }
}

fn spawn_session_monitor(
    session_manager: Arc<LocalSessionManager>,
    client_counter: Arc<AtomicUsize>,
    cancellation_token: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_millis(500));
        loop {
            tokio::select! {
                _ = cancellation_token.cancelled() => break,
                _ = ticker.tick() => {
                    let count = session_manager.sessions.read().await.len();
                    client_counter.store(count, Ordering::Relaxed);
                }
            }
        }
    })
}
