//! Model Context Protocol surface for cmdbridge.
//!
//! The [`adapter`] module turns catalog commands into tools, documentation
//! resources and resource templates. The [`server`] module hosts the adapter
//! over streamable HTTP or stdio, configured through [`config`].

pub mod adapter;
pub mod config;
pub mod server;

pub use adapter::{Adapter, AdapterError, InvocationRequest};
pub use config::{ServerConfig, ServerType, ValidationError};
pub use server::{CmdBridgeMcpCore, McpHttpServer, RunningMcpHttpServer, serve_stdio};
