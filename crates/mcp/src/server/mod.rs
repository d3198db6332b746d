mod core;
mod errors;
mod http;
mod stdio;

pub use core::CmdBridgeMcpCore;
pub use errors::{to_error_data, tool_result};
pub use http::{McpHttpServer, RunningMcpHttpServer};
pub use stdio::serve_stdio;
