use std::sync::Arc;

use rmcp::model::{
    CallToolRequestParams, CallToolResult, ErrorData, Implementation, ListResourceTemplatesResult, ListResourcesResult,
    ListToolsResult, PaginatedRequestParams, ProtocolVersion, ReadResourceRequestParams, ReadResourceResult, ServerCapabilities,
    ServerInfo,
};
use rmcp::{RoleServer, ServerHandler, service::RequestContext};
use tracing::{debug, warn};

use crate::adapter::Adapter;
use crate::server::errors::{to_error_data, tool_result};

/// Protocol handler delegating every request to the shared [`Adapter`].
#[derive(Debug, Clone)]
pub struct CmdBridgeMcpCore {
    adapter: Arc<Adapter>,
}

impl CmdBridgeMcpCore {
    pub fn new(adapter: Arc<Adapter>) -> Self {
        Self { adapter }
    }

    pub fn adapter(&self) -> &Adapter {
        &self.adapter
    }
}

impl ServerHandler for CmdBridgeMcpCore {
    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, ErrorData>> + Send + '_ {
        let result = self
            .adapter
            .tools()
            .map(ListToolsResult::with_all_items)
            .map_err(|error| to_error_data(&error));
        std::future::ready(result)
    }

    fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, ErrorData>> + Send + '_ {
        async move {
            let name = request.name.to_string();
            debug!(tool = %name, "call_tool");
            let outcome = self.adapter.call_tool(&name, request.arguments, context.ct.clone()).await;
            if let Err(error) = &outcome {
                warn!(tool = %name, %error, "tool invocation failed");
            }
            tool_result(outcome)
        }
    }

    fn list_resources(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, ErrorData>> + Send + '_ {
        let result = self
            .adapter
            .doc_resources()
            .map(ListResourcesResult::with_all_items)
            .map_err(|error| to_error_data(&error));
        std::future::ready(result)
    }

    fn list_resource_templates(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourceTemplatesResult, ErrorData>> + Send + '_ {
        std::future::ready(Ok(ListResourceTemplatesResult::with_all_items(self.adapter.resource_templates())))
    }

    fn read_resource(
        &self,
        request: ReadResourceRequestParams,
        context: RequestContext<RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, ErrorData>> + Send + '_ {
        async move {
            debug!(uri = %request.uri, "read_resource");
            self.adapter
                .read_resource(&request.uri, context.ct.clone())
                .await
                .map_err(|error| {
                    warn!(uri = %request.uri, %error, "resource read failed");
                    to_error_data(&error)
                })
        }
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().enable_resources().build(),
            protocol_version: ProtocolVersion::LATEST,
            server_info: Implementation {
                name: "cmdbridge".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: Some("cmdbridge MCP".to_string()),
                ..Default::default()
            },
            instructions: Some(format!(
                "Each tool runs one command. Pass positional arguments in `args` (in order) and flags as named parameters. \
                 Read `{scheme}://<tool>-doc` for a tool's documentation; resource templates expose read-only views.",
                scheme = self.adapter.scheme()
            )),
        }
    }
}
