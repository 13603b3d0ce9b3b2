//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the appropriate implementations.
use std::sync::Arc;

use crate::tools::shell::{
    activate::activate_impl,
    fetch::{ShellFetchParams, fetch_impl},
    install::install_impl,
    status::status_impl,
};
use crate::tools::table_filter::{TableFilterParams, filter_impl};

use kakei_client::{CacheLifecycleManager, HttpNetwork};
use kakei_core::AppConfig;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for kakei-shell.
#[derive(Clone)]
pub struct McpShellServer {
    tool_router: ToolRouter<Self>,
    config: Arc<AppConfig>,
    lifecycle: Arc<CacheLifecycleManager<HttpNetwork>>,
}

/// Tool router implementation using the #[tool_router] macro.
///
/// This macro generates the routing logic that maps tool names to handler methods.
#[tool_router]
impl McpShellServer {
    /// Create a new server handler.
    pub fn new(config: Arc<AppConfig>, lifecycle: Arc<CacheLifecycleManager<HttpNetwork>>) -> Self {
        Self { tool_router: Self::tool_router(), config, lifecycle }
    }

    /// Filter table rows by a fuzzy query.
    ///
    /// Matching ignores case and treats katakana and hiragana alike. Ledger
    /// tables also report the total of matched amounts.
    #[tool(
        description = "Filter table rows by a fuzzy, kana-insensitive query. Returns per-row visibility, scores and the matched total."
    )]
    async fn table_filter(&self, params: Parameters<TableFilterParams>) -> Result<CallToolResult, McpError> {
        filter_impl(&self.config, params.0)
    }

    /// Install the app shell into the current cache generation.
    #[tool(description = "Fetch and store every app-shell resource into the current cache generation.")]
    async fn shell_install(&self) -> Result<CallToolResult, McpError> {
        install_impl(self.lifecycle.as_ref()).await
    }

    /// Activate the installed generation.
    #[tool(description = "Activate the installed cache generation: delete stale generations and claim clients.")]
    async fn shell_activate(&self) -> Result<CallToolResult, McpError> {
        activate_impl(self.lifecycle.as_ref()).await
    }

    /// Serve one request through the offline layer.
    #[tool(
        description = "Fetch a URL through the offline layer. API, non-GET and cross-origin requests go to the network only; everything else is network-first with cache fallback."
    )]
    async fn shell_fetch(&self, params: Parameters<ShellFetchParams>) -> Result<CallToolResult, McpError> {
        fetch_impl(self.lifecycle.as_ref(), params.0).await
    }

    /// Report lifecycle state and stored generations.
    #[tool(description = "Report the worker lifecycle state and the stored cache generations.")]
    async fn shell_status(&self) -> Result<CallToolResult, McpError> {
        status_impl(self.lifecycle.as_ref()).await
    }
}

impl ServerHandler for McpShellServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "kakei-shell".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
