//! shell_fetch tool implementation.
//!
//! Serves one request through the offline layer: network-only for API,
//! non-GET and cross-origin requests, network-first with cache fallback for
//! everything else.

use kakei_client::{CacheLifecycleManager, FetchOutcome, Method, Network, ShellRequest};
use rmcp::{ErrorData as McpError, model::CallToolResult};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ToolError;
use crate::tools::json_result;

/// Input parameters for the shell_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ShellFetchParams {
    /// Path (resolved against the configured origin) or absolute URL.
    pub url: String,

    /// HTTP method (default: "GET").
    #[serde(default = "default_method")]
    pub method: String,
}

fn default_method() -> String {
    "GET".into()
}

/// Output structure for the shell_fetch tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ShellFetchOutput {
    /// Resolved request URL.
    pub url: String,
    /// "network", "network_only", "cache" or "unavailable".
    pub source: String,
    /// HTTP status, absent when unavailable.
    pub status: Option<u16>,
    pub content_type: Option<String>,
    /// Body decoded as UTF-8 (lossy).
    pub body: Option<String>,
    /// Body length in bytes.
    pub bytes: usize,
}

fn parse_method(raw: &str) -> Result<Method, ToolError> {
    let upper = raw.trim().to_ascii_uppercase();
    if upper.is_empty() {
        return Err(ToolError::InvalidInput("method cannot be empty".into()));
    }
    Method::from_bytes(upper.as_bytes()).map_err(|e| ToolError::InvalidInput(format!("invalid method {raw:?}: {e}")))
}

/// Implementation of the shell_fetch tool.
///
/// An unreachable network with nothing stored is reported as
/// `source: "unavailable"`, not as an error.
pub async fn fetch_impl<N: Network>(
    manager: &CacheLifecycleManager<N>, params: ShellFetchParams,
) -> Result<CallToolResult, McpError> {
    let method = parse_method(&params.method)?;
    let url = manager.resolve(&params.url)?;
    let request = ShellRequest::new(method, url);

    let outcome = manager.fetch(&request).await?;
    if outcome == FetchOutcome::Unavailable {
        tracing::info!(url = %request.url, "offline with no stored copy");
    }

    let response = outcome.response();
    let output = ShellFetchOutput {
        url: request.url.to_string(),
        source: outcome.source().to_string(),
        status: response.map(|r| r.status.as_u16()),
        content_type: response.and_then(|r| r.content_type.clone()),
        body: response.map(|r| String::from_utf8_lossy(&r.body).into_owned()),
        bytes: response.map_or(0, |r| r.body.len()),
    };

    json_result(&output)
}
