//! shell_status tool implementation.

use kakei_client::{CacheLifecycleManager, Network};
use rmcp::{ErrorData as McpError, model::CallToolResult};

use crate::tools::json_result;

/// Implementation of the shell_status tool.
pub async fn status_impl<N: Network>(manager: &CacheLifecycleManager<N>) -> Result<CallToolResult, McpError> {
    let status = manager.status().await?;
    json_result(&status)
}
