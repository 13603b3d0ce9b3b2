//! shell_activate tool implementation.
//!
//! Deletes stale cache generations and claims open clients.

use kakei_client::{CacheLifecycleManager, Network};
use rmcp::{ErrorData as McpError, model::CallToolResult};

use crate::tools::json_result;

/// Implementation of the shell_activate tool.
pub async fn activate_impl<N: Network>(manager: &CacheLifecycleManager<N>) -> Result<CallToolResult, McpError> {
    let report = manager.activate().await?;
    json_result(&report)
}
