//! shell_install tool implementation.
//!
//! Fetches and stores every app-shell resource into the current generation.

use kakei_client::{CacheLifecycleManager, InstallReport, Network};
use rmcp::{ErrorData as McpError, model::CallToolResult};

use crate::tools::json_result;

/// Implementation of the shell_install tool.
pub async fn install_impl<N: Network>(manager: &CacheLifecycleManager<N>) -> Result<CallToolResult, McpError> {
    let report: InstallReport = manager.install().await?;
    json_result(&report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::result_json;
    use crate::tools::shell::testing::{ORIGIN, manager};

    #[tokio::test]
    async fn test_install_reports_cached_urls() {
        let (manager, _network) = manager("v1").await;

        let json = result_json(&install_impl(&manager).await.unwrap());

        assert_eq!(json["generation"], "kakei-shell-v1");
        assert_eq!(json["cached"], serde_json::json!([format!("{ORIGIN}/"), format!("{ORIGIN}/static/style.css")]));
        assert_eq!(json["manifest_changed_without_bump"], false);
    }

    #[tokio::test]
    async fn test_install_offline_is_error() {
        let (manager, network) = manager("v1").await;
        network.set_offline(true);

        let err = install_impl(&manager).await.unwrap_err();
        assert_eq!(err.code.0, -32020);
    }

    #[tokio::test]
    async fn test_install_twice_is_invalid_state() {
        let (manager, _network) = manager("v1").await;
        install_impl(&manager).await.unwrap();

        let err = install_impl(&manager).await.unwrap_err();
        assert_eq!(err.code.0, -32021);
    }
}
