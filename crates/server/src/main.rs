//! kakei-shell server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use kakei_client::{CacheLifecycleManager, HttpNetwork, NetworkConfig};
use kakei_core::{AppConfig, CacheDb};
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod error;
mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = Arc::new(AppConfig::load()?);
    tracing::info!(
        origin = %config.origin,
        generation = %config.generation_name(),
        db = %config.db_path.display(),
        "Starting kakei-shell server on stdio transport"
    );

    let db = CacheDb::open(&config.db_path).await?;
    let network = HttpNetwork::new(NetworkConfig::from(config.as_ref()))?;
    let lifecycle = Arc::new(CacheLifecycleManager::new(db, network, &config)?);

    let handler = handler::McpShellServer::new(config, lifecycle);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
