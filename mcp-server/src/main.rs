//! Good First Issues MCP Server
//!
//! Exposes the issues API to AI agents over stdio:
//! - Searching issues by tag and text
//! - Listing the tag vocabulary
//! - Checking snapshot freshness

mod client;
mod server;

use anyhow::Result;
use rmcp::ServiceExt;
use server::GfiServer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging to stderr (stdout is used for MCP protocol)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting Good First Issues MCP server");

    let server = GfiServer::from_env()?;

    // Serve over stdio - pass as tuple (stdin, stdout)
    let transport = (tokio::io::stdin(), tokio::io::stdout());
    let service = server.serve(transport).await?;

    service.waiting().await?;

    Ok(())
}
