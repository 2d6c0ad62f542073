//! Serve command implementation.

use crate::config::Settings;
use crate::mcp::McpServer;
use anyhow::Result;

/// Run the MCP server on stdio.
pub async fn run_serve(settings: Settings) -> Result<()> {
    let server = McpServer::from_settings(&settings)?;
    server.run().await
}
