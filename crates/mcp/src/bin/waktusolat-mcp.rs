// Stdio MCP server binary

use anyhow::Result;
use std::sync::Arc;
use waktusolat_core::client::DEFAULT_BASE_URL;
use waktusolat_core::SolatClient;
use waktusolat_mcp::tools::default_registry;
use waktusolat_mcp::McpServer;

#[tokio::main]
async fn main() -> Result<()> {
    // Stdout is the transport; all logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let base_url =
        std::env::var("WAKTUSOLAT_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    tracing::info!("Waktu Solat MCP server starting (upstream: {})", base_url);

    let client = Arc::new(SolatClient::with_base_url(base_url)?);
    let registry = default_registry(client);
    tracing::info!("registered {} tools", registry.list_schemas().len());

    let server = McpServer::new(registry);
    server.run_stdio().await?;

    Ok(())
}
