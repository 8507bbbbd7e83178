use anyhow::Result;
use clap::Parser;

mod api;
mod config;
mod ui;

use config::ServerConfig;

#[derive(Parser, Debug)]
#[command(name = "waktusolat-server")]
#[command(about = "HTTP transport for the Waktu Solat MCP server", long_about = None)]
struct Args {
    /// Host to bind to
    #[arg(long, env = "WAKTUSOLAT_HOST", default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "WAKTUSOLAT_PORT", default_value = "8080")]
    port: u16,

    /// Public base URL for install links (e.g. https://solat.example.com)
    #[arg(long, env = "WAKTUSOLAT_PUBLIC_URL")]
    public_url: Option<String>,

    /// Upstream API base URL override
    #[arg(long, env = "WAKTUSOLAT_BASE_URL")]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "waktusolat=info,tower_http=debug".into()),
        )
        .with_target(false)
        .init();

    let args = Args::parse();

    let config = ServerConfig {
        host: args.host,
        port: args.port,
        public_url: args.public_url,
        base_url: args.base_url,
    };

    tracing::info!("Starting Waktu Solat MCP HTTP server");
    tracing::info!("Public URL: {}", config.public_url());

    api::serve(config).await?;

    Ok(())
}
