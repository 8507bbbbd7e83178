use std::sync::Arc;

use anyhow::Result;
use waktusolat_core::client::DEFAULT_BASE_URL;
use waktusolat_core::SolatClient;
use waktusolat_mcp::tools::default_registry;
use waktusolat_mcp::McpServer;

/// Runtime settings for the HTTP transport.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Public base URL used when rendering install links. Defaults to the
    /// bind address, which is only right for local use.
    pub public_url: Option<String>,
    /// Upstream API base override.
    pub base_url: Option<String>,
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn public_url(&self) -> String {
        match &self.public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://{}:{}", self.host, self.port),
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub mcp: Arc<McpServer>,
    pub public_url: String,
}

impl AppState {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let client = Arc::new(SolatClient::with_base_url(base_url)?);
        let mcp = Arc::new(McpServer::new(default_registry(client)));
        Ok(Self {
            mcp,
            public_url: config.public_url(),
        })
    }
}
