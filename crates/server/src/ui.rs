use std::sync::Arc;

use axum::{extract::State, response::Html};
use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::config::AppState;

const INDEX_TEMPLATE: &str = include_str!("index.html");

/// Render the install page with deep links for chat clients.
pub async fn serve_index(State(state): State<Arc<AppState>>) -> Html<String> {
    let mcp_url = format!("{}/mcp", state.public_url);
    Html(
        INDEX_TEMPLATE
            .replace("{{MCP_URL}}", &mcp_url)
            .replace("{{CURSOR_LINK}}", &cursor_install_link(&mcp_url))
            .replace("{{VSCODE_LINK}}", &vscode_install_link(&mcp_url))
            .replace("{{VERSION}}", env!("CARGO_PKG_VERSION")),
    )
}

/// Cursor installs from a deep link carrying base64-encoded server config.
fn cursor_install_link(mcp_url: &str) -> String {
    let config = serde_json::json!({ "url": mcp_url });
    format!(
        "cursor://anysphere.cursor-deeplink/mcp/install?name=waktusolat&config={}",
        STANDARD.encode(config.to_string())
    )
}

/// VS Code installs from a deep link carrying url-encoded JSON config.
fn vscode_install_link(mcp_url: &str) -> String {
    let config = serde_json::json!({
        "name": "waktusolat",
        "type": "http",
        "url": mcp_url
    });
    let encoded: String = url::form_urlencoded::byte_serialize(config.to_string().as_bytes())
        .collect();
    format!("vscode:mcp/install?{}", encoded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_link_embeds_base64_config() {
        let link = cursor_install_link("https://solat.example.com/mcp");
        let encoded = link.rsplit("config=").next().unwrap();
        let decoded = STANDARD.decode(encoded).unwrap();
        let config: serde_json::Value = serde_json::from_slice(&decoded).unwrap();
        assert_eq!(config["url"], "https://solat.example.com/mcp");
    }

    #[test]
    fn vscode_link_is_url_encoded() {
        let link = vscode_install_link("https://solat.example.com/mcp");
        assert!(link.starts_with("vscode:mcp/install?"));
        assert!(!link.contains('"'));
        assert!(link.contains("%22url%22"));
    }
}
