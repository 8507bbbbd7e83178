// JSON-RPC dispatch and the stdio transport loop

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::protocol::{
    CallToolParams, InitializeResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
    ListToolsResult,
};
use crate::tools::ToolRegistry;

/// MCP server over a tool registry.
///
/// Transport-agnostic: `handle_request` serves one request, `run_stdio`
/// drives newline-delimited JSON-RPC on stdin/stdout. The HTTP transport
/// feeds `handle_raw` directly.
pub struct McpServer {
    registry: ToolRegistry,
}

impl McpServer {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// Serve requests from stdin until EOF. Logs must go to stderr; stdout
    /// carries only responses.
    pub async fn run_stdio(&self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = tokio::io::stdout();
        let mut lines = stdin.lines();

        tracing::info!("MCP server listening on stdio");
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            if let Some(response) = self.handle_raw(&line).await {
                let body = serde_json::to_string(&response)?;
                stdout.write_all(body.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
        }
        tracing::info!("stdin closed, shutting down");
        Ok(())
    }

    /// Parse one raw JSON-RPC message and serve it. Returns `None` for
    /// notifications, which get no response.
    pub async fn handle_raw(&self, raw: &str) -> Option<JsonRpcResponse> {
        match serde_json::from_str::<JsonRpcRequest>(raw) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                tracing::warn!("unparseable request: {}", e);
                Some(JsonRpcResponse::error(
                    serde_json::Value::Null,
                    JsonRpcError::parse_error(),
                ))
            }
        }
    }

    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            tracing::debug!("notification: {}", request.method);
            return None;
        }
        let id = request.id.clone().unwrap_or(serde_json::Value::Null);

        let response = match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, InitializeResult::current()),
            "ping" => JsonRpcResponse::success(id, serde_json::json!({})),
            "tools/list" => JsonRpcResponse::success(
                id,
                ListToolsResult {
                    tools: self.registry.list_schemas(),
                },
            ),
            "tools/call" => self.call_tool(id, request.params).await,
            method => JsonRpcResponse::error(id, JsonRpcError::method_not_found(method)),
        };
        Some(response)
    }

    async fn call_tool(
        &self,
        id: serde_json::Value,
        params: Option<serde_json::Value>,
    ) -> JsonRpcResponse {
        let params: CallToolParams =
            match serde_json::from_value(params.unwrap_or(serde_json::Value::Null)) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        id,
                        JsonRpcError::invalid_params(format!("invalid tool call params: {}", e)),
                    )
                }
            };

        let Some(tool) = self.registry.get(&params.name) else {
            return JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_params(format!("unknown tool: {}", params.name)),
            );
        };

        // Clients may omit "arguments" entirely; treat that as an empty object.
        let arguments = if params.arguments.is_null() {
            serde_json::json!({})
        } else {
            params.arguments
        };

        tracing::info!(tool = %params.name, "tool call");
        match tool.execute(arguments).await {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_params(format!("{:#}", e)),
            ),
        }
    }
}
