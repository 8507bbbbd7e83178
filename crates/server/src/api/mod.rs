use crate::config::{AppState, ServerConfig};
use crate::ui;
use anyhow::Result;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};

/// Start the HTTP transport
pub async fn serve(config: ServerConfig) -> Result<()> {
    let state = AppState::new(&config)?;
    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("HTTP transport listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the router: MCP endpoint, install page, health probe
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(ui::serve_index))
        .route("/mcp", post(mcp_endpoint))
        .route("/api/health", get(health_check))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new())
                .on_response(DefaultOnResponse::new()),
        )
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// One JSON-RPC request per POST; notifications are accepted with no body.
async fn mcp_endpoint(State(state): State<Arc<AppState>>, body: String) -> Response {
    match state.mcp.handle_raw(&body).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "waktusolat",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
