use crate::routes::{lead_routes, stream_routes};
use crate::state::AppState;
use crate::{Result, WebError};
use axum::Router;
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};

/// Bind configuration for the dashboard server.
#[derive(Debug, Clone)]
pub struct WebConfig {
    /// Host to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

/// Assemble the full API router over the shared state.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(lead_routes())
        .merge(stream_routes())
        .with_state(state)
}

/// Serve the dashboard API until the process exits.
pub async fn start_server(config: &WebConfig, state: AppState) -> Result<()> {
    // The dashboard UI is served separately; the API stays permissive.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router(state).layer(cors);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| WebError::Config(format!("Invalid bind address: {e}")))?;

    tracing::info!("Dashboard server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(WebError::Io)?;

    axum::serve(listener, app).await.map_err(WebError::Io)?;

    Ok(())
}
