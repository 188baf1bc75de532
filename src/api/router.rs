//! API router configuration.

use axum::{
    routing::{any, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{api_info, health, AppState};
use super::websocket::ws_handler;

/// Create the router with a fresh state.
pub fn create_router() -> Router {
    create_router_with_state(AppState::new())
}

/// Create the router with custom state.
pub fn create_router_with_state(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/v1", get(api_info))
        .route("/webssh", any(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: String,
    /// Port to listen on.
    pub port: u16,
    /// Stop accepting and drain on ctrl-c instead of dying mid-write.
    pub graceful_shutdown: bool,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            graceful_shutdown: true,
        }
    }

    pub fn without_graceful_shutdown(mut self) -> Self {
        self.graceful_shutdown = false;
        self
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("127.0.0.1", 8080)
    }
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}

/// Start the relay server.
pub async fn serve(config: ServerConfig) -> crate::Result<()> {
    serve_with_state(config, AppState::new()).await
}

/// Start the relay server with custom state.
pub async fn serve_with_state(config: ServerConfig, state: AppState) -> crate::Result<()> {
    let addr = config.bind_address();
    let router = create_router_with_state(state);

    tracing::info!("starting ssh-relay server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(crate::error::SshRelayError::Io)?;

    let serve = axum::serve(listener, router);
    let result = if config.graceful_shutdown {
        serve.with_graceful_shutdown(shutdown_signal()).await
    } else {
        serve.await
    };

    result.map_err(|e| crate::error::SshRelayError::Io(std::io::Error::other(e.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert!(config.graceful_shutdown);
    }

    #[test]
    fn test_server_config_custom() {
        let config = ServerConfig::new("0.0.0.0", 9000).without_graceful_shutdown();
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
        assert!(!config.graceful_shutdown);
    }

    #[test]
    fn test_router_creation() {
        let _router = create_router();
    }
}
