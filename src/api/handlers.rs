//! HTTP handlers and shared state.

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::relay::Dispatcher;
use crate::session::SessionRegistry;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<SessionRegistry>,
    pub dispatcher: Dispatcher,
}

impl AppState {
    pub fn new() -> Self {
        let registry = Arc::new(SessionRegistry::new());
        let dispatcher = Dispatcher::new(Arc::clone(&registry));
        Self {
            registry,
            dispatcher,
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

/// Health check endpoint.
pub async fn health() -> &'static str {
    "OK"
}

/// API information endpoint.
pub async fn api_info(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "ssh-relay",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "sessions": state.registry.count(),
    }))
}
