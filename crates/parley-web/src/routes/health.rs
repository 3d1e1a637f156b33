use axum::{extract::State, Json};
use parley_backend::ThreadRegistry;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub backend: String,
    pub sessions: usize,
}

/// Health check endpoint
///
/// Reports whether the backend's thread registry answers; the server itself
/// stays healthy either way.
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let backend = match state.coordinator.backend().retrieve_all_threads().await {
        Ok(_) => "connected",
        Err(e) => {
            tracing::warn!("Backend health check failed: {}", e);
            "disconnected"
        }
    };

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: backend.to_string(),
        sessions: state.sessions.len().await,
    })
}
