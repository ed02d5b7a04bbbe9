//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::ui::state::AppState;

/// Body of `GET /api/health`
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Number of clients registered with the hub
    pub clients: usize,
}

/// Health check endpoint
///
/// Answers `503 Service Unavailable` when the hub loop is no longer running.
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthResponse>, StatusCode> {
    match state.hub.client_count().await {
        Ok(clients) => Ok(Json(HealthResponse {
            status: "ok",
            clients,
        })),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}
