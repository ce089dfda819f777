//! Health check handler.

use axum::{Json, extract::State};
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: i64,
}

/// Reports service liveness.
///
/// # Endpoint
///
/// `GET /health`
///
/// A failing fast cache tier degrades the status but the service keeps
/// serving (the resolver falls through to the store).
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let status = if state.fast_cache.health_check().await {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status,
        timestamp: Utc::now().timestamp(),
    })
}
