use axum::{response::IntoResponse, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

/// GET /health - Liveness probe
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthStatus { status: "ok" })
}
