use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use birthcare_core::error::AppError;
use serde_json::json;

use crate::services::get_metrics;
use crate::startup::AppState;

/// Liveness probe; verifies the database connection.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    state.db.health_check().await.map_err(|e| {
        tracing::error!(error = %e, "Database health check failed");
        e
    })?;

    Ok(Json(json!({
        "status": "healthy",
        "service": "birthcare-service",
        "version": env!("CARGO_PKG_VERSION"),
        "checks": {
            "postgres": "up"
        }
    })))
}

/// Readiness probe.
pub async fn readiness_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ready" })))
}

/// Prometheus metrics endpoint.
pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        get_metrics(),
    )
}
