use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use super::AppState;

/// Health check endpoint
/// Returns 200 OK if the service is running
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "service": "tuition-calculator",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

/// Readiness check endpoint
/// Returns 503 while the loaded dataset has no entries at all
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let calculator = state.calculator();
    let sizes = calculator.dataset().section_sizes();

    let (status, label) = if calculator.dataset().is_empty() {
        (StatusCode::SERVICE_UNAVAILABLE, "not_ready")
    } else {
        (StatusCode::OK, "ready")
    };

    (status, Json(json!({
        "status": label,
        "service": "tuition-calculator",
        "sections": sizes,
    })))
}
