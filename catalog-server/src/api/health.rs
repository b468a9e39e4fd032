//! Health check endpoint

use axum::Json;
use axum::extract::State;
use serde::Serialize;
use shared::error::ApiResponse;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    environment: String,
    version: &'static str,
}

pub async fn health_check(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    Json(ApiResponse::success(HealthResponse {
        status: "ok",
        service: "catalog-server",
        environment: state.config.environment.clone(),
        version: env!("CARGO_PKG_VERSION"),
    }))
}
