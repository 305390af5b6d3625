use axum::{Json, Router, extract::State, routing::get};
use carebook_core::models::slot::SLOT_KEY_FORMAT;
use serde::Serialize;
use std::sync::Arc;

use crate::ApiState;

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    now: String,
}

#[derive(Serialize)]
struct VersionResponse {
    version: String,
}

/// Liveness probe. Reports the clinic-local time the booking rules run on.
async fn health_check(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        now: state.service.clock().now().format(SLOT_KEY_FORMAT).to_string(),
    })
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/version", get(version))
}