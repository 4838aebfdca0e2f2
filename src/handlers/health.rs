//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    dataset_rows: usize,
    model_loaded: bool,
    model: String,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
        dataset_rows: state.dashboard.patient_count(),
        // The server never starts without a model
        model_loaded: true,
        model: state.predictor.model_name(),
    })
}
