//! Alzheimer Insight - MRI classification and cohort analytics API
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     ALZHEIMER INSIGHT                        │
//! ├──────────────────────────────────────────────────────────────┤
//! │  POST /api/predict            GET /api/<view>                │
//! │        │                             │                       │
//! │  ┌─────▼──────┐               ┌──────▼───────┐               │
//! │  │ UploadStore│               │  Dashboard   │ (precomputed) │
//! │  └─────┬──────┘               └──────▲───────┘               │
//! │  ┌─────▼──────┐               ┌──────┴───────┐               │
//! │  │ Predictor  │──▶ ONNX       │ PatientTable │◀── CSV        │
//! │  └────────────┘               └──────────────┘               │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod analytics;
pub mod config;
pub mod error;
pub mod handlers;
pub mod inference;
pub mod models;
pub mod upload;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

pub use analytics::Dashboard;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use inference::Predictor;
pub use upload::UploadStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub dashboard: Arc<Dashboard>,
    pub predictor: Arc<Predictor>,
    pub uploads: UploadStore,
}

impl AppState {
    pub fn new(config: Config, dashboard: Dashboard, predictor: Predictor) -> Self {
        let uploads = UploadStore::new(config.upload_dir.clone());
        Self {
            config,
            dashboard: Arc::new(dashboard),
            predictor: Arc::new(predictor),
            uploads,
        }
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    let prediction_routes = Router::new()
        .route("/api/predict", post(handlers::predict::predict))
        .route("/api/model/status", get(handlers::predict::model_status))
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes));

    let dashboard_routes = Router::new()
        .route("/api/summary", get(handlers::analytics::summary))
        .route("/api/diagnosis_counts", get(handlers::analytics::diagnosis_counts))
        .route("/api/age_distribution", get(handlers::analytics::age_distribution))
        .route("/api/bmi_stats", get(handlers::analytics::bmi_stats))
        .route("/api/education_vs_diagnosis", get(handlers::analytics::education_vs_diagnosis))
        .route("/api/smoking_by_diag", get(handlers::analytics::smoking_by_diag))
        .route("/api/alcohol_stats", get(handlers::analytics::alcohol_stats))
        .route("/api/activity_by_diag", get(handlers::analytics::activity_by_diag))
        .route("/api/cognitive_stats", get(handlers::analytics::cognitive_stats))
        .route("/api/radar_data", get(handlers::analytics::radar_data))
        .route("/api/correlation_diagnosis", get(handlers::analytics::correlation_diagnosis));

    let uploads = ServeDir::new(state.uploads.dir());

    Router::new()
        .route("/health", get(handlers::health::check))
        .merge(prediction_routes)
        .merge(dashboard_routes)
        .nest_service("/static/uploads", uploads)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}
