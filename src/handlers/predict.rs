//! Prediction handlers

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::inference::EngineStatus;
use crate::models::PredictResponse;
use crate::{AppError, AppResult, AppState};

/// Multipart field carrying the scan
const FILE_FIELD: &str = "file";

/// Classify an uploaded MRI scan
pub async fn predict(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<PredictResponse>> {
    let mut upload = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        upload = Some((filename, bytes));
        break;
    }

    let (original_name, bytes) = upload.ok_or_else(|| AppError::BadRequest("No file".to_string()))?;
    if original_name.is_empty() {
        return Err(AppError::BadRequest("No selected file".to_string()));
    }

    let filename = state.uploads.save(&original_name, &bytes).await?;

    let predictor = state.predictor.clone();
    let job = tokio::task::spawn_blocking(move || predictor.predict(&bytes));

    let prediction = tokio::time::timeout(state.config.inference_timeout, job)
        .await
        .map_err(|_| AppError::Timeout)?
        .map_err(|e| AppError::InternalError(format!("inference task failed: {}", e)))??;

    tracing::info!(
        "Predicted {} for {} ({:.2}%, {} us)",
        prediction.predicted_class,
        filename,
        prediction.probability,
        prediction.inference_time_us
    );
    tracing::debug!("Class scores for {}: {:?}", filename, prediction.scores);

    Ok(Json(PredictResponse {
        filename,
        predicted_class: prediction.predicted_class,
        probability: prediction.probability,
    }))
}

/// Loaded model and inference counters
pub async fn model_status(State(state): State<AppState>) -> Json<EngineStatus> {
    Json(state.predictor.status())
}
