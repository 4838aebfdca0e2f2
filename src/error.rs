//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::inference::InferenceError;
use crate::upload::UploadError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Client errors
    BadRequest(String),
    InvalidInput(String),
    PayloadTooLarge(String),

    // Inference took longer than the configured bound
    Timeout,

    // Generic errors
    InternalError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Timeout => StatusCode::GATEWAY_TIMEOUT,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self {
            AppError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                msg.as_str()
            }
            AppError::InvalidInput(msg) => {
                tracing::warn!("Invalid input: {}", msg);
                msg.as_str()
            }
            AppError::PayloadTooLarge(msg) => {
                tracing::warn!("Upload too large: {}", msg);
                msg.as_str()
            }
            AppError::Timeout => {
                tracing::error!("Inference timed out");
                "Inference timed out"
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error"
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<InferenceError> for AppError {
    fn from(err: InferenceError) -> Self {
        match err {
            InferenceError::Decode(_) => AppError::InvalidInput(err.to_string()),
            other => AppError::InternalError(other.to_string()),
        }
    }
}

impl From<UploadError> for AppError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::EmptyFilename => AppError::BadRequest("Invalid filename".to_string()),
            other => AppError::InternalError(other.to_string()),
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        match err.status() {
            StatusCode::PAYLOAD_TOO_LARGE => {
                AppError::PayloadTooLarge(format!("Upload too large: {}", err.body_text()))
            }
            _ => AppError::BadRequest(format!("Malformed upload: {}", err.body_text())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::BadRequest("No file".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidInput("x".into()).status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(
            AppError::PayloadTooLarge("big".into()).status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(AppError::Timeout.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(
            AppError::InternalError("boom".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_decode_failure_is_client_error() {
        let err: AppError = InferenceError::Decode("not an image".into()).into();
        assert!(matches!(err, AppError::InvalidInput(_)));

        let err: AppError = InferenceError::OutputShape { expected: 4, actual: 3 }.into();
        assert!(matches!(err, AppError::InternalError(_)));
    }
}
