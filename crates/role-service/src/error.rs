use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use role_core::PredictError;
use serde_json::json;
use thiserror::Error;

/// Errors returned by the HTTP handlers.
/// Implements `IntoResponse` so handlers can return `Result<T, ApiError>`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Prediction failed: {0}")]
    Prediction(#[from] PredictError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Validation(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
                msg.clone(),
            ),
            ApiError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                msg.clone(),
            ),
            ApiError::Prediction(e) => {
                tracing::error!("Prediction error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PREDICTION_ERROR",
                    "The prediction pipeline failed".to_string(),
                )
            }
            ApiError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
