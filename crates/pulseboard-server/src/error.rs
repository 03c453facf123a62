use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use pulseboard_core::ConfigError;

/// Application-level errors that map directly to HTTP responses.
///
/// Every variant renders as `{"error": <code>, "message": <text>}` so the
/// dashboard can show the message verbatim.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("not implemented: {0}")]
    NotImplemented(String),

    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Configuration(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, message) = match &self {
            AppError::Configuration(e) => {
                tracing::error!(error = %e, "Analytics credentials are not configured");
                ("configuration_error", e.to_string())
            }
            AppError::BadRequest(msg) => ("validation_error", msg.clone()),
            AppError::NotImplemented(msg) => ("not_implemented", msg.clone()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e}");
                ("internal_error", "Internal server error".to_string())
            }
        };

        (
            self.status(),
            Json(json!({
                "error": code,
                "message": message,
            })),
        )
            .into_response()
    }
}
