use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Message returned to the caller for every internal failure. Detail stays in the logs.
pub const INTERNAL_ERROR_MESSAGE: &str = "A server error occurred during analysis";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// LLM failures never reach this type: they degrade inside the analysis pipeline.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Io(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match &self {
            AppError::Validation(msg) => {
                tracing::info!("Rejected request: {msg}");
                msg.clone()
            }
            AppError::Io(e) => {
                tracing::error!("I/O error: {e}");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                INTERNAL_ERROR_MESSAGE.to_string()
            }
        };

        (self.status(), Json(json!({ "error": message }))).into_response()
    }
}
