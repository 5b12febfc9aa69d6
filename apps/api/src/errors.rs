use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::openai::UpstreamError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    /// No API key resolvable from any configured credential provider.
    #[error("No OpenAI API key is configured")]
    MissingCredential,

    /// Uploaded bytes could not be decoded as UTF-8 text.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Uploaded PDF could not be opened or parsed.
    #[error("Document parse error: {0}")]
    DocumentParse(String),

    /// Embedding / generation provider failure, carried with provider detail.
    #[error("Upstream service error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::MissingCredential => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "MISSING_CREDENTIAL",
                "No OpenAI API key is configured. Set OPENAI_API_KEY or provide a secrets file."
                    .to_string(),
            ),
            AppError::Decode(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "DECODE_ERROR",
                format!("Uploaded file is not valid UTF-8 text: {msg}. Please re-upload."),
            ),
            AppError::DocumentParse(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "DOCUMENT_PARSE_ERROR",
                format!("Uploaded PDF could not be read: {msg}. Please re-upload."),
            ),
            AppError::Upstream(e) => {
                // Provider detail is logged, not returned to the end user.
                tracing::error!("Upstream service error: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "UPSTREAM_ERROR",
                    "The analysis service failed to respond. Please try again later.".to_string(),
                )
            }
            AppError::Internal(e) => {
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
