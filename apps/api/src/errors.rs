use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Only failures with no useful fallback reach this type. Everything the
/// model path can recover from is absorbed by the fallback synthesizer.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Rate limit exceeded, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: i64 },

    #[error("LLM authentication failed: {0}")]
    LlmAuth(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::RateLimited { retry_after_ms } => {
                let seconds = retry_after_ms.saturating_add(999) / 1000;
                (
                    StatusCode::TOO_MANY_REQUESTS,
                    "RATE_LIMITED",
                    format!("Too many analysis requests. Please wait {seconds}s and try again."),
                )
            }
            AppError::LlmAuth(msg) => {
                tracing::error!("LLM auth error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_AUTH_ERROR",
                    "The AI service rejected our credentials. Please contact the placement cell."
                        .to_string(),
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
