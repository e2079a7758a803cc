//! Error handling and HTTP error conversion
//!
//! Analysis errors from `repo_flow_core` are converted to HTTP responses at
//! the boundary. Provider messages are passed through verbatim so the caller
//! sees the same text the CLI would print.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Standard error response for all API errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Error details
    pub error: ErrorDetails,
}

/// Error details structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorDetails {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Additional context (optional, type varies by error)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Errors returned from handlers.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler() -> Result<Json<Response>, ApiError> {
///     let report = analyze_repository(client, &config, &reference).await?;
///     Ok(Json(report.into()))
/// }
/// ```
#[derive(Debug, Error)]
pub enum ApiError {
    /// The analysis itself failed.
    #[error(transparent)]
    Analysis(#[from] repo_flow_core::Error),

    /// The request body was well-formed JSON but a field was unusable.
    #[error("Invalid value for '{field}': {message}")]
    Validation { field: String, message: String },
}

impl ApiError {
    /// Create a validation error with field information
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = convert_error(&self);

        log_error(&self, status);

        (status, Json(error_response)).into_response()
    }
}

/// Map an error to its HTTP status code and response body.
fn convert_error(error: &ApiError) -> (StatusCode, ErrorResponse) {
    use repo_flow_core::Error;

    let (status, code, details) = match error {
        ApiError::Validation { field, .. } => (
            StatusCode::BAD_REQUEST,
            "ValidationError",
            Some(serde_json::json!({ "field": field })),
        ),
        ApiError::Analysis(inner) => match inner {
            Error::InvalidReference(_) => (StatusCode::BAD_REQUEST, "InvalidReference", None),
            Error::NotFound => (StatusCode::NOT_FOUND, "NotFound", None),
            Error::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "RateLimited", None),
            Error::EmptyResult(_) => (StatusCode::UNPROCESSABLE_ENTITY, "EmptyResult", None),
            Error::RequestBudgetExhausted(limit) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "RequestBudgetExhausted",
                Some(serde_json::json!({ "maxRequests": limit })),
            ),
            Error::ProviderError(_) => (StatusCode::BAD_GATEWAY, "ProviderError", None),
            Error::Client(_) => (StatusCode::BAD_GATEWAY, "ClientError", None),
        },
    };

    (
        status,
        ErrorResponse {
            error: ErrorDetails {
                code: code.to_string(),
                message: error.to_string(),
                details,
            },
        },
    )
}

/// Log error with appropriate level based on HTTP status
fn log_error(error: &ApiError, status: StatusCode) {
    match status {
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE => {
            tracing::error!(status = %status, "API error: {}", error);
        }
        StatusCode::TOO_MANY_REQUESTS => {
            tracing::warn!(status = %status, "API error: {}", error);
        }
        _ => {
            tracing::info!(status = %status, "API error: {}", error);
        }
    }
}
