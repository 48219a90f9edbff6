//! Error handling and HTTP error conversion
//!
//! This module defines how errors are translated to HTTP error responses. The
//! conversion happens at the HTTP boundary and never exposes upstream details of
//! GitHub failures to the caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use label_bot_core::LabelBotError;
use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Standard error response for all API errors.
///
/// All error responses follow this consistent structure to provide
/// machine-readable error codes and human-readable messages.
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
}

/// Errors returned by the webhook handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The delivery signature is missing or does not match.
    #[error("Webhook signature verification failed: {0}")]
    Unauthorized(String),

    /// The delivery could not be understood.
    #[error("Invalid webhook delivery: {0}")]
    BadRequest(String),

    /// The label bot failed to handle the event.
    #[error("Failed to handle event: {0}")]
    Bot(#[from] LabelBotError),
}

impl ApiError {
    /// HTTP status and error code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "AuthenticationError"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "ValidationError"),
            ApiError::Bot(_) => (StatusCode::INTERNAL_SERVER_ERROR, "InternalError"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Log error server-side
        log_error(&self, status);

        let message = match &self {
            ApiError::Bot(_) => "Failed to handle the event".to_string(),
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error: ErrorDetails {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

/// Log error with appropriate level based on HTTP status
fn log_error(error: &ApiError, status: StatusCode) {
    match status {
        StatusCode::INTERNAL_SERVER_ERROR => {
            tracing::error!("API error: {} - {}", status, error);
        }
        StatusCode::BAD_REQUEST => {
            tracing::warn!("API error: {} - {}", status, error);
        }
        _ => {
            tracing::info!("API error: {} - {}", status, error);
        }
    }
}
