//! API error types and handling.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use opsanalyst::{AnalystError, ErrorKind};
use serde::Serialize;

/// API error: status plus a machine code and a message safe to display.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: "bad_request",
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: "internal",
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorResponse {
                error: self.error.to_string(),
                message: self.message,
            }),
        )
            .into_response()
    }
}

impl From<AnalystError> for ApiError {
    fn from(err: AnalystError) -> Self {
        tracing::warn!(error = %err, "Request failed");

        let (status, error) = match err.kind() {
            ErrorKind::Input => (StatusCode::BAD_REQUEST, "invalid_input"),
            ErrorKind::Configuration => (StatusCode::BAD_REQUEST, "configuration"),
            ErrorKind::RemoteService => (StatusCode::BAD_GATEWAY, "remote_service"),
            ErrorKind::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
        };

        Self {
            status,
            error,
            message: err.user_message(),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}): {}", self.error, self.status, self.message)
    }
}

impl std::error::Error for ApiError {}
