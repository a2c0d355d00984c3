//! Mapping of engine errors onto HTTP responses.
//!
//! Error bodies are plain text, e.g. `Processing failed: invalid request: ...`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use mediadesk_core::{MediaError, MediaErrorKind};
use tracing::warn;

/// An error returned from an API handler.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// Wraps an engine error, prefixing it with what was being attempted.
    pub fn from_media(prefix: &str, err: MediaError) -> Self {
        let status = match err.kind() {
            MediaErrorKind::Validation => StatusCode::BAD_REQUEST,
            MediaErrorKind::Io
            | MediaErrorKind::ToolUnavailable
            | MediaErrorKind::Parse
            | MediaErrorKind::ToolFailure => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: format!("{}: {}", prefix, err),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            warn!(status = %self.status, "{}", self.message);
        }
        (self.status, self.message).into_response()
    }
}
