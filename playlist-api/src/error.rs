//! HTTP mapping of the error taxonomy
//!
//! Every failing Remote Interface call answers with
//! `{"error": {"code", "message"}}` and a status derived from the error.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use playlist_common::api::ErrorResponse;
use playlist_common::error::codes;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Error from the access service or the record store
    #[error(transparent)]
    Service(#[from] playlist_common::Error),

    /// Request body is not a valid message (400)
    #[error("Invalid request body: {0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Service(err) => status_for(err),
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

/// Status code for a service error
///
/// Precondition failures get their own status; a malformed id is reported
/// as an internal failure.
pub fn status_for(err: &playlist_common::Error) -> StatusCode {
    match err.code() {
        codes::FAILED_PRECONDITION => StatusCode::PRECONDITION_FAILED,
        codes::NOT_FOUND => StatusCode::NOT_FOUND,
        codes::DEADLINE_EXCEEDED => StatusCode::GATEWAY_TIMEOUT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Service(err) => ErrorResponse::from(err),
            ApiError::BadRequest(msg) => ErrorResponse::new("BAD_REQUEST", msg.clone()),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
