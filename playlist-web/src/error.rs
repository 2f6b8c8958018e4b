//! Front-end failures
//!
//! Every failed Remote Interface call becomes a plain-text 500. Only the
//! list page shows the underlying cause.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WebError {
    #[error("Failed to create song")]
    Create(#[source] playlist_common::Error),

    #[error("Failed to update song")]
    Update(#[source] playlist_common::Error),

    #[error("Failed to delete song")]
    Delete(#[source] playlist_common::Error),

    #[error("Failed to fetch songs: {0}")]
    Fetch(#[source] playlist_common::Error),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
