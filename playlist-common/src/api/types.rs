//! Remote Interface message types
//!
//! Shared by `playlist-api` (server side) and `playlist-web` (client side).
//! Every field defaults when absent from the JSON body, so a create request
//! without an `id` member is valid.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ========================================
// Song Messages
// ========================================

/// Wire song
///
/// `id` is the external id of the stored song, or empty before creation.
///
/// # Examples
///
/// ```
/// use playlist_common::api::types::Song;
///
/// let song: Song = serde_json::from_str(r#"{"title": "Song1"}"#).unwrap();
/// assert_eq!(song.id, "");
/// assert_eq!(song.title, "Song1");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Song {
    pub id: String,
    pub title: String,
    pub artist: String,
    pub album: String,
    /// Free-form, e.g. "3:30"
    pub duration: String,
    /// External track reference used to embed playback
    pub link: String,
}

/// Response of the list operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SongList {
    pub list: Vec<Song>,
}

/// Request body of the list operation (carries nothing)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ListSongsRequest {}

/// Request body of the delete operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct SongIdRequest {
    /// External id of the song to delete
    pub value: String,
}

/// Response of the delete operation
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct DeleteSongResponse {
    pub value: bool,
}

// ========================================
// Error Response Types
// ========================================

/// Error body returned by every failing Remote Interface call
///
/// ```json
/// {"error": {"code": "NOT_FOUND", "message": "Song not found: ..."}}
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorDetail {
    /// One of [`crate::error::codes`]
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional error details (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn into_error(self) -> crate::Error {
        let seconds = self
            .error
            .details
            .as_ref()
            .and_then(|d| d.get("seconds"))
            .and_then(Value::as_u64);

        match crate::Error::from_code(&self.error.code, self.error.message) {
            crate::Error::Timeout { operation, .. } => crate::Error::Timeout {
                operation,
                seconds: seconds.unwrap_or(0),
            },
            err => err,
        }
    }
}

impl From<&crate::Error> for ErrorResponse {
    fn from(err: &crate::Error) -> Self {
        let mut response = ErrorResponse::new(err.code(), err.message());
        if let crate::Error::Timeout { seconds, .. } = err {
            response.error.details = Some(serde_json::json!({ "seconds": seconds }));
        }
        response
    }
}

// ========================================
// Tests
// ========================================
