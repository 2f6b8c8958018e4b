//! Common error types for the playlist services

use thiserror::Error;

/// Common result type for playlist operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wire codes carried in Remote Interface error bodies
pub mod codes {
    pub const FAILED_PRECONDITION: &str = "FAILED_PRECONDITION";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const INVALID_ID: &str = "INVALID_ID";
    pub const DEADLINE_EXCEEDED: &str = "DEADLINE_EXCEEDED";
    pub const STORE_ERROR: &str = "STORE_ERROR";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Error taxonomy shared by the record store, the access service and the
/// remote interface client
#[derive(Error, Debug)]
pub enum Error {
    /// Underlying persistence failure
    #[error("Store error: {0}")]
    Store(String),

    /// Operation targets an identifier that is not in the store
    #[error("Song not found: {0}")]
    NotFound(String),

    /// Identifier string is not a valid song id
    #[error("Invalid song id: {0}")]
    InvalidId(String),

    /// Required request field missing
    #[error("Failed precondition: {0}")]
    Precondition(String),

    /// Store operation exceeded its time bound
    #[error("{operation} timed out after {seconds}s")]
    Timeout { operation: String, seconds: u64 },

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Remote interface unreachable or returned an unreadable response
    #[error("Transport error: {0}")]
    Transport(String),

    /// Internal error reported by the remote side
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Wire code for this error
    pub fn code(&self) -> &'static str {
        match self {
            Error::Precondition(_) => codes::FAILED_PRECONDITION,
            Error::NotFound(_) => codes::NOT_FOUND,
            Error::InvalidId(_) => codes::INVALID_ID,
            Error::Timeout { .. } => codes::DEADLINE_EXCEEDED,
            Error::Store(_) => codes::STORE_ERROR,
            Error::Config(_) | Error::Transport(_) | Error::Internal(_) => codes::INTERNAL,
        }
    }

    /// Message carried on the wire, without the variant's display prefix
    pub fn message(&self) -> String {
        match self {
            Error::Store(m)
            | Error::NotFound(m)
            | Error::InvalidId(m)
            | Error::Precondition(m)
            | Error::Config(m)
            | Error::Transport(m)
            | Error::Internal(m) => m.clone(),
            Error::Timeout { operation, .. } => operation.clone(),
        }
    }

    /// Rebuild an error from a wire code and message.
    ///
    /// Unknown codes map to `Internal`. For a timeout the message is the
    /// operation name; the duration travels separately (see
    /// [`crate::api::ErrorResponse`]) and is 0 here.
    pub fn from_code(code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            codes::FAILED_PRECONDITION => Error::Precondition(message),
            codes::NOT_FOUND => Error::NotFound(message),
            codes::INVALID_ID => Error::InvalidId(message),
            codes::DEADLINE_EXCEEDED => Error::Timeout {
                operation: message,
                seconds: 0,
            },
            codes::STORE_ERROR => Error::Store(message),
            _ => Error::Internal(message),
        }
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        Error::Store(err.to_string())
    }
}
