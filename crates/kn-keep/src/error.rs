//! Keep client error types.

use kn_auth::AuthError;
use kn_core::errors::SourceError;
use thiserror::Error;

/// Errors that can occur when talking to the Keep API.
#[derive(Debug, Error)]
pub enum KeepError {
    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Keep returned a non-success status or an `error` object.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code, or the `error.code` of a 200 response.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// Failed to parse a Keep response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Session (re)acquisition failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// The OS random source failed while building a request.
    #[error("random source unavailable: {0}")]
    Random(String),

    /// An attachment is larger than the transfer limit.
    #[error("{locator} exceeds the {limit}-byte media limit ({size} bytes or more)")]
    TooLarge {
        /// Source locator of the attachment.
        locator: String,
        /// Declared or observed size.
        size: u64,
        /// Limit that was exceeded.
        limit: usize,
    },

    /// The media endpoint did not redirect to a download URL.
    #[error("no download location for {0}")]
    NoMediaLocation(String),
}

impl From<KeepError> for SourceError {
    fn from(err: KeepError) -> Self {
        match err {
            KeepError::Auth(auth) => Self::Auth(auth.to_string()),
            KeepError::Api { status: 401, message } => Self::Auth(message),
            KeepError::Parse(msg) => Self::Parse(msg),
            other => Self::Unavailable(other.to_string()),
        }
    }
}
