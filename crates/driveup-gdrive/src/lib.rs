//! driveup GDrive - Google Drive v3 REST adapter
//!
//! Provides an async client for:
//! - Reading a file's current parents
//! - Partial metadata updates with parent add/remove lists
//! - Content replacement through a resumable upload session
//!
//! ## Modules
//!
//! - [`client`] - Authenticated HTTP client and status mapping
//! - [`files`] - Files resource: parents lookup and metadata PATCH
//! - [`upload`] - Resumable upload session and chunk loop
//! - [`provider`] - `IRemoteFileService` implementation

pub mod client;
pub mod files;
pub mod provider;
pub mod upload;

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when communicating with the Drive API
#[derive(Debug, Error)]
pub enum DriveError {
    /// Authentication credentials are invalid or expired
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Insufficient permissions, or a quota was exceeded
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded
    #[error("Too many requests: {0}")]
    TooManyRequests(String),

    /// A server-side error occurred (5xx)
    #[error("Server error ({status}): {message}")]
    ServerError {
        /// HTTP status code
        status: u16,
        /// Error message from the response body
        message: String,
    },

    /// Any other unexpected HTTP status
    #[error("HTTP {status}: {message}")]
    Http {
        /// HTTP status code
        status: u16,
        /// Error message from the response body
        message: String,
    },

    /// A network-level error occurred
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The upload stream failed while being read
    #[error("Failed to read upload content: {0}")]
    Read(#[from] std::io::Error),

    /// The API response could not be parsed or was malformed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The operation was cancelled before it completed
    #[error("Request cancelled")]
    Cancelled,
}

/// Error envelope returned by Google APIs
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl DriveError {
    /// Maps an error status and its response body to a `DriveError`
    ///
    /// The message is taken from the standard `{"error": {"message": ...}}`
    /// envelope when present, otherwise the raw body is used.
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| body.trim().to_string());

        match status {
            StatusCode::UNAUTHORIZED => DriveError::Unauthorized(message),
            StatusCode::FORBIDDEN => DriveError::Forbidden(message),
            StatusCode::NOT_FOUND => DriveError::NotFound(message),
            StatusCode::TOO_MANY_REQUESTS => DriveError::TooManyRequests(message),
            s if s.is_server_error() => DriveError::ServerError {
                status: s.as_u16(),
                message,
            },
            s => DriveError::Http {
                status: s.as_u16(),
                message,
            },
        }
    }
}
