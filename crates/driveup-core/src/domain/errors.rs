//! Domain error types
//!
//! This module defines validation errors for domain values and the error
//! taxonomy of the update operation. Every [`UpdateError`] aborts the whole
//! update; none are retried at this layer.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when constructing domain values
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid remote resource ID
    #[error("Invalid resource ID: {0}")]
    InvalidResourceId(String),
}

/// Errors that abort an update operation
#[derive(Debug, Error)]
pub enum UpdateError {
    /// The request itself is malformed; nothing was opened or sent
    #[error("Invalid update request: {0}")]
    InvalidRequest(String),

    /// The content source could not be opened or stat'd
    #[error("Failed to open file: {reason:#}")]
    Open {
        /// Path that was being opened
        path: PathBuf,
        /// Underlying cause reported by the file source
        reason: anyhow::Error,
    },

    /// The current parents could not be fetched before reconciliation
    #[error("Failed to get file's parent: {0:#}")]
    Fetch(anyhow::Error),

    /// No read completed on the upload stream within the inactivity timeout
    #[error(
        "Failed to upload file: timeout{}, no data was transferred for {timeout:?}",
        stalled_after(.bytes_transferred)
    )]
    Timeout {
        /// The configured inactivity timeout
        timeout: Duration,
        /// Bytes read from the source before the stall
        bytes_transferred: u64,
    },

    /// Any other failure of the remote update call
    #[error("Failed to update file: {0:#}")]
    Remote(anyhow::Error),
}

impl UpdateError {
    /// Returns true if the failure was caused by the inactivity timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, UpdateError::Timeout { .. })
    }
}

fn stalled_after(bytes_transferred: &u64) -> String {
    if *bytes_transferred == 0 {
        String::new()
    } else {
        format!(" after {} bytes", bytes_transferred)
    }
}

impl From<DomainError> for UpdateError {
    fn from(err: DomainError) -> Self {
        UpdateError::InvalidRequest(err.to_string())
    }
}
