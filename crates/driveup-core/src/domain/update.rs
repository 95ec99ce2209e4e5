//! Update request and metadata patch types
//!
//! An [`UpdateRequest`] captures everything the caller wants to change on a
//! single remote resource. It is created per invocation and never shared.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Serialize;

use super::errors::UpdateError;
use super::newtypes::ResourceId;

/// Default upload chunk size: 8 MiB
pub const DEFAULT_CHUNK_SIZE: u64 = 8 * 1024 * 1024;

/// Default inactivity timeout for uploads: 5 minutes
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Metadata fields to change on the remote resource
///
/// Each field is sent only when it is `Some`. Absent fields leave the remote
/// value untouched. `Some("")` for the description is an explicit value that
/// clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataPatch {
    /// New display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// New description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New MIME type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
}

impl MetadataPatch {
    /// Returns true if no field would be sent
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.mime_type.is_none()
    }
}

/// A request to update one remote resource
#[derive(Debug, Clone)]
pub struct UpdateRequest {
    /// Resource to update
    pub id: ResourceId,
    /// New display name; for uploads defaults to the source's base name
    pub name: Option<String>,
    /// New description
    pub description: Option<String>,
    /// MIME type override; for uploads inferred from the name otherwise
    pub mime_type: Option<String>,
    /// Local content to upload; `None` means a metadata-only update
    pub path: Option<PathBuf>,
    /// Desired parent set; empty means parents are left alone
    pub parents: Vec<String>,
    /// Upload chunk size in bytes
    pub chunk_size: u64,
    /// Inactivity timeout for the upload stream; zero disables it
    pub timeout: Duration,
}

impl UpdateRequest {
    /// Creates a request that changes nothing yet, with default transfer settings
    pub fn new(id: ResourceId) -> Self {
        Self {
            id,
            name: None,
            description: None,
            mime_type: None,
            path: None,
            parents: Vec::new(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_parents<I, S>(mut self, parents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parents = parents.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Content path, if an upload was requested
    pub fn upload_path(&self) -> Option<&Path> {
        self.path.as_deref().filter(|p| !p.as_os_str().is_empty())
    }

    /// Returns true if the caller asked for a parent change
    pub fn wants_parent_change(&self) -> bool {
        !self.parents.is_empty()
    }

    /// Metadata patch built from the explicitly provided fields
    pub fn metadata(&self) -> MetadataPatch {
        MetadataPatch {
            name: self.name.clone(),
            description: self.description.clone(),
            mime_type: self.mime_type.clone(),
        }
    }

    /// Checks the request before any I/O happens
    ///
    /// # Errors
    /// Returns [`UpdateError::InvalidRequest`] describing the first problem found
    pub fn validate(&self) -> Result<(), UpdateError> {
        if self.name.as_deref() == Some("") {
            return Err(UpdateError::InvalidRequest(
                "name must not be empty when provided".to_string(),
            ));
        }
        if self.mime_type.as_deref() == Some("") {
            return Err(UpdateError::InvalidRequest(
                "MIME type must not be empty when provided".to_string(),
            ));
        }
        if self.parents.iter().any(|p| p.is_empty()) {
            return Err(UpdateError::InvalidRequest(
                "parent IDs must not be empty".to_string(),
            ));
        }
        if self.upload_path().is_some() && self.chunk_size == 0 {
            return Err(UpdateError::InvalidRequest(
                "chunk size must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
