//! Remote file service port (driven/secondary port)
//!
//! This module defines the interface the update use case calls to read the
//! current parents of a resource and to issue the single combined update.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because transport errors are adapter-specific;
//!   the use case only needs to tell them apart from its own timeout.
//! - `update` receives the cancellation token of the upload stream and must
//!   stop promptly once it is cancelled.
//! - One `update` call carries metadata, optional content and an optional
//!   parent delta together.

use std::fmt;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::domain::newtypes::ResourceId;
use crate::domain::parents::ParentDelta;
use crate::domain::update::MetadataPatch;
use crate::transfer::ByteStream;

// ============================================================================
// Call payload
// ============================================================================

/// Content attached to an update call
pub struct MediaUpload {
    /// Composed upload stream
    pub stream: ByteStream,
    /// Requested chunk size in bytes; the adapter may round it
    pub chunk_size: u64,
    /// Expected content length in bytes (0 if unknown)
    pub size: u64,
}

impl fmt::Debug for MediaUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MediaUpload")
            .field("chunk_size", &self.chunk_size)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// The single combined update sent to the remote service
#[derive(Debug)]
pub struct UpdateCall {
    /// Resource to update
    pub id: ResourceId,
    /// Fields to change; absent fields are left untouched
    pub metadata: MetadataPatch,
    /// Content to upload, if any
    pub media: Option<MediaUpload>,
    /// Parent mutation; never attached when empty
    pub parents: Option<ParentDelta>,
}

// ============================================================================
// Result
// ============================================================================

/// The resource as reported by the remote service after an update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFile {
    /// Resource ID
    pub id: String,
    /// Display name, if returned
    pub name: Option<String>,
    /// Parent IDs
    pub parents: Vec<String>,
    /// Content size in bytes (0 for folders and native documents)
    pub size: u64,
}

// ============================================================================
// IRemoteFileService trait
// ============================================================================

/// Remote storage operations needed by the update use case
#[async_trait::async_trait]
pub trait IRemoteFileService: Send + Sync {
    /// Fetches the current parent IDs of a resource
    async fn fetch_parents(&self, id: &ResourceId) -> anyhow::Result<Vec<String>>;

    /// Issues the combined update and returns the resulting resource
    ///
    /// Implementations must abort with an error once `cancel` is cancelled.
    async fn update(
        &self,
        call: UpdateCall,
        cancel: CancellationToken,
    ) -> anyhow::Result<RemoteFile>;
}
