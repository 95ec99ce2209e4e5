//! DriveFileService - IRemoteFileService implementation for Google Drive
//!
//! Wraps the [`DriveClient`] and delegates to the files and upload modules
//! to fulfil the [`IRemoteFileService`] port contract.
//!
//! ## Design Notes
//!
//! - A call with media goes through a resumable upload session; the
//!   metadata patch and parent lists travel in the session-initiating
//!   request, so the whole update is still one logical call.
//! - Errors are returned as `DriveError` wrapped in `anyhow`, with no extra
//!   context, so the caller's message carries the API's own wording.

use anyhow::Result;
use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use driveup_core::domain::ResourceId;
use driveup_core::ports::{IRemoteFileService, RemoteFile, UpdateCall};

use crate::client::DriveClient;
use crate::files;
use crate::upload;

/// Google Drive implementation of the remote file service port
#[derive(Debug, Clone)]
pub struct DriveFileService {
    client: DriveClient,
}

impl DriveFileService {
    /// Creates a new service around an authenticated client
    pub fn new(client: DriveClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IRemoteFileService for DriveFileService {
    async fn fetch_parents(&self, id: &ResourceId) -> Result<Vec<String>> {
        debug!(id = %id, "DriveFileService: fetch_parents");
        Ok(files::get_parents(&self.client, id.as_str()).await?)
    }

    async fn update(&self, call: UpdateCall, cancel: CancellationToken) -> Result<RemoteFile> {
        let UpdateCall {
            id,
            metadata,
            media,
            parents,
        } = call;

        debug!(
            id = %id,
            with_media = media.is_some(),
            with_parents = parents.is_some(),
            "DriveFileService: update"
        );

        let file = match media {
            Some(media) => {
                upload::upload_stream(
                    &self.client,
                    id.as_str(),
                    &metadata,
                    parents.as_ref(),
                    media.stream,
                    media.chunk_size,
                    media.size,
                    &cancel,
                )
                .await?
            }
            None => {
                files::update_metadata(
                    &self.client,
                    id.as_str(),
                    &metadata,
                    parents.as_ref(),
                    &cancel,
                )
                .await?
            }
        };

        Ok(file.into_remote_file()?)
    }
}
