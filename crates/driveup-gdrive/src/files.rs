//! Files resource operations
//!
//! - [`get_parents`] - `GET /drive/v3/files/{id}?fields=parents`
//! - [`update_metadata`] - `PATCH /drive/v3/files/{id}` with a partial body
//!
//! Every request sets `supportsAllDrives=true` so shared drive items are
//! reachable.

use driveup_core::domain::{MetadataPatch, ParentDelta};
use driveup_core::ports::RemoteFile;
use reqwest::Method;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::client::{cancellable, read_json, DriveClient};
use crate::DriveError;

/// Fields requested on every update response
pub const UPDATE_FIELDS: &str = "id,name,parents,size";

// ============================================================================
// Drive API response types
// ============================================================================

/// Response of a `fields=parents` lookup
#[derive(Debug, Deserialize)]
struct ParentsResponse {
    #[serde(default)]
    parents: Vec<String>,
}

/// A file resource as returned with `fields=id,name,parents,size`
///
/// Drive encodes `size` (an int64) as a decimal string. It is absent for
/// folders and native documents.
#[derive(Debug, Clone, Deserialize)]
pub struct DriveFile {
    pub id: String,
    pub name: Option<String>,
    #[serde(default)]
    pub parents: Vec<String>,
    pub size: Option<String>,
}

impl DriveFile {
    /// Converts into the port-level `RemoteFile`
    pub fn into_remote_file(self) -> Result<RemoteFile, DriveError> {
        let size = match self.size.as_deref() {
            Some(s) => s
                .parse::<u64>()
                .map_err(|_| DriveError::InvalidResponse(format!("invalid file size '{}'", s)))?,
            None => 0,
        };

        Ok(RemoteFile {
            id: self.id,
            name: self.name,
            parents: self.parents,
            size,
        })
    }
}

// ============================================================================
// Query construction
// ============================================================================

/// Query parameters shared by metadata and upload-session updates
///
/// `addParents` / `removeParents` are only included when they carry IDs.
pub fn update_query(parents: Option<&ParentDelta>) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("fields", UPDATE_FIELDS.to_string()),
        ("supportsAllDrives", "true".to_string()),
    ];

    if let Some(delta) = parents {
        if !delta.to_add().is_empty() {
            query.push(("addParents", delta.add_list()));
        }
        if !delta.to_remove().is_empty() {
            query.push(("removeParents", delta.remove_list()));
        }
    }

    query
}

// ============================================================================
// Operations
// ============================================================================

/// Fetches the current parent IDs of a file
pub async fn get_parents(client: &DriveClient, id: &str) -> Result<Vec<String>, DriveError> {
    let path = format!("/drive/v3/files/{}", id);
    debug!(id, "Fetching current parents");

    let response = client
        .request(Method::GET, &path)
        .query(&[("fields", "parents"), ("supportsAllDrives", "true")])
        .send()
        .await?;
    let parents: ParentsResponse = read_json(response).await?;

    debug!(id, count = parents.parents.len(), "Fetched parents");
    Ok(parents.parents)
}

/// Applies a metadata-only update, optionally moving the file
///
/// Only the fields present in `patch` are sent.
pub async fn update_metadata(
    client: &DriveClient,
    id: &str,
    patch: &MetadataPatch,
    parents: Option<&ParentDelta>,
    cancel: &CancellationToken,
) -> Result<DriveFile, DriveError> {
    let path = format!("/drive/v3/files/{}", id);
    let query = update_query(parents);
    debug!(id, ?query, "Sending metadata update");

    cancellable(cancel, async {
        let response = client
            .request(Method::PATCH, &path)
            .query(&query)
            .json(patch)
            .send()
            .await?;
        read_json::<DriveFile>(response).await
    })
    .await
}
