//! Content upload for the Drive API
//!
//! Replaces a file's content through a resumable upload session:
//! - [`start_session`] - `PATCH /upload/drive/v3/files/{id}?uploadType=resumable`
//!   with the metadata patch; the session URI comes back in `Location`
//! - [`upload_chunk`] - `PUT` of one chunk with a `Content-Range` header
//! - [`upload_stream`] - reads the upload stream chunk by chunk until EOF
//!
//! Intermediate chunks are sent with an unknown total (`bytes a-b/*`) and
//! answered with `308 Resume Incomplete`. The chunk that hits EOF carries the
//! total; if EOF lands exactly on a chunk boundary an empty `bytes */N`
//! request finalizes the session.
//!
//! ## References
//!
//! - [Resumable upload](https://developers.google.com/drive/api/guides/manage-uploads#resumable)

use driveup_core::domain::{MetadataPatch, ParentDelta};
use driveup_core::transfer::ByteStream;
use reqwest::header::{CONTENT_RANGE, LOCATION, RANGE};
use reqwest::{Method, Response, StatusCode};
use tokio::io::AsyncReadExt;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::client::{cancellable, check_status, read_json, DriveClient};
use crate::files::{update_query, DriveFile};
use crate::DriveError;

/// Granularity of upload chunks: 256 KiB
///
/// Every chunk except the last must be a multiple of this size.
pub const CHUNK_GRANULARITY: u64 = 256 * 1024;

/// Rounds a requested chunk size up to a valid one
///
/// Sizes below 256 KiB are raised to 256 KiB; everything else is rounded up
/// to the next multiple of 256 KiB.
pub fn normalize_chunk_size(requested: u64) -> u64 {
    if requested <= CHUNK_GRANULARITY {
        return CHUNK_GRANULARITY;
    }
    requested.div_ceil(CHUNK_GRANULARITY) * CHUNK_GRANULARITY
}

// ============================================================================
// Session
// ============================================================================

/// Starts a resumable upload session for an existing file
///
/// # Arguments
/// * `client` - The authenticated DriveClient
/// * `id` - File to update
/// * `patch` - Metadata fields sent along with the content
/// * `parents` - Optional parent mutation
/// * `size` - Content length if known (0 = unknown)
///
/// # Returns
/// The session URI to `PUT` chunks to
pub async fn start_session(
    client: &DriveClient,
    id: &str,
    patch: &MetadataPatch,
    parents: Option<&ParentDelta>,
    size: u64,
) -> Result<String, DriveError> {
    let path = format!("/upload/drive/v3/files/{}", id);
    let mut query = update_query(parents);
    query.push(("uploadType", "resumable".to_string()));

    let mut request = client
        .request(Method::PATCH, &path)
        .query(&query)
        .json(patch);
    if let Some(mime) = patch.mime_type.as_deref() {
        request = request.header("X-Upload-Content-Type", mime);
    }
    if size > 0 {
        request = request.header("X-Upload-Content-Length", size.to_string());
    }

    debug!(id, size, "Starting resumable upload session");
    let response = check_status(request.send().await?).await?;

    let session_uri = response
        .headers()
        .get(LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| {
            DriveError::InvalidResponse("upload session response has no Location header".into())
        })?;

    debug!(id, "Upload session created");
    Ok(session_uri)
}

// ============================================================================
// Chunks
// ============================================================================

/// Result of sending one chunk
#[derive(Debug)]
pub enum ChunkOutcome {
    /// The session needs more data; the server has persisted bytes up to
    /// (excluding) `committed`
    Incomplete { committed: u64 },
    /// The upload finished and the file resource was returned
    Complete(DriveFile),
}

/// Uploads one chunk to the session
///
/// # Arguments
/// * `data` - Chunk bytes (may be empty when finalizing)
/// * `offset` - Offset of `data` within the whole upload
/// * `total` - Total length if this is the last chunk, `None` otherwise
pub async fn upload_chunk(
    client: &DriveClient,
    session_uri: &str,
    data: &[u8],
    offset: u64,
    total: Option<u64>,
) -> Result<ChunkOutcome, DriveError> {
    let content_range = content_range(offset, data.len() as u64, total);
    debug!(%content_range, "Uploading chunk");

    let response = client
        .request_url(Method::PUT, session_uri)
        .header(CONTENT_RANGE, &content_range)
        .body(data.to_vec())
        .send()
        .await?;

    if response.status() == StatusCode::PERMANENT_REDIRECT {
        let committed = committed_bytes(&response)?.unwrap_or(offset + data.len() as u64);
        debug!(committed, "Chunk accepted, upload incomplete");
        return Ok(ChunkOutcome::Incomplete { committed });
    }

    let file: DriveFile = read_json(response).await?;
    Ok(ChunkOutcome::Complete(file))
}

/// `Content-Range` value for a chunk of `len` bytes at `offset`
fn content_range(offset: u64, len: u64, total: Option<u64>) -> String {
    let total = total.map_or_else(|| "*".to_string(), |t| t.to_string());
    if len == 0 {
        format!("bytes */{}", total)
    } else {
        format!("bytes {}-{}/{}", offset, offset + len - 1, total)
    }
}

/// Bytes persisted so far according to the `Range: bytes=0-N` header
///
/// `Ok(None)` when the header is absent. A header that is present but
/// unreadable is an invalid response.
fn committed_bytes(response: &Response) -> Result<Option<u64>, DriveError> {
    let Some(value) = response.headers().get(RANGE) else {
        return Ok(None);
    };
    value
        .to_str()
        .ok()
        .and_then(parse_range_end)
        .map(Some)
        .ok_or_else(|| DriveError::InvalidResponse(format!("malformed Range header {:?}", value)))
}

/// Parses `bytes=0-N` into `N + 1`
fn parse_range_end(range: &str) -> Option<u64> {
    let (start, end) = range.trim().strip_prefix("bytes=")?.split_once('-')?;
    if start.trim() != "0" {
        return None;
    }
    end.trim().parse::<u64>().ok()?.checked_add(1)
}

/// Tops `buf` up to `chunk_size` bytes from the stream
///
/// Returns true once the stream reached EOF.
async fn fill_chunk(
    stream: &mut ByteStream,
    buf: &mut Vec<u8>,
    chunk_size: usize,
) -> Result<bool, DriveError> {
    let mut filled = buf.len();
    buf.resize(chunk_size, 0);

    while filled < chunk_size {
        let n = stream.read(&mut buf[filled..]).await?;
        if n == 0 {
            buf.truncate(filled);
            return Ok(true);
        }
        filled += n;
    }
    Ok(false)
}

// ============================================================================
// Full upload
// ============================================================================

/// Replaces a file's content (and metadata) by streaming `stream`
///
/// This function:
/// 1. Starts a resumable session carrying the metadata patch and parent delta
/// 2. Reads the stream in `chunk_size` pieces (normalized to 256 KiB steps)
/// 3. Uploads each chunk, re-sending any tail the server did not persist
/// 4. Returns the file resource from the final response
///
/// Every network call and every read is raced against `cancel`.
#[allow(clippy::too_many_arguments)]
pub async fn upload_stream(
    client: &DriveClient,
    id: &str,
    patch: &MetadataPatch,
    parents: Option<&ParentDelta>,
    mut stream: ByteStream,
    chunk_size: u64,
    size: u64,
    cancel: &CancellationToken,
) -> Result<DriveFile, DriveError> {
    let chunk_size = normalize_chunk_size(chunk_size);
    info!(id, size, chunk_size, "Starting content upload");

    // Step 1: Create the session
    let session_uri = cancellable(cancel, start_session(client, id, patch, parents, size)).await?;

    // Step 2: Upload chunks until the stream is exhausted
    let chunk_len = usize::try_from(chunk_size)
        .map_err(|_| DriveError::InvalidResponse(format!("chunk size {} too large", chunk_size)))?;
    let mut buf: Vec<u8> = Vec::with_capacity(chunk_len);
    let mut offset: u64 = 0;

    loop {
        let eof = cancellable(cancel, fill_chunk(&mut stream, &mut buf, chunk_len)).await?;
        let total = eof.then(|| offset + buf.len() as u64);

        let outcome =
            cancellable(cancel, upload_chunk(client, &session_uri, &buf, offset, total)).await?;

        match outcome {
            ChunkOutcome::Complete(file) => {
                info!(id = %file.id, size = ?file.size, "Content upload completed");
                return Ok(file);
            }
            ChunkOutcome::Incomplete { committed } => {
                let sent_end = offset + buf.len() as u64;
                if committed < offset || committed > sent_end {
                    return Err(DriveError::InvalidResponse(format!(
                        "server reported {} bytes persisted, expected {}..={}",
                        committed, offset, sent_end
                    )));
                }
                if eof && committed == sent_end {
                    return Err(DriveError::InvalidResponse(
                        "upload session still incomplete after final chunk".into(),
                    ));
                }
                if committed == offset && !buf.is_empty() {
                    return Err(DriveError::InvalidResponse(format!(
                        "server persisted no bytes of the chunk at offset {}",
                        offset
                    )));
                }

                // Keep the part the server did not persist for the next request
                let acked = (committed - offset) as usize;
                buf.drain(..acked);
                offset = committed;
            }
        }
    }
}
