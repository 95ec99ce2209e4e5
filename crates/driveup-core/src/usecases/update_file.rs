//! File update use case
//!
//! Orchestrates a single update of one remote resource: optional content
//! upload through the reader pipeline, optional parent reconciliation, one
//! combined remote call, outcome classification and reporting.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::domain::errors::UpdateError;
use crate::domain::parents::ParentDelta;
use crate::domain::update::UpdateRequest;
use crate::ports::{
    IFileSource, IMimeResolver, IOutputSink, IRemoteFileService, MediaUpload, Notice, RemoteFile,
    UpdateCall,
};
use crate::transfer::{compose, rate_between, InactivityTimeout, TransferHandle};

/// Outcome of a successful update
#[derive(Debug, Clone)]
pub struct UpdateReport {
    /// The resource as reported by the remote service
    pub file: RemoteFile,
    /// Parent mutation that was sent, if any
    pub parent_delta: Option<ParentDelta>,
    /// Average upload rate; `None` for metadata-only updates
    pub bytes_per_second: Option<u64>,
    /// Wall time of the remote call
    pub elapsed: Duration,
}

/// Use case for updating one remote file
pub struct UpdateFileUseCase {
    remote: Arc<dyn IRemoteFileService + Send + Sync>,
    files: Arc<dyn IFileSource + Send + Sync>,
    mime: Arc<dyn IMimeResolver + Send + Sync>,
    output: Arc<dyn IOutputSink + Send + Sync>,
}

impl UpdateFileUseCase {
    /// Creates a new UpdateFileUseCase
    ///
    /// # Arguments
    ///
    /// * `remote` - Remote storage service receiving the update
    /// * `files` - Source of local content for uploads
    /// * `mime` - MIME lookup used when no type is given explicitly
    /// * `output` - Receives status notices and progress
    pub fn new(
        remote: Arc<dyn IRemoteFileService + Send + Sync>,
        files: Arc<dyn IFileSource + Send + Sync>,
        mime: Arc<dyn IMimeResolver + Send + Sync>,
        output: Arc<dyn IOutputSink + Send + Sync>,
    ) -> Self {
        Self {
            remote,
            files,
            mime,
            output,
        }
    }

    /// Runs the update described by `request`
    ///
    /// This method:
    /// 1. Validates the request
    /// 2. Opens the content source, if a path was given
    /// 3. Fetches current parents and reconciles them, if parents were given
    /// 4. Composes the upload stream and announces the upload
    /// 5. Issues exactly one remote update call and classifies its outcome
    /// 6. Reports the move and the upload rate
    ///
    /// # Errors
    ///
    /// Any failure aborts the whole update; see [`UpdateError`]
    pub async fn execute(&self, request: UpdateRequest) -> Result<UpdateReport, UpdateError> {
        request.validate()?;

        let mut metadata = request.metadata();

        // Step 1: Open the content source before touching the network
        let opened = match request.upload_path() {
            Some(path) => {
                let file = self
                    .files
                    .open(path)
                    .await
                    .map_err(|reason| UpdateError::Open {
                        path: path.to_path_buf(),
                        reason,
                    })?;
                debug!(path = %path.display(), size = file.size, "Opened content source");
                Some((path.to_path_buf(), file))
            }
            None => None,
        };

        // Step 2: Reconcile parents against a fresh read of the remote
        let parent_delta = if request.wants_parent_change() {
            let current = self
                .remote
                .fetch_parents(&request.id)
                .await
                .map_err(UpdateError::Fetch)?;
            let delta = ParentDelta::reconcile(&current, &request.parents);
            debug!(
                id = %request.id,
                remove = %delta.remove_list(),
                add = %delta.add_list(),
                "Reconciled parents"
            );
            (!delta.is_empty()).then_some(delta)
        } else {
            None
        };

        // Step 3: Resolve name and MIME type, then build the upload stream
        let mut transfer: Option<TransferHandle> = None;
        let media = match opened {
            Some((path, file)) => {
                if metadata.name.is_none() {
                    metadata.name = Some(file.name.clone());
                }
                if metadata.mime_type.is_none() {
                    metadata.mime_type = metadata.name.as_deref().and_then(|n| self.infer_mime(n));
                }

                let (stream, handle) = compose(
                    file.reader,
                    self.output.progress_observer(),
                    file.size,
                    request.timeout,
                );
                self.output.notify(&Notice::Uploading { path });
                transfer = Some(handle);

                Some(MediaUpload {
                    stream,
                    chunk_size: request.chunk_size,
                    size: file.size,
                })
            }
            None => None,
        };

        // Step 4: One combined call
        let call = UpdateCall {
            id: request.id.clone(),
            metadata,
            media,
            parents: parent_delta.clone(),
        };
        let handle = transfer.as_ref();

        info!(
            id = %request.id,
            upload = handle.is_some(),
            move_parents = call.parents.is_some(),
            "Updating file"
        );

        let started = Instant::now();
        let outcome = match handle {
            Some(handle) => {
                tokio::select! {
                    biased;
                    result = self.remote.update(call, handle.cancellation_token()) => result,
                    () = handle.watchdog() => Err(anyhow!(InactivityTimeout {
                        timeout: handle.timeout(),
                    })),
                }
            }
            None => self.remote.update(call, CancellationToken::new()).await,
        };
        let finished = Instant::now();
        let elapsed = finished.saturating_duration_since(started);

        let file = outcome.map_err(|e| classify(e, handle))?;

        info!(
            id = %file.id,
            size = file.size,
            elapsed_ms = elapsed.as_millis() as u64,
            "File updated"
        );

        // Step 5: Report
        if request.wants_parent_change() {
            self.output.notify(&Notice::Moved {
                id: file.id.clone(),
                parents: file.parents.clone(),
            });
        }

        let rate = transfer.as_ref().map(|_| {
            let rate = rate_between(file.size, started, finished);
            self.output.notify(&Notice::Updated {
                id: file.id.clone(),
                bytes_per_second: rate,
                size: file.size,
            });
            rate
        });

        Ok(UpdateReport {
            file,
            parent_delta,
            bytes_per_second: rate,
            elapsed,
        })
    }

    fn infer_mime(&self, name: &str) -> Option<String> {
        let extension = Path::new(name).extension()?.to_str()?;
        self.mime.lookup(extension)
    }
}

/// Maps a failed remote call to the error taxonomy
fn classify(err: anyhow::Error, handle: Option<&TransferHandle>) -> UpdateError {
    match handle {
        Some(handle) if handle.timed_out() => UpdateError::Timeout {
            timeout: handle.timeout(),
            bytes_transferred: handle.bytes_transferred(),
        },
        _ => UpdateError::Remote(err),
    }
}
