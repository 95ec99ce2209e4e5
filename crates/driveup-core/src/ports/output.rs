//! Output sink port (driven/secondary port)
//!
//! Receives the status lines of an update and, optionally, progress ticks
//! for the upload stream. Implementations decide where these go (terminal,
//! JSON, nowhere).

use std::fmt;
use std::path::PathBuf;

use crate::transfer::ProgressCallback;

/// A status event emitted by the update use case
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// Content upload is about to start
    Uploading { path: PathBuf },
    /// The resource's parents changed
    Moved { id: String, parents: Vec<String> },
    /// Content upload finished
    Updated {
        id: String,
        bytes_per_second: u64,
        size: u64,
    },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::Uploading { path } => write!(f, "Uploading {}", path.display()),
            Notice::Moved { id, parents } => {
                write!(f, "Move {} under new parent {}", id, parents.join(","))
            }
            Notice::Updated {
                id,
                bytes_per_second,
                size,
            } => write!(f, "Updated {} at {} B/s, total {} B", id, bytes_per_second, size),
        }
    }
}

pub trait IOutputSink: Send + Sync {
    /// Delivers a status notice
    fn notify(&self, notice: &Notice);

    /// Observer for upload progress, or `None` to disable progress reporting
    fn progress_observer(&self) -> Option<ProgressCallback> {
        None
    }
}
