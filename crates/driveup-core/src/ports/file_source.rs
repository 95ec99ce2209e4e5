//! File source port (driven/secondary port)
//!
//! Opens local content for upload. Implementations stat the file so the
//! progress observer and the remote service know the expected length.

use std::fmt;
use std::path::Path;

use crate::transfer::ByteStream;

/// An opened content source
pub struct OpenedFile {
    /// Readable content
    pub reader: ByteStream,
    /// Base name of the source
    pub name: String,
    /// Size in bytes at open time
    pub size: u64,
}

impl fmt::Debug for OpenedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenedFile")
            .field("name", &self.name)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
pub trait IFileSource: Send + Sync {
    /// Opens `path` for reading
    async fn open(&self, path: &Path) -> anyhow::Result<OpenedFile>;
}
