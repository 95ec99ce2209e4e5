//! Local adapters (secondary/driven adapters)
//!
//! - [`LocalFileSource`] implements [`IFileSource`] with `tokio::fs`
//! - [`ExtensionMimeResolver`] implements [`IMimeResolver`] with a fixed
//!   extension table

use std::path::Path;

use anyhow::{bail, Context};
use driveup_core::ports::{IFileSource, IMimeResolver, OpenedFile};
use tracing::{debug, instrument};

// ============================================================================
// LocalFileSource
// ============================================================================

/// Opens regular files from the local filesystem.
#[derive(Debug, Clone, Default)]
pub struct LocalFileSource;

impl LocalFileSource {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl IFileSource for LocalFileSource {
    #[instrument(skip(self), fields(path = %path.display()))]
    async fn open(&self, path: &Path) -> anyhow::Result<OpenedFile> {
        let metadata = tokio::fs::metadata(path)
            .await
            .with_context(|| format!("cannot stat {}", path.display()))?;
        if metadata.is_dir() {
            bail!("{} is a directory", path.display());
        }

        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("cannot open {}", path.display()))?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        debug!(name = %name, size = metadata.len(), "opened file");
        Ok(OpenedFile {
            reader: Box::new(file),
            name,
            size: metadata.len(),
        })
    }
}

// ============================================================================
// ExtensionMimeResolver
// ============================================================================

/// Extension to MIME type table, matched case-insensitively.
const MIME_TYPES: &[(&str, &str)] = &[
    ("7z", "application/x-7z-compressed"),
    ("avi", "video/x-msvideo"),
    ("bmp", "image/bmp"),
    ("bz2", "application/x-bzip2"),
    ("css", "text/css"),
    ("csv", "text/csv"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("epub", "application/epub+zip"),
    ("flac", "audio/flac"),
    ("gif", "image/gif"),
    ("gz", "application/gzip"),
    ("htm", "text/html"),
    ("html", "text/html"),
    ("ico", "image/vnd.microsoft.icon"),
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpeg"),
    ("js", "text/javascript"),
    ("json", "application/json"),
    ("md", "text/markdown"),
    ("mkv", "video/x-matroska"),
    ("mov", "video/quicktime"),
    ("mp3", "audio/mpeg"),
    ("mp4", "video/mp4"),
    ("odp", "application/vnd.oasis.opendocument.presentation"),
    ("ods", "application/vnd.oasis.opendocument.spreadsheet"),
    ("odt", "application/vnd.oasis.opendocument.text"),
    ("ogg", "audio/ogg"),
    ("pdf", "application/pdf"),
    ("png", "image/png"),
    ("ppt", "application/vnd.ms-powerpoint"),
    (
        "pptx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    ),
    ("rar", "application/vnd.rar"),
    ("rtf", "application/rtf"),
    ("svg", "image/svg+xml"),
    ("tar", "application/x-tar"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("tsv", "text/tab-separated-values"),
    ("txt", "text/plain"),
    ("wav", "audio/wav"),
    ("webm", "video/webm"),
    ("webp", "image/webp"),
    ("xls", "application/vnd.ms-excel"),
    (
        "xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    ("xml", "application/xml"),
    ("yaml", "application/yaml"),
    ("yml", "application/yaml"),
    ("zip", "application/zip"),
];

/// Resolves MIME types from a built-in extension table.
#[derive(Debug, Clone, Default)]
pub struct ExtensionMimeResolver;

impl ExtensionMimeResolver {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl IMimeResolver for ExtensionMimeResolver {
    fn lookup(&self, extension: &str) -> Option<String> {
        let extension = extension.trim_start_matches('.');
        MIME_TYPES
            .iter()
            .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
            .map(|(_, mime)| (*mime).to_string())
    }
}
