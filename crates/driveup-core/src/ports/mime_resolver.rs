//! MIME type lookup port

/// Maps a file extension to a MIME type
pub trait IMimeResolver: Send + Sync {
    /// Looks up the MIME type for `extension`
    ///
    /// The extension is passed without the leading dot. Returns `None` when
    /// the extension is unknown, in which case the MIME type is left unset.
    fn lookup(&self, extension: &str) -> Option<String>;
}
