//! Port definitions (hexagonal architecture interfaces)
//!
//! This module defines the port traits that form the boundaries of the
//! hexagonal architecture. Ports are interfaces that the domain core
//! depends on, but whose implementations live in adapter crates.
//!
//! ## Ports Overview
//!
//! - [`IRemoteFileService`] - Remote storage reads and the combined update call
//! - [`IFileSource`] - Opening local content for upload
//! - [`IMimeResolver`] - Extension to MIME type lookup
//! - [`IOutputSink`] - Status notices and progress reporting

pub mod file_source;
pub mod mime_resolver;
pub mod output;
pub mod remote_file_service;

pub use file_source::{IFileSource, OpenedFile};
pub use mime_resolver::IMimeResolver;
pub use output::{IOutputSink, Notice};
pub use remote_file_service::{IRemoteFileService, MediaUpload, RemoteFile, UpdateCall};
