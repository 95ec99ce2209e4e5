//! Use cases (interactors) for driveup
//!
//! This module contains the application use cases that orchestrate
//! domain entities and port interfaces. Use cases are thin coordinators
//! that delegate business rules to domain methods and I/O to ports.
//!
//! ## Use Cases
//!
//! - [`UpdateFileUseCase`] - Metadata, content and parent update of one remote file

pub mod update_file;

pub use update_file::{UpdateFileUseCase, UpdateReport};
