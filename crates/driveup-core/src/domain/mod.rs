//! Domain entities and business logic
//!
//! This module contains the core domain types for driveup:
//! - Newtypes for validated remote identifiers
//! - The update request and its partial metadata patch
//! - Parent-set reconciliation
//! - Domain-specific error types

pub mod errors;
pub mod newtypes;
pub mod parents;
pub mod update;

// Re-export commonly used types
pub use errors::{DomainError, UpdateError};
pub use newtypes::ResourceId;
pub use parents::ParentDelta;
pub use update::{MetadataPatch, UpdateRequest, DEFAULT_CHUNK_SIZE, DEFAULT_TIMEOUT};
