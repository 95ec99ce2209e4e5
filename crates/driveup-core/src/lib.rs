//! driveup Core - Domain logic and the update pipeline
//!
//! This crate contains the hexagonal architecture core with:
//! - **Domain types** - `ResourceId`, `UpdateRequest`, `MetadataPatch`, `ParentDelta`, `UpdateError`
//! - **Transfer pipeline** - progress and inactivity-timeout reader wrappers, rate calculation
//! - **Use cases** - `UpdateFileUseCase`
//! - **Port definitions** - Traits for adapters: `IRemoteFileService`, `IFileSource`,
//!   `IMimeResolver`, `IOutputSink`
//!
//! # Architecture
//!
//! This crate follows the hexagonal (ports & adapters) architecture pattern.
//! The domain module contains pure business logic with no I/O.
//! Ports define trait interfaces that adapter crates implement.
//! Use cases orchestrate domain types through port interfaces.

pub mod config;
pub mod domain;
pub mod ports;
pub mod transfer;
pub mod usecases;
