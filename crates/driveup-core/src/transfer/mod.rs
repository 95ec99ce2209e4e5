//! Streaming upload pipeline
//!
//! Reader wrappers that sit between the local content source and the
//! network layer, plus the throughput calculation used for reporting.

pub mod observation;
pub mod pipeline;
pub mod progress_reader;
pub mod rate;
pub mod timeout_reader;

pub use observation::TransferObservation;
pub use pipeline::{compose, ByteStream, TransferHandle};
pub use progress_reader::{ProgressCallback, ProgressReader};
pub use rate::{bytes_per_second, rate_between};
pub use timeout_reader::{InactivityTimeout, TimeoutReader, TransferCancelled};
