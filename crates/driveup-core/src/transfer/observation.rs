//! Shared state of one active upload stream

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tokio::time::Instant;

/// Byte counter and activity clock for one transfer
///
/// Written by the reader pipeline on every completed read and read by the
/// watchdog and the orchestrator. All fields are atomics so the observation
/// can be shared through an `Arc` without locking. It lives only as long as
/// the upload it describes.
#[derive(Debug)]
pub struct TransferObservation {
    started: Instant,
    bytes: AtomicU64,
    /// Nanoseconds after `started` of the last completed read
    last_activity: AtomicU64,
    finished: AtomicBool,
    timed_out: AtomicBool,
}

impl TransferObservation {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            bytes: AtomicU64::new(0),
            last_activity: AtomicU64::new(0),
            finished: AtomicBool::new(false),
            timed_out: AtomicBool::new(false),
        }
    }

    /// When the observation (and therefore the pipeline) was created
    pub fn started(&self) -> Instant {
        self.started
    }

    /// Total bytes handed to the consumer so far
    pub fn bytes_transferred(&self) -> u64 {
        self.bytes.load(Ordering::Acquire)
    }

    /// Instant of the last completed read, or creation time if none yet
    pub fn last_activity(&self) -> Instant {
        self.started + Duration::from_nanos(self.last_activity.load(Ordering::Acquire))
    }

    /// Time since the last completed read
    pub fn idle_for(&self) -> Duration {
        Instant::now().saturating_duration_since(self.last_activity())
    }

    /// Records a completed read of `n` bytes
    pub fn record(&self, n: u64) {
        if n > 0 {
            self.bytes.fetch_add(n, Ordering::AcqRel);
        }
        let offset = u64::try_from(self.started.elapsed().as_nanos()).unwrap_or(u64::MAX);
        self.last_activity.fetch_max(offset, Ordering::AcqRel);
    }

    /// Marks the source as fully consumed
    pub fn mark_finished(&self) {
        self.finished.store(true, Ordering::Release);
    }

    pub fn is_finished(&self) -> bool {
        self.finished.load(Ordering::Acquire)
    }

    /// Marks the transfer as abandoned for inactivity
    ///
    /// Returns true only for the first caller.
    pub fn mark_timed_out(&self) -> bool {
        !self.timed_out.swap(true, Ordering::AcqRel)
    }

    pub fn timed_out(&self) -> bool {
        self.timed_out.load(Ordering::Acquire)
    }
}

impl Default for TransferObservation {
    fn default() -> Self {
        Self::new()
    }
}
