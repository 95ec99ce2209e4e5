//! Throughput calculation

use std::time::Duration;

use tokio::time::Instant;

/// Bytes per second for `bytes` moved in `elapsed`, rounded to the nearest integer
///
/// Intervals shorter than one second report the byte count itself, so a
/// near-instant transfer never divides by zero or by a tiny fraction.
pub fn bytes_per_second(bytes: u64, elapsed: Duration) -> u64 {
    let secs = elapsed.as_secs_f64();
    if secs < 1.0 {
        return bytes;
    }
    (bytes as f64 / secs).round() as u64
}

/// Rate between two instants; a reversed interval counts as zero
pub fn rate_between(bytes: u64, start: Instant, end: Instant) -> u64 {
    bytes_per_second(bytes, end.saturating_duration_since(start))
}
