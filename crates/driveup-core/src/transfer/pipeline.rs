//! Reader pipeline composition
//!
//! The upload stream is built as `source -> ProgressReader -> TimeoutReader`.
//! The consumer reads from the outermost wrapper, so a stall is detected
//! regardless of which layer stopped producing bytes.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::AsyncRead;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::observation::TransferObservation;
use super::progress_reader::{ProgressCallback, ProgressReader};
use super::timeout_reader::TimeoutReader;

/// Boxed byte stream handed to the remote service
pub type ByteStream = Box<dyn AsyncRead + Send + Unpin>;

/// Control side of a composed upload stream
///
/// Holds the cancellation token shared with the stream and the network call,
/// plus the observation the stream writes to.
#[derive(Debug, Clone)]
pub struct TransferHandle {
    observation: Arc<TransferObservation>,
    cancel: CancellationToken,
    timeout: Duration,
}

impl TransferHandle {
    /// Token to pass to the network call
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn bytes_transferred(&self) -> u64 {
        self.observation.bytes_transferred()
    }

    /// Returns true if the inactivity timeout ended the transfer
    pub fn timed_out(&self) -> bool {
        self.observation.timed_out()
    }

    /// Completes only when the inactivity timeout fires
    ///
    /// Covers the case where the consumer stops polling the stream, e.g.
    /// while it waits on a stalled response, so the reader itself never
    /// gets the chance to notice. Never completes when the timeout is
    /// disabled, after the stream reached EOF, or once the token was
    /// cancelled by someone else.
    pub async fn watchdog(&self) {
        if self.timeout.is_zero() {
            return std::future::pending().await;
        }

        loop {
            let deadline = self.observation.last_activity() + self.timeout;
            tokio::select! {
                () = self.cancel.cancelled() => {
                    if self.observation.timed_out() {
                        return;
                    }
                    return std::future::pending().await;
                }
                () = tokio::time::sleep_until(deadline) => {}
            }

            if self.observation.is_finished() {
                return std::future::pending().await;
            }

            if self.observation.idle_for() >= self.timeout {
                if self.observation.mark_timed_out() {
                    warn!(
                        timeout = ?self.timeout,
                        bytes_transferred = self.observation.bytes_transferred(),
                        "Upload stalled, cancelling transfer"
                    );
                }
                self.cancel.cancel();
                return;
            }
        }
    }
}

/// Composes the upload stream and its control handle
///
/// A zero `timeout` disables the inactivity check. `total_size` of 0 means
/// the size is unknown to the progress observer.
pub fn compose(
    source: ByteStream,
    progress: Option<ProgressCallback>,
    total_size: u64,
    timeout: Duration,
) -> (ByteStream, TransferHandle) {
    let observation = Arc::new(TransferObservation::new());
    let cancel = CancellationToken::new();

    let progress_reader = ProgressReader::new(source, total_size, progress);
    let timeout_reader = TimeoutReader::new(
        progress_reader,
        timeout,
        Arc::clone(&observation),
        cancel.clone(),
    );

    debug!(total_size, timeout = ?timeout, "Composed upload stream");

    let handle = TransferHandle {
        observation,
        cancel,
        timeout,
    };
    (Box::new(timeout_reader), handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use tokio::io::AsyncReadExt;
    use tokio::time::Instant;

    #[tokio::test]
    async fn test_stream_passes_bytes_and_reports_progress() {
        let reports = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&reports);
        let progress: ProgressCallback = Box::new(move |done, total| {
            sink.lock().unwrap().push((done, total));
        });

        let (mut stream, handle) = compose(
            Box::new(&b"hello world"[..]),
            Some(progress),
            11,
            Duration::from_secs(30),
        );

        let mut out = Vec::new();
        stream.read_to_end(&mut out).await.unwrap();

        assert_eq!(out, b"hello world");
        assert_eq!(handle.bytes_transferred(), 11);
        assert_eq!(reports.lock().unwrap().last(), Some(&(11, 11)));
        assert!(!handle.timed_out());
        assert!(!handle.cancellation_token().is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_watchdog_fires_when_stream_is_never_read() {
        let (_stream, handle) = compose(
            Box::new(tokio::io::empty()),
            None,
            0,
            Duration::from_secs(2),
        );

        let start = Instant::now();
        handle.watchdog().await;

        assert_eq!(start.elapsed(), Duration::from_secs(2));
        assert!(handle.timed_out());
        assert!(handle.cancellation_token().is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_watchdog_disabled_with_zero_timeout() {
        let (_stream, handle) =
            compose(Box::new(tokio::io::empty()), None, 0, Duration::ZERO);

        let waited = tokio::time::timeout(Duration::from_secs(3600), handle.watchdog()).await;
        assert!(waited.is_err());
        assert!(!handle.timed_out());
    }

    #[tokio::test(start_paused = true)]
    async fn test_watchdog_stands_down_after_eof() {
        let (mut stream, handle) = compose(
            Box::new(&b"abc"[..]),
            None,
            3,
            Duration::from_secs(1),
        );
        let mut out = Vec::new();
        stream.read_to_end(&mut out).await.unwrap();

        let waited = tokio::time::timeout(Duration::from_secs(60), handle.watchdog()).await;
        assert!(waited.is_err());
        assert!(!handle.timed_out());
    }

    #[tokio::test(start_paused = true)]
    async fn test_outside_cancellation_is_not_reported_as_timeout() {
        let (_stream, handle) = compose(
            Box::new(tokio::io::empty()),
            None,
            0,
            Duration::from_secs(10),
        );
        handle.cancellation_token().cancel();

        let waited = tokio::time::timeout(Duration::from_secs(60), handle.watchdog()).await;
        assert!(waited.is_err());
        assert!(!handle.timed_out());
    }
}
