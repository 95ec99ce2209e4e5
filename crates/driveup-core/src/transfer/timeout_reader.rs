//! Inactivity-timeout reader wrapper

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use thiserror::Error;
use tokio::io::{AsyncRead, ReadBuf};
use tokio::time::Sleep;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use super::observation::TransferObservation;

/// Error carried inside the `io::Error` returned when the stream stalls
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("no data was transferred for {timeout:?}")]
pub struct InactivityTimeout {
    pub timeout: Duration,
}

/// Error carried inside the `io::Error` returned after outside cancellation
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("transfer cancelled")]
pub struct TransferCancelled;

/// Aborts the stream when no read completes within `timeout`
///
/// The clock starts when the shared [`TransferObservation`] was created and
/// restarts after every completed read. When it runs out the reader marks
/// the observation as timed out, cancels the shared token and fails the
/// pending read with [`io::ErrorKind::TimedOut`]. A zero timeout disables
/// the check, though reads are still recorded.
pub struct TimeoutReader<R> {
    inner: R,
    timeout: Duration,
    observation: Arc<TransferObservation>,
    cancel: CancellationToken,
    sleep: Option<Pin<Box<Sleep>>>,
}

impl<R> TimeoutReader<R> {
    pub fn new(
        inner: R,
        timeout: Duration,
        observation: Arc<TransferObservation>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            inner,
            timeout,
            observation,
            cancel,
            sleep: None,
        }
    }

    fn is_enabled(&self) -> bool {
        !self.timeout.is_zero()
    }

    fn fire(&self) -> io::Error {
        if self.observation.mark_timed_out() {
            warn!(
                timeout = ?self.timeout,
                bytes_transferred = self.observation.bytes_transferred(),
                "Upload stalled, cancelling transfer"
            );
        }
        self.cancel.cancel();
        self.timeout_error()
    }

    fn timeout_error(&self) -> io::Error {
        io::Error::new(
            io::ErrorKind::TimedOut,
            InactivityTimeout {
                timeout: self.timeout,
            },
        )
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for TimeoutReader<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();

        if this.cancel.is_cancelled() {
            let err = if this.observation.timed_out() {
                this.timeout_error()
            } else {
                io::Error::new(io::ErrorKind::Interrupted, TransferCancelled)
            };
            return Poll::Ready(Err(err));
        }

        let before = buf.filled().len();
        let had_capacity = buf.remaining() > 0;

        match Pin::new(&mut this.inner).poll_read(cx, buf) {
            Poll::Ready(Ok(())) => {
                let n = (buf.filled().len() - before) as u64;
                this.observation.record(n);
                if n == 0 && had_capacity {
                    this.observation.mark_finished();
                }
                Poll::Ready(Ok(()))
            }
            Poll::Ready(Err(e)) => Poll::Ready(Err(e)),
            Poll::Pending => {
                if !this.is_enabled() {
                    return Poll::Pending;
                }

                let deadline = this.observation.last_activity() + this.timeout;
                let sleep = this
                    .sleep
                    .get_or_insert_with(|| Box::pin(tokio::time::sleep_until(deadline)));
                if sleep.deadline() != deadline {
                    sleep.as_mut().reset(deadline);
                }

                match sleep.as_mut().poll(cx) {
                    Poll::Ready(()) => Poll::Ready(Err(this.fire())),
                    Poll::Pending => Poll::Pending,
                }
            }
        }
    }
}
