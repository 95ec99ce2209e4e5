//! Progress-reporting reader wrapper

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, ReadBuf};

/// Observer of upload progress: `(bytes_so_far, total)`
///
/// `total` is 0 when the expected size is unknown.
pub type ProgressCallback = Box<dyn Fn(u64, u64) + Send>;

/// Reports cumulative bytes read to an optional observer
///
/// The observer runs after each read that produced at least one byte, once
/// those bytes are already in the caller's buffer. Empty and failed reads
/// are not reported.
pub struct ProgressReader<R> {
    inner: R,
    total: u64,
    read: u64,
    observer: Option<ProgressCallback>,
}

impl<R> ProgressReader<R> {
    pub fn new(inner: R, total: u64, observer: Option<ProgressCallback>) -> Self {
        Self {
            inner,
            total,
            read: 0,
            observer,
        }
    }

    /// Bytes read through this wrapper so far
    pub fn bytes_read(&self) -> u64 {
        self.read
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for ProgressReader<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let before = buf.filled().len();

        match Pin::new(&mut this.inner).poll_read(cx, buf) {
            Poll::Ready(Ok(())) => {
                let n = (buf.filled().len() - before) as u64;
                if n > 0 {
                    this.read += n;
                    if let Some(observer) = &this.observer {
                        observer(this.read, this.total);
                    }
                }
                Poll::Ready(Ok(()))
            }
            other => other,
        }
    }
}
