//! Terminal output sink
//!
//! Status lines go to stdout, progress to stderr as a single line that is
//! rewritten in place. JSON and quiet modes print neither.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use bytesize::ByteSize;
use driveup_core::ports::{IOutputSink, Notice};
use driveup_core::transfer::ProgressCallback;

use crate::output::OutputFormat;

/// [`IOutputSink`] writing to the terminal
#[derive(Debug)]
pub struct ConsoleSink {
    format: OutputFormat,
    show_progress: bool,
    progress_drawn: Arc<AtomicBool>,
}

impl ConsoleSink {
    pub fn new(format: OutputFormat, show_progress: bool) -> Self {
        Self {
            format,
            show_progress,
            progress_drawn: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Clears the progress line if one was drawn
    pub fn finish(&self) {
        if self.progress_drawn.swap(false, Ordering::AcqRel) {
            let mut stderr = std::io::stderr();
            let _ = write!(stderr, "\r\x1b[2K");
            let _ = stderr.flush();
        }
    }
}

impl IOutputSink for ConsoleSink {
    fn notify(&self, notice: &Notice) {
        if self.format == OutputFormat::Human {
            // The progress line shares the terminal
            self.finish();
            println!("{}", status_line(notice));
        }
    }

    fn progress_observer(&self) -> Option<ProgressCallback> {
        if self.format != OutputFormat::Human || !self.show_progress {
            return None;
        }

        let drawn = Arc::clone(&self.progress_drawn);
        Some(Box::new(move |done, total| {
            let mut stderr = std::io::stderr();
            let _ = write!(stderr, "\r{}", progress_line(done, total));
            let _ = stderr.flush();
            drawn.store(true, Ordering::Release);
        }))
    }
}

/// Human rendering of a notice, with sizes in human units
fn status_line(notice: &Notice) -> String {
    match notice {
        Notice::Updated {
            id,
            bytes_per_second,
            size,
        } => format!(
            "Updated {} at {}/s, total {}",
            id,
            ByteSize::b(*bytes_per_second),
            ByteSize::b(*size)
        ),
        other => other.to_string(),
    }
}

/// `<done> / <total>`, or `<done>` when the total is unknown
fn progress_line(done: u64, total: u64) -> String {
    if total > 0 {
        format!("{} / {}", ByteSize::b(done), ByteSize::b(total))
    } else {
        ByteSize::b(done).to_string()
    }
}
