//! Draining a stream to its end.
//!
//! [`drain`] consumes a stream frame by frame, hands non-empty assistant
//! content to an observer, and stops at end-of-stream, at the first error,
//! or when the observer breaks. Errors are logged and reported, never
//! raised. The reader is closed exactly once on every exit path.
//!
//! [`spawn_drain`] runs the same loop as its own task so the caller is not
//! held up by the stream's pace.

use crate::error::StreamError;
use crate::frame::Frame;
use crate::reader::StreamReader;
use core::ops::ControlFlow;
use tokio::task::JoinHandle;
use tracing::Instrument;

/// How a drain ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrainEnd {
    /// The stream reached end-of-stream.
    Eof,
    /// The stream failed; the error was logged.
    Failed(StreamError),
    /// The observer asked to stop early.
    Stopped,
}

impl DrainEnd {
    /// Returns `true` if the stream ended normally.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        matches!(self, Self::Eof)
    }
}

/// Summary of one drain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrainReport {
    /// Frames received.
    pub frames: usize,
    /// Frames forwarded to the observer.
    pub forwarded: usize,
    /// Why the drain stopped.
    pub end: DrainEnd,
}

/// Consumes `reader` to its end, forwarding assistant content to `observer`.
///
/// Frames that are not assistant content, or whose content is empty, are
/// skipped.
pub async fn drain<T, F>(mut reader: StreamReader<T>, mut observer: F) -> DrainReport
where
    T: Frame,
    F: FnMut(&str) -> ControlFlow<()>,
{
    let mut frames = 0;
    let mut forwarded = 0;

    let end = loop {
        match reader.recv().await {
            Ok(Some(frame)) => {
                frames += 1;
                let Some(text) = frame.assistant_content() else {
                    continue;
                };
                forwarded += 1;
                if observer(text).is_break() {
                    break DrainEnd::Stopped;
                }
            }
            Ok(None) => break DrainEnd::Eof,
            Err(err) => {
                tracing::warn!(error = %err, frames, "failed to receive from stream");
                break DrainEnd::Failed(err);
            }
        }
    };

    reader.close();
    tracing::trace!(frames, forwarded, end = ?end, "stream drained");

    DrainReport {
        frames,
        forwarded,
        end,
    }
}

/// A drain running as its own task.
#[derive(Debug)]
pub struct DrainHandle {
    handle: JoinHandle<DrainReport>,
}

impl DrainHandle {
    /// Waits for the drain to finish.
    ///
    /// Returns `None` if the task panicked or was aborted; the failure is
    /// logged.
    pub async fn join(self) -> Option<DrainReport> {
        match self.handle.await {
            Ok(report) => Some(report),
            Err(err) if err.is_panic() => {
                tracing::error!(error = %err, "stream drain task panicked");
                None
            }
            Err(err) => {
                tracing::warn!(error = %err, "stream drain task cancelled");
                None
            }
        }
    }

    /// Returns `true` once the drain task has finished.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Stops the drain. The reader is still closed when the task is dropped.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

/// Spawns [`drain`] on the current Tokio runtime.
///
/// # Panics
///
/// Panics if called outside a Tokio runtime.
pub fn spawn_drain<T, F>(reader: StreamReader<T>, observer: F) -> DrainHandle
where
    T: Frame + Send + 'static,
    F: FnMut(&str) -> ControlFlow<()> + Send + 'static,
{
    let span = tracing::debug_span!("stream_drain");
    DrainHandle {
        handle: tokio::spawn(drain(reader, observer).instrument(span)),
    }
}
