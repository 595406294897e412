//! Stream errors.

use thiserror::Error;

/// Terminal stream errors.
///
/// End-of-stream is not an error; [`StreamReader::recv`] reports it as
/// `Ok(None)`.
///
/// [`StreamReader::recv`]: crate::StreamReader::recv
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StreamError {
    /// The reader was closed, or the other end went away.
    #[error("stream closed")]
    Closed,

    /// The producer reported a failure mid-stream.
    #[error("stream source error: {0}")]
    Source(String),
}

impl StreamError {
    /// Creates a [`Source`](Self::Source) error.
    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }
}
