//! Stream reader and writer halves.
//!
//! # Lifecycle
//!
//! ```text
//! pipe(cap) ──► StreamWriter ── send / send_error ──► StreamReader ── recv
//!                    │                                   │
//!                 drop = EOF                     close / Drop (exactly once)
//!                                                        ▲
//!                                               StreamCloser::close (any task)
//! ```
//!
//! Closing a reader wakes a pending [`recv`](StreamReader::recv) with
//! [`StreamError::Closed`], runs the registered close hooks once, and makes
//! the writer's sends fail with [`StreamError::Closed`].
//!
//! A source error is terminal: the reader closes itself after returning it,
//! so frames queued behind the error are never delivered.

use crate::error::StreamError;
use futures::future::join_all;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

type Item<T> = Result<T, StreamError>;

/// Receiving side, bounded for pipes and unbounded for copies.
enum Source<T> {
    Bounded(mpsc::Receiver<Item<T>>),
    Unbounded(mpsc::UnboundedReceiver<Item<T>>),
}

impl<T> Source<T> {
    async fn recv(&mut self) -> Option<Item<T>> {
        match self {
            Self::Bounded(rx) => rx.recv().await,
            Self::Unbounded(rx) => rx.recv().await,
        }
    }

    fn close(&mut self) {
        match self {
            Self::Bounded(rx) => rx.close(),
            Self::Unbounded(rx) => rx.close(),
        }
    }
}

/// Creates a connected writer/reader pair buffering up to `capacity` frames.
///
/// A `capacity` of zero is treated as one.
#[must_use]
pub fn pipe<T>(capacity: usize) -> (StreamWriter<T>, StreamReader<T>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        StreamWriter { tx },
        StreamReader::from_source(Source::Bounded(rx)),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// StreamWriter
// ─────────────────────────────────────────────────────────────────────────────

/// Producing half of a [`pipe`].
///
/// Dropping the writer (or calling [`close`](Self::close)) ends the stream;
/// the reader then sees end-of-stream after the buffered frames.
#[derive(Debug)]
pub struct StreamWriter<T> {
    tx: mpsc::Sender<Item<T>>,
}

impl<T> Clone for StreamWriter<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> StreamWriter<T> {
    /// Sends a frame, waiting for buffer space.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Closed`] if the reader has been closed.
    pub async fn send(&self, frame: T) -> Result<(), StreamError> {
        self.tx
            .send(Ok(frame))
            .await
            .map_err(|_| StreamError::Closed)
    }

    /// Ends the stream with an error.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Closed`] if the reader has been closed.
    pub async fn send_error(self, error: impl Into<String>) -> Result<(), StreamError> {
        self.tx
            .send(Err(StreamError::source(error)))
            .await
            .map_err(|_| StreamError::Closed)
    }

    /// Returns `true` once the reader has been closed or dropped.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Waits until the reader has been closed or dropped.
    pub async fn closed(&self) {
        self.tx.closed().await;
    }

    /// Ends the stream normally.
    pub fn close(self) {}
}

// ─────────────────────────────────────────────────────────────────────────────
// StreamCloser
// ─────────────────────────────────────────────────────────────────────────────

/// Handle that closes a [`StreamReader`] from elsewhere.
///
/// A receive that is pending when the closer fires returns
/// [`StreamError::Closed`] immediately.
#[derive(Debug, Clone)]
pub struct StreamCloser {
    token: CancellationToken,
}

impl StreamCloser {
    /// Requests the reader to close.
    pub fn close(&self) {
        self.token.cancel();
    }

    /// Returns `true` if a close has been requested.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// StreamReader
// ─────────────────────────────────────────────────────────────────────────────

/// Consuming half of a stream.
///
/// The reader owns the stream's resources. They are released exactly once:
/// by [`close`](Self::close), by a [`StreamCloser`] followed by the next
/// receive, or by `Drop`, whichever comes first.
pub struct StreamReader<T> {
    /// `None` once closed.
    source: Option<Source<T>>,
    token: CancellationToken,
    on_close: Vec<Box<dyn FnOnce() + Send>>,
}

impl<T> core::fmt::Debug for StreamReader<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StreamReader")
            .field("closed", &self.is_closed())
            .field("close_hooks", &self.on_close.len())
            .finish()
    }
}

impl<T> StreamReader<T> {
    fn from_source(source: Source<T>) -> Self {
        Self {
            source: Some(source),
            token: CancellationToken::new(),
            on_close: Vec::new(),
        }
    }

    /// Creates a reader over a fixed sequence of items.
    ///
    /// The stream ends after the last item. An `Err` item terminates the
    /// stream at that point, as a producer-side failure would.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = Result<T, StreamError>>) -> Self {
        let items: Vec<_> = items.into_iter().collect();
        let (tx, rx) = mpsc::channel(items.len().max(1));
        for item in items {
            let terminal = item.is_err();
            if tx.try_send(item).is_err() || terminal {
                break;
            }
        }
        Self::from_source(Source::Bounded(rx))
    }

    /// Creates a reader over a fixed sequence of frames.
    #[must_use]
    pub fn from_vec(frames: Vec<T>) -> Self {
        Self::from_items(frames.into_iter().map(Ok))
    }

    /// Receives the next frame.
    ///
    /// Returns `Ok(None)` at end-of-stream.
    ///
    /// # Errors
    ///
    /// - [`StreamError::Source`] if the producer reported a failure. The
    ///   reader is closed before returning, so later calls return
    ///   [`StreamError::Closed`]
    /// - [`StreamError::Closed`] if the reader was closed, including by a
    ///   [`StreamCloser`] while this call was pending
    pub async fn recv(&mut self) -> Result<Option<T>, StreamError> {
        let received = {
            let Some(source) = self.source.as_mut() else {
                return Err(StreamError::Closed);
            };
            tokio::select! {
                biased;
                () = self.token.cancelled() => None,
                item = source.recv() => Some(item),
            }
        };

        match received {
            None => {
                self.close();
                Err(StreamError::Closed)
            }
            Some(Some(Ok(frame))) => Ok(Some(frame)),
            Some(Some(Err(err))) => {
                self.close();
                Err(err)
            }
            Some(None) => Ok(None),
        }
    }

    /// Returns a handle that can close this reader from another task.
    #[must_use]
    pub fn closer(&self) -> StreamCloser {
        StreamCloser {
            token: self.token.clone(),
        }
    }

    /// Registers a hook to run when the reader is closed.
    ///
    /// Hooks run once, in registration order. Registering on an already
    /// closed reader runs the hook immediately.
    pub fn on_close(&mut self, hook: impl FnOnce() + Send + 'static) {
        if self.source.is_none() {
            hook();
        } else {
            self.on_close.push(Box::new(hook));
        }
    }

    /// Returns `true` once the reader has released its resources.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.source.is_none()
    }

    /// Releases the stream. Calling it again is a no-op.
    pub fn close(&mut self) {
        let Some(mut source) = self.source.take() else {
            return;
        };
        source.close();
        self.token.cancel();
        for hook in self.on_close.drain(..) {
            hook();
        }
    }
}

impl<T: Send + 'static> StreamReader<T> {
    /// Splits the stream into `n` independent readers.
    ///
    /// Each copy sees every frame in order and buffers without bound, so a
    /// slow copy never holds back the others. The original stream is closed
    /// when it ends or when every copy has been closed.
    ///
    /// Outside a Tokio runtime with `n > 1` the original stream is closed
    /// and every copy yields [`StreamError::Closed`].
    #[must_use]
    pub fn copy(self, n: usize) -> Vec<StreamReader<T>>
    where
        T: Clone,
    {
        match n {
            0 => Vec::new(),
            1 => vec![self],
            _ => forward(self, n, |frame: &T| frame.clone()),
        }
    }

    /// Converts every frame with `convert`.
    ///
    /// Outside a Tokio runtime the stream is closed and the converted
    /// reader yields [`StreamError::Closed`].
    #[must_use]
    pub fn map<U, F>(self, convert: F) -> StreamReader<U>
    where
        U: Send + 'static,
        F: Fn(&T) -> U + Send + 'static,
    {
        forward(self, 1, convert)
            .pop()
            .unwrap_or_else(|| StreamReader::from_items([]))
    }
}

impl<T> Drop for StreamReader<T> {
    fn drop(&mut self) {
        self.close();
    }
}

/// Spawns a task pumping `source` into `n` unbounded readers.
///
/// Without a runtime to spawn on, `source` is closed and each reader
/// receives [`StreamError::Closed`].
fn forward<T, U, F>(mut source: StreamReader<T>, n: usize, convert: F) -> Vec<StreamReader<U>>
where
    T: Send + 'static,
    U: Send + 'static,
    F: Fn(&T) -> U + Send + 'static,
{
    let (senders, readers): (Vec<_>, Vec<_>) = (0..n)
        .map(|_| {
            let (tx, rx) = mpsc::unbounded_channel();
            (tx, StreamReader::from_source(Source::Unbounded(rx)))
        })
        .collect();

    let Ok(handle) = Handle::try_current() else {
        tracing::warn!(copies = n, "no Tokio runtime to forward stream on, closing it");
        source.close();
        for tx in &senders {
            let _ = tx.send(Err(StreamError::Closed));
        }
        return readers;
    };

    handle.spawn(async move {
        loop {
            let received = tokio::select! {
                biased;
                _ = join_all(senders.iter().map(mpsc::UnboundedSender::closed)) => break,
                received = source.recv() => received,
            };
            match received {
                Ok(Some(frame)) => {
                    for tx in &senders {
                        let _ = tx.send(Ok(convert(&frame)));
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    for tx in &senders {
                        let _ = tx.send(Err(err.clone()));
                    }
                    break;
                }
            }
        }
        source.close();
    });

    readers
}
