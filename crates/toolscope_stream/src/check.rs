//! Tool-call detection over a model stream.

use crate::error::StreamError;
use crate::frame::Frame;
use crate::reader::StreamReader;

/// Reads `reader` until a frame requests a tool call.
///
/// Returns `true` at the first such frame and `false` at end-of-stream.
/// The reader is closed on return either way.
///
/// # Errors
///
/// Propagates the first stream error.
pub async fn stream_has_tool_calls<T: Frame>(
    mut reader: StreamReader<T>,
) -> Result<bool, StreamError> {
    let found = loop {
        match reader.recv().await {
            Ok(Some(frame)) if frame.has_tool_calls() => break Ok(true),
            Ok(Some(_)) => {}
            Ok(None) => break Ok(false),
            Err(err) => break Err(err),
        }
    };
    reader.close();
    found
}
