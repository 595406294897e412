//! Closable frame streams for toolscope.
//!
//! A stream is a live, ordered, non-restartable sequence of frames that ends
//! with end-of-stream or an error. Readers own a resource that must be
//! released exactly once; that is done by [`StreamReader::close`] or, on any
//! other exit path, by `Drop`.
//!
//! # Core Concepts
//!
//! - [`pipe`] - Creates a connected [`StreamWriter`] / [`StreamReader`] pair
//! - [`StreamReader::copy`] - Splits one stream into independent readers
//! - [`StreamCloser`] - Closes a reader from another task, waking a pending receive
//! - [`drain`] / [`spawn_drain`] - Consume a stream to its end, forwarding assistant text
//! - [`stream_has_tool_calls`] - Consume a stream until the first tool call
//!
//! # Example
//!
//! ```
//! use core::ops::ControlFlow;
//! use toolscope_models::Message;
//! use toolscope_stream::{StreamReader, drain};
//!
//! # tokio_test_block(async {
//! let reader = StreamReader::from_vec(vec![
//!     Message::assistant("A"),
//!     Message::assistant(""),
//!     Message::assistant("B"),
//! ]);
//!
//! let mut seen = Vec::new();
//! let report = drain(reader, |text| {
//!     seen.push(text.to_string());
//!     ControlFlow::Continue(())
//! })
//! .await;
//!
//! assert_eq!(seen, ["A", "B"]);
//! assert!(report.end.is_eof());
//! # });
//! # fn tokio_test_block(f: impl core::future::Future<Output = ()>) {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f);
//! # }
//! ```

pub mod check;
pub mod drain;
pub mod error;
pub mod frame;
pub mod reader;

pub use check::stream_has_tool_calls;
pub use drain::{DrainEnd, DrainHandle, DrainReport, drain, spawn_drain};
pub use error::StreamError;
pub use frame::Frame;
pub use reader::{StreamCloser, StreamReader, StreamWriter, pipe};
