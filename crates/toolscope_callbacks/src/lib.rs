//! Lifecycle callbacks for tool and model calls.
//!
//! A dispatcher calls [`CallbackHandler`] methods around every component it
//! runs. [`ObservabilityHooks`] is the handler that ties the pieces of
//! `toolscope` together:
//!
//! ```text
//! on_start(tool)  ── creates ExecutionState, binds it into the scope ──┐
//!                                                                      ▼
//!                                   SafeTool::execute(scope') records success
//!                                                                      │
//! on_end(tool)    ◄── reads ExecutionState through the same scope ─────┘
//!
//! on_end_with_stream_output(chat model) ── spawns a drain of its own copy
//! ```
//!
//! [`CallbackManager`] plays the dispatcher: it holds named handlers, threads
//! the scope through them, and gives each handler its own copy of a stream.
//!
//! # Feature Flags
//!
//! - `test-utils` - Enables [`testing::RecordingReporter`] and
//!   [`testing::RecordingHandler`]

pub mod handler;
pub mod info;
pub mod manager;
pub mod observability;
pub mod preview;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use handler::{CallbackHandler, CallbackInput, CallbackOutput};
pub use info::{ComponentKind, RunInfo};
pub use manager::{CallbackManager, RegistrationError};
pub use observability::{
    CallPhase, HooksConfig, ObservabilityHooks, Reporter, ToolOutcome, TracingReporter,
};
