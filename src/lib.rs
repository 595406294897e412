//! Execution-state tracking and stream observability for tool-calling agents.
//!
//! A [`CallScope`](prelude::CallScope) carries a per-call
//! [`ExecutionState`](prelude::ExecutionState) from a lifecycle callback into
//! a [`SafeTool`](prelude::SafeTool), which turns operational failures into
//! ordinary text so the agent loop keeps going. Chat model streams are split
//! so a display drain and a tool-call checker read at their own pace.

pub use toolscope_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use toolscope_internal::prelude::*;
}
