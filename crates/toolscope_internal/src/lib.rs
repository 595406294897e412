//! # toolscope Internal Library
//!
//! Re-exports the toolscope crates for convenience.

/// Layer 1: Call scopes and per-call execution state.
pub use toolscope_context;

/// Layer 1: Chat messages and tool descriptors.
pub use toolscope_models;

/// Layer 1: Logging setup.
pub use toolscope_core;

/// Layer 2: Tool trait, error-downgrading wrapper, registry.
pub use toolscope_tools;

/// Layer 2: Closable streams, copies and drains.
pub use toolscope_stream;

/// Layer 3: Lifecycle callbacks and observability hooks.
pub use toolscope_callbacks;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use toolscope_callbacks::{
        CallbackHandler, CallbackInput, CallbackManager, CallbackOutput, ComponentKind,
        HooksConfig, ObservabilityHooks, Reporter, RunInfo, ToolOutcome,
    };
    pub use toolscope_context::{CallScope, ExecutionState, bind_state, lookup_state};
    pub use toolscope_core::{TracingFormat, TracingSetup};
    pub use toolscope_models::{Message, Role, ToolCall, ToolDefinition};
    pub use toolscope_stream::{
        Frame, StreamError, StreamReader, StreamWriter, pipe, spawn_drain, stream_has_tool_calls,
    };
    pub use toolscope_tools::{
        FaultInjector, SafeTool, Tool, ToolError, ToolExt, ToolFuture, ToolRegistry,
        decode_args, encode_output,
    };
}
