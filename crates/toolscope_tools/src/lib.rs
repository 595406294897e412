//! Tool framework for toolscope.
//!
//! This crate defines what a tool is and how its failures are surfaced.
//!
//! # Architecture
//!
//! - [`Tool`] - trait for executable tools: a descriptor plus an async
//!   `execute(scope, args)`
//! - [`SafeTool`] - decorator that records the outcome into the call's
//!   [`ExecutionState`](toolscope_context::ExecutionState) and turns
//!   operational failures into ordinary text the model can react to
//! - [`FaultInjector`] - seeded, probability-driven transient failures for
//!   exercising retry paths
//! - [`ToolRegistry`] - stores and dispatches tools by name
//! - [`decode_args`] / [`encode_output`] - JSON helpers with the right
//!   error classification
//!
//! # Quick Start
//!
//! ```ignore
//! use toolscope_tools::{Tool, ToolExt, ToolRegistry};
//!
//! let mut registry = ToolRegistry::new();
//! registry.register(MyTool.safe());
//!
//! let output = registry.execute(&scope, "my_tool", r#"{"q":"x"}"#).await?;
//! ```

pub mod args;
pub mod error;
pub mod fault;
pub mod registry;
pub mod safe;
pub mod tool;

// Re-export core types at crate root.
pub use args::{decode_args, encode_output};
pub use error::ToolError;
pub use fault::{FaultInjector, TransientFault};
pub use registry::ToolRegistry;
pub use safe::SafeTool;
pub use tool::{Tool, ToolExt, ToolFuture};
