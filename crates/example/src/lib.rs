//! Example restaurant-recommendation agent wired through toolscope hooks.
//!
//! The agent alternates model turns and tool calls. Every step passes
//! through a [`CallbackManager`](toolscope_callbacks::CallbackManager) with
//! [`ObservabilityHooks`](toolscope_callbacks::ObservabilityHooks)
//! registered, so the terminal shows each tool call's arguments, a preview
//! of its result and whether it succeeded, plus the model's text as it
//! streams.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  ReAct Loop                                                      │
//! │                                                                  │
//! │  ScriptedModel::stream ──► observe_model_stream ──► hooks drain  │
//! │                                  │                               │
//! │                         copy ────┴──── copy                      │
//! │                          │               │                       │
//! │            stream_has_tool_calls    collect_reply                │
//! │                          │                                       │
//! │                 yes ─────┴───── no ──► final answer              │
//! │                  │                                               │
//! │        run_tool(SafeTool) ──► tool result ──► next turn          │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The restaurant service fails transiently at a configurable rate. Those
//! failures come back to the model as a retryable fault payload instead of
//! aborting the run, and the hooks report the call as failed.

pub mod agent;
pub mod cli;
pub mod console;
pub mod model;
pub mod tools;

pub use agent::{AgentError, ReactAgent};
pub use cli::{CliArgs, CliError, USAGE};
pub use console::ConsoleReporter;
pub use model::{ScriptedModel, collect_reply};

/// System prompt opening every conversation.
pub const SYSTEM_PROMPT: &str = "You help users pick restaurants and dishes. \
Look up restaurants first, then the dishes of the best one.";
