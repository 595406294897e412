//! Message and tool descriptor types.
//!
//! These are the narrow shapes `toolscope` consumes from the surrounding
//! agent framework: the descriptor a tool reports about itself, and the
//! message chunks a chat model streams back.

pub mod message;
pub mod tool;

pub use message::{Message, Role, ToolCall, ToolFunction};
pub use tool::ToolDefinition;
