//! The core [`Tool`] trait for executable tools.

use crate::error::ToolError;
use crate::safe::SafeTool;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use toolscope_context::CallScope;
use toolscope_models::ToolDefinition;

/// Future returned by [`Tool::execute`].
pub type ToolFuture<'a> = Pin<Box<dyn Future<Output = Result<String, ToolError>> + Send + 'a>>;

/// A tool that can be invoked by an LLM agent.
///
/// Tools expose a [`ToolDefinition`] (name, description, JSON schema) for the
/// model, and an async [`execute`](Tool::execute) method that receives the
/// raw JSON arguments and the scope of the current call.
pub trait Tool: Send + Sync + 'static {
    /// Returns the LLM-facing tool definition with JSON schema.
    fn definition(&self) -> ToolDefinition;

    /// Executes the tool with JSON arguments.
    fn execute<'a>(&'a self, scope: &'a CallScope, args: &'a str) -> ToolFuture<'a>;
}

impl<T: Tool + ?Sized> Tool for Arc<T> {
    fn definition(&self) -> ToolDefinition {
        (**self).definition()
    }

    fn execute<'a>(&'a self, scope: &'a CallScope, args: &'a str) -> ToolFuture<'a> {
        (**self).execute(scope, args)
    }
}

impl<T: Tool + ?Sized> Tool for Box<T> {
    fn definition(&self) -> ToolDefinition {
        (**self).definition()
    }

    fn execute<'a>(&'a self, scope: &'a CallScope, args: &'a str) -> ToolFuture<'a> {
        (**self).execute(scope, args)
    }
}

/// Extension methods available on every [`Tool`].
pub trait ToolExt: Tool + Sized {
    /// Wraps the tool in a [`SafeTool`].
    fn safe(self) -> SafeTool<Self> {
        SafeTool::new(self)
    }
}

impl<T: Tool> ToolExt for T {}
