//! Tool registry.
//!
//! The [`ToolRegistry`] stores registered tools by name and dispatches
//! calls to them.
//!
//! # Usage
//!
//! ```ignore
//! use toolscope_tools::{ToolExt, ToolRegistry};
//!
//! let mut registry = ToolRegistry::new();
//! registry.register(QueryRestaurants::new(service).safe());
//!
//! let output = registry
//!     .execute(&scope, "query_restaurants", r#"{"location":"Beijing"}"#)
//!     .await?;
//! ```

use crate::error::ToolError;
use crate::safe::SafeTool;
use crate::tool::Tool;
use indexmap::IndexMap;
use std::sync::Arc;
use toolscope_context::CallScope;
use toolscope_models::ToolDefinition;

/// Registry of available tools.
///
/// Stores tools by name in registration order and provides lookup,
/// execution, and definition listing.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: IndexMap<String, Arc<dyn Tool>>,
}

impl core::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}

impl ToolRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tools: IndexMap::new(),
        }
    }

    /// Registers a tool as is.
    ///
    /// # Panics
    ///
    /// Panics if a tool with the same name is already registered.
    pub fn register(&mut self, tool: impl Tool) {
        let name = tool.definition().name;
        assert!(
            !self.tools.contains_key(&name),
            "Tool '{name}' is already registered"
        );
        self.tools.insert(name, Arc::new(tool));
    }

    /// Registers a tool wrapped in a [`SafeTool`].
    ///
    /// # Panics
    ///
    /// Panics if a tool with the same name is already registered.
    pub fn register_safe(&mut self, tool: impl Tool) {
        self.register(SafeTool::new(tool));
    }

    /// Executes a tool by name with JSON arguments.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::UnknownTool`] if no tool has this name, otherwise
    /// whatever the tool returns.
    pub async fn execute(
        &self,
        scope: &CallScope,
        name: &str,
        args: &str,
    ) -> Result<String, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::UnknownTool(name.to_string()))?;
        tool.execute(scope, args).await
    }

    /// Returns tool definitions for all registered tools.
    #[must_use]
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|tool| tool.definition()).collect()
    }

    /// Returns a shared handle to a tool by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Returns whether a tool with the given name is registered.
    #[must_use]
    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Returns the names of all registered tools.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(String::as_str).collect()
    }
}
