//! Tool descriptors.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Definition of a tool that can be called by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Name of the tool (e.g., `query_restaurants`).
    pub name: String,
    /// Human-readable description of what the tool does.
    pub description: String,
    /// JSON Schema defining the tool's parameters.
    ///
    /// The schema is owned by the tool; `toolscope` never inspects it.
    pub parameters: Value,
}

impl ToolDefinition {
    /// Creates a definition.
    #[must_use]
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }
}
