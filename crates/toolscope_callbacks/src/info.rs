//! Identity of the component a callback fires for.

use core::fmt;

/// Kind of component being run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// A chat model call.
    ChatModel,
    /// A tool call.
    Tool,
    /// Anything else the dispatcher runs (templates, retrievers, graphs).
    Other(String),
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChatModel => f.write_str("ChatModel"),
            Self::Tool => f.write_str("Tool"),
            Self::Other(kind) => f.write_str(kind),
        }
    }
}

/// Describes one run of a component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunInfo {
    /// What kind of component is running.
    pub component: ComponentKind,
    /// Implementation type, e.g. the model provider or tool struct name.
    pub run_type: String,
    /// Instance name, e.g. the tool name.
    pub name: String,
}

impl RunInfo {
    /// Creates run info for a tool call.
    #[must_use]
    pub fn tool(name: impl Into<String>) -> Self {
        Self {
            component: ComponentKind::Tool,
            run_type: String::new(),
            name: name.into(),
        }
    }

    /// Creates run info for a chat model call.
    #[must_use]
    pub fn chat_model(name: impl Into<String>) -> Self {
        Self {
            component: ComponentKind::ChatModel,
            run_type: String::new(),
            name: name.into(),
        }
    }

    /// Creates run info for any other component.
    #[must_use]
    pub fn other(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            component: ComponentKind::Other(kind.into()),
            run_type: String::new(),
            name: name.into(),
        }
    }

    /// Sets the implementation type.
    #[must_use]
    pub fn with_run_type(mut self, run_type: impl Into<String>) -> Self {
        self.run_type = run_type.into();
        self
    }
}

impl fmt::Display for RunInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.component, self.run_type, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_joins_kind_type_and_name() {
        let info = RunInfo::tool("query_dishes").with_run_type("QueryDishes");
        assert_eq!(info.to_string(), "Tool:QueryDishes:query_dishes");
    }

    #[test]
    fn other_kind_displays_its_label() {
        assert_eq!(RunInfo::other("Lambda", "x").component.to_string(), "Lambda");
    }
}
