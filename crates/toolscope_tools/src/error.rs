//! Error types for tool execution.

use thiserror::Error;

/// Errors that can occur during tool execution.
///
/// Errors fall into two classes. Caller misuse ([`InvalidArguments`],
/// [`UnknownTool`]) is always propagated. Operational failures
/// ([`Execution`], [`Serialization`]) are what [`SafeTool`] downgrades to
/// text.
///
/// [`InvalidArguments`]: Self::InvalidArguments
/// [`UnknownTool`]: Self::UnknownTool
/// [`Execution`]: Self::Execution
/// [`Serialization`]: Self::Serialization
/// [`SafeTool`]: crate::SafeTool
#[derive(Debug, Error)]
pub enum ToolError {
    /// The JSON arguments could not be decoded.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// The tool ran and failed.
    ///
    /// Displays as the bare message so it can be handed to the model as is.
    #[error("{0}")]
    Execution(String),

    /// No tool with this name is registered.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// The tool's result could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ToolError {
    /// Creates an [`InvalidArguments`](Self::InvalidArguments).
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Creates an [`Execution`](Self::Execution).
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }

    /// Returns `true` for errors caused by the caller rather than by the tool.
    #[must_use]
    pub fn is_argument_error(&self) -> bool {
        matches!(self, Self::InvalidArguments(_) | Self::UnknownTool(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execution_displays_bare_message() {
        assert_eq!(ToolError::execution("unavailable").to_string(), "unavailable");
    }

    #[test]
    fn classification() {
        assert!(ToolError::invalid_arguments("bad").is_argument_error());
        assert!(ToolError::UnknownTool("x".into()).is_argument_error());
        assert!(!ToolError::execution("boom").is_argument_error());

        let serde_err = serde_json::from_str::<u8>("\"x\"").unwrap_err();
        assert!(!ToolError::from(serde_err).is_argument_error());
    }
}
