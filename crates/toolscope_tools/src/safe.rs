//! Outcome-recording, error-downgrading tool decorator.
//!
//! Downstream consumers of a tool treat any non-error return as content and
//! any error as fatal to the whole run. [`SafeTool`] keeps operational
//! failures on the content path: the error message becomes the tool's
//! output so the model can read it and decide to retry or switch tools.
//! The true outcome is not lost; it is recorded into the call's
//! [`ExecutionState`] for whoever reports on the call.
//!
//! | Delegate result | Returned | `ExecutionState` |
//! |-----------------|----------|------------------|
//! | `Ok(payload)` | `Ok(payload)` | success |
//! | operational `Err(e)` | `Ok(e.to_string())` | failure |
//! | argument `Err(e)` | `Err(e)` | untouched |

use crate::error::ToolError;
use crate::tool::{Tool, ToolFuture};
use toolscope_context::{CallScope, ExecutionState, lookup_state};
use toolscope_models::ToolDefinition;

/// Wraps any [`Tool`], recording its outcome and downgrading operational
/// failures to text.
///
/// # Example
///
/// ```ignore
/// let tool = SafeTool::new(QueryRestaurants::default());
/// let scope = bind_state(&CallScope::new(), Arc::clone(&state));
///
/// // Never an `Err` for an operational failure.
/// let payload = tool.execute(&scope, r#"{"location":"Beijing"}"#).await?;
/// println!("succeeded: {}", state.success());
/// ```
#[derive(Debug, Clone)]
pub struct SafeTool<T> {
    inner: T,
}

impl<T: Tool> SafeTool<T> {
    /// Wraps `inner`.
    #[must_use]
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Returns the wrapped tool.
    #[must_use]
    pub fn inner(&self) -> &T {
        &self.inner
    }

    /// Unwraps the decorator.
    #[must_use]
    pub fn into_inner(self) -> T {
        self.inner
    }

    /// Executes the tool, recording the outcome into an explicitly passed state.
    ///
    /// Same contract as [`Tool::execute`], for callers that thread the state
    /// themselves instead of binding it into the scope.
    ///
    /// # Errors
    ///
    /// Only argument errors are returned; see the module docs.
    pub async fn execute_with_state(
        &self,
        scope: &CallScope,
        args: &str,
        state: &ExecutionState,
    ) -> Result<String, ToolError> {
        let result = self.inner.execute(scope, args).await;
        settle(&self.inner.definition().name, Some(state), result)
    }
}

impl<T: Tool> Tool for SafeTool<T> {
    fn definition(&self) -> ToolDefinition {
        self.inner.definition()
    }

    fn execute<'a>(&'a self, scope: &'a CallScope, args: &'a str) -> ToolFuture<'a> {
        Box::pin(async move {
            let result = self.inner.execute(scope, args).await;
            let state = lookup_state(scope);
            settle(&self.inner.definition().name, state.as_deref(), result)
        })
    }
}

fn settle(
    tool: &str,
    state: Option<&ExecutionState>,
    result: Result<String, ToolError>,
) -> Result<String, ToolError> {
    match result {
        Err(err) if err.is_argument_error() => Err(err),
        Ok(payload) => {
            if let Some(state) = state {
                state.record(true);
            }
            Ok(payload)
        }
        Err(err) => {
            if let Some(state) = state {
                state.record(false);
            }
            tracing::debug!(tool, error = %err, "tool failed, returning error as content");
            Ok(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use toolscope_context::bind_state;

    /// Returns a fixed result.
    struct Fixed(fn() -> Result<String, ToolError>);

    impl Tool for Fixed {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new("fixed", "Returns a fixed result.", serde_json::json!({}))
        }

        fn execute<'a>(&'a self, _scope: &'a CallScope, _args: &'a str) -> ToolFuture<'a> {
            Box::pin(async move { (self.0)() })
        }
    }

    fn bound() -> (Arc<ExecutionState>, CallScope) {
        let state = Arc::new(ExecutionState::new());
        let scope = bind_state(&CallScope::new(), Arc::clone(&state));
        (state, scope)
    }

    #[tokio::test]
    async fn success_passes_payload_through() {
        let tool = SafeTool::new(Fixed(|| Ok("42 items".to_string())));
        let (state, scope) = bound();

        let out = tool.execute(&scope, "{}").await.unwrap();

        assert_eq!(out, "42 items");
        assert_eq!(state.outcome(), Some(true));
    }

    #[tokio::test]
    async fn execution_error_becomes_payload() {
        let tool = SafeTool::new(Fixed(|| Err(ToolError::execution("unavailable"))));
        let (state, scope) = bound();

        let out = tool.execute(&scope, "{}").await.unwrap();

        assert_eq!(out, "unavailable");
        assert_eq!(state.outcome(), Some(false));
    }

    #[tokio::test]
    async fn argument_error_is_propagated_and_state_untouched() {
        let tool = SafeTool::new(Fixed(|| Err(ToolError::invalid_arguments("bad json"))));
        let (state, scope) = bound();

        let err = tool.execute(&scope, "{not json").await.unwrap_err();

        assert!(matches!(err, ToolError::InvalidArguments(_)));
        assert!(!state.is_recorded());
        assert!(!state.success());
    }

    #[tokio::test]
    async fn missing_state_is_a_silent_no_op() {
        let tool = SafeTool::new(Fixed(|| Err(ToolError::execution("down"))));
        let out = tool.execute(&CallScope::new(), "{}").await.unwrap();
        assert_eq!(out, "down");
    }

    #[tokio::test]
    async fn explicit_state_threading() {
        let tool = SafeTool::new(Fixed(|| Ok("ok".to_string())));
        let state = ExecutionState::new();

        let out = tool
            .execute_with_state(&CallScope::new(), "{}", &state)
            .await
            .unwrap();

        assert_eq!(out, "ok");
        assert!(state.success());
    }

    #[test]
    fn definition_is_pass_through() {
        let tool = SafeTool::new(Fixed(|| Ok(String::new())));
        assert_eq!(tool.definition(), tool.inner().definition());
    }
}
