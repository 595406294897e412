//! Integration tests for the `toolscope_tools` crate.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use toolscope_context::{CallScope, ExecutionState, bind_state};
use toolscope_models::ToolDefinition;
use toolscope_tools::{
    FaultInjector, SafeTool, Tool, ToolError, ToolExt, ToolFuture, ToolRegistry, TransientFault,
    decode_args, encode_output,
};

// ─────────────────────────────────────────────────────────────────────
// Fixtures
// ─────────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CountParams {
    kind: String,
}

#[derive(Serialize)]
struct CountResult {
    kind: String,
    count: usize,
}

/// Counts items of a kind; fails for the kind "offline".
struct CountTool {
    faults: FaultInjector,
}

impl CountTool {
    fn reliable() -> Self {
        Self {
            faults: FaultInjector::disabled(),
        }
    }

    fn flaky(seed: u64) -> Self {
        Self {
            faults: FaultInjector::with_probability(0.5).with_seed(seed),
        }
    }
}

impl Tool for CountTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            "count_items",
            "Counts items of a kind.",
            serde_json::json!({
                "type": "object",
                "properties": { "kind": { "type": "string" } },
                "required": ["kind"]
            }),
        )
    }

    fn execute<'a>(&'a self, _scope: &'a CallScope, args: &'a str) -> ToolFuture<'a> {
        Box::pin(async move {
            let params: CountParams = decode_args(args)?;
            self.faults.check()?;
            if params.kind == "offline" {
                return Err(ToolError::execution("unavailable"));
            }
            encode_output(&CountResult {
                kind: params.kind,
                count: 42,
            })
        })
    }
}

fn bound_scope() -> (Arc<ExecutionState>, CallScope) {
    let state = Arc::new(ExecutionState::new());
    let scope = bind_state(&CallScope::new(), Arc::clone(&state));
    (state, scope)
}

// ─────────────────────────────────────────────────────────────────────
// 1. Unwrapped tool behaviour
// ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn raw_tool_propagates_execution_errors() {
    let tool = CountTool::reliable();
    let err = tool
        .execute(&CallScope::new(), r#"{"kind":"offline"}"#)
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::Execution(_)));
}

// ─────────────────────────────────────────────────────────────────────
// 2. SafeTool
// ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn safe_tool_success_records_true() {
    let tool = CountTool::reliable().safe();
    let (state, scope) = bound_scope();

    let out = tool.execute(&scope, r#"{"kind":"dish"}"#).await.unwrap();

    assert_eq!(out, r#"{"kind":"dish","count":42}"#);
    assert!(state.success());
}

#[tokio::test]
async fn safe_tool_failure_returns_message_and_records_false() {
    let tool = CountTool::reliable().safe();
    let (state, scope) = bound_scope();

    let out = tool.execute(&scope, r#"{"kind":"offline"}"#).await.unwrap();

    assert_eq!(out, "unavailable");
    assert_eq!(state.outcome(), Some(false));
}

#[tokio::test]
async fn safe_tool_malformed_json_is_a_genuine_error() {
    let tool = CountTool::reliable().safe();
    let (state, scope) = bound_scope();

    let err = tool.execute(&scope, "{not json").await.unwrap_err();

    assert!(err.is_argument_error(), "got: {err:?}");
    assert!(!state.is_recorded());
}

#[tokio::test]
async fn safe_tool_surfaces_injected_fault_as_retryable_text() {
    let tool = SafeTool::new(CountTool {
        faults: FaultInjector::with_probability(1.0),
    });
    let (state, scope) = bound_scope();

    let out = tool.execute(&scope, r#"{"kind":"dish"}"#).await.unwrap();

    let fault = TransientFault::parse(&out).expect("fault payload");
    assert!(fault.should_retry());
    assert!(!state.success());
}

#[tokio::test]
async fn state_tracks_each_flaky_call_independently() {
    let tool = CountTool::flaky(3).safe();
    let mut saw_success = false;
    let mut saw_failure = false;

    for _ in 0..32 {
        let (state, scope) = bound_scope();
        let out = tool.execute(&scope, r#"{"kind":"dish"}"#).await.unwrap();
        let faulted = TransientFault::parse(&out).is_some();

        assert_eq!(state.success(), !faulted);
        saw_success |= !faulted;
        saw_failure |= faulted;
    }

    assert!(saw_success && saw_failure);
}

// ─────────────────────────────────────────────────────────────────────
// 3. ToolRegistry
// ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn registry_register_get_has_names() {
    let mut registry = ToolRegistry::new();
    registry.register_safe(CountTool::reliable());

    assert!(registry.has("count_items"));
    assert!(!registry.has("nonexistent"));
    assert!(registry.get("count_items").is_some());
    assert!(registry.get("nonexistent").is_none());
    assert_eq!(registry.names(), vec!["count_items"]);
    assert_eq!(registry.definitions()[0].description, "Counts items of a kind.");
}

#[tokio::test]
async fn registry_execute_by_name_downgrades_through_safe_wrapper() {
    let mut registry = ToolRegistry::new();
    registry.register_safe(CountTool::reliable());
    let (state, scope) = bound_scope();

    let out = registry
        .execute(&scope, "count_items", r#"{"kind":"offline"}"#)
        .await
        .unwrap();

    assert_eq!(out, "unavailable");
    assert!(!state.success());
}

#[tokio::test]
async fn registry_unknown_tool_error() {
    let registry = ToolRegistry::new();
    let err = registry
        .execute(&CallScope::new(), "nonexistent", "{}")
        .await
        .unwrap_err();
    assert!(matches!(err, ToolError::UnknownTool(ref name) if name == "nonexistent"));
}

#[test]
#[should_panic(expected = "already registered")]
fn registry_duplicate_registration_panics() {
    let mut registry = ToolRegistry::new();
    registry.register(CountTool::reliable());
    registry.register_safe(CountTool::reliable());
}

#[test]
fn registry_debug_lists_names() {
    let mut registry = ToolRegistry::new();
    registry.register(CountTool::reliable());
    assert!(format!("{registry:?}").contains("count_items"));
}
