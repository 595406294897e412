//! End-to-end tool and model lifecycles through a [`CallbackManager`].

use std::sync::Arc;
use toolscope_callbacks::testing::{RecordingHandler, RecordingReporter, ReportEvent};
use toolscope_callbacks::{
    CallbackHandler, CallbackManager, ComponentKind, ObservabilityHooks, RunInfo, ToolOutcome,
};
use toolscope_context::CallScope;
use toolscope_models::{Message, ToolCall, ToolDefinition};
use toolscope_stream::{StreamError, pipe, stream_has_tool_calls};
use toolscope_tools::{Tool, ToolError, ToolExt, ToolFuture, decode_args};

// ─────────────────────────────────────────────────────────────────────
// Fixtures
// ─────────────────────────────────────────────────────────────────────

/// Answers `{"count": n}` with `"<n> items"`; fails when `n` is negative.
struct Inventory;

impl Tool for Inventory {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new("inventory", "Counts items.", serde_json::json!({}))
    }

    fn execute<'a>(&'a self, _scope: &'a CallScope, args: &'a str) -> ToolFuture<'a> {
        Box::pin(async move {
            let args: serde_json::Value = decode_args(args)?;
            match args["count"].as_i64() {
                Some(n) if n >= 0 => Ok(format!("{n} items")),
                _ => Err(ToolError::execution("unavailable")),
            }
        })
    }
}

fn observed() -> (
    CallbackManager,
    Arc<ObservabilityHooks<RecordingReporter>>,
    Arc<RecordingHandler>,
) {
    let hooks = Arc::new(ObservabilityHooks::with_reporter(
        RecordingReporter::default(),
    ));
    let recorder = Arc::new(RecordingHandler::default());
    let manager = CallbackManager::new();
    manager
        .register_shared("observability", Arc::clone(&hooks) as Arc<dyn CallbackHandler>)
        .unwrap()
        .register_shared("recorder", Arc::clone(&recorder) as Arc<dyn CallbackHandler>)
        .unwrap();
    (manager, hooks, recorder)
}

// ─────────────────────────────────────────────────────────────────────
// Tool calls
// ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn successful_call_ends_succeeded() {
    let (manager, hooks, _) = observed();
    let tool = Inventory.safe();

    let out = manager
        .run_tool(&CallScope::new(), &RunInfo::tool("inventory"), &tool, r#"{"count":42}"#)
        .await
        .unwrap();

    assert_eq!(out, "42 items");
    assert_eq!(
        hooks.reporter().events(),
        [
            ReportEvent::ToolStarted {
                name: "inventory".into(),
                arguments: r#"{"count":42}"#.into(),
            },
            ReportEvent::ToolFinished {
                name: "inventory".into(),
                outcome: ToolOutcome::Succeeded,
                preview: "42 items".into(),
            },
        ]
    );
}

#[tokio::test]
async fn failing_call_is_downgraded_and_ends_failed() {
    let (manager, hooks, recorder) = observed();
    let tool = Inventory.safe();

    let out = manager
        .run_tool(&CallScope::new(), &RunInfo::tool("inventory"), &tool, r#"{"count":-1}"#)
        .await
        .unwrap();

    assert_eq!(out, "unavailable");
    assert_eq!(hooks.reporter().outcomes(), [ToolOutcome::Failed]);
    assert_eq!(
        recorder.calls(),
        ["on_start:Tool::inventory", "on_end:Tool::inventory"]
    );
}

#[tokio::test]
async fn malformed_arguments_reach_on_error() {
    let (manager, hooks, recorder) = observed();
    let tool = Inventory.safe();

    let err = manager
        .run_tool(&CallScope::new(), &RunInfo::tool("inventory"), &tool, "{not json")
        .await
        .unwrap_err();

    assert!(err.is_argument_error());
    assert!(hooks.reporter().outcomes().is_empty());
    assert!(matches!(
        hooks.reporter().events().last(),
        Some(ReportEvent::ComponentFailed { component: ComponentKind::Tool, .. })
    ));
    assert_eq!(
        recorder.calls(),
        ["on_start:Tool::inventory", "on_error:Tool::inventory"]
    );
}

#[tokio::test]
async fn unwrapped_tool_reports_failure_through_on_error() {
    let (manager, hooks, _) = observed();

    let err = manager
        .run_tool(&CallScope::new(), &RunInfo::tool("inventory"), &Inventory, r#"{"count":-1}"#)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "unavailable");
    assert_eq!(
        hooks.reporter().events().last(),
        Some(&ReportEvent::ComponentFailed {
            component: ComponentKind::Tool,
            name: "inventory".into(),
            error: "unavailable".into(),
        })
    );
}

#[tokio::test]
async fn later_handlers_see_the_bound_state() {
    let (manager, _, recorder) = observed();

    manager
        .run_tool(&CallScope::new(), &RunInfo::tool("inventory"), &Inventory.safe(), r#"{"count":1}"#)
        .await
        .unwrap();

    // The observability handler runs first and binds the state.
    assert_eq!(recorder.scope_depths(), [1, 1]);
}

#[tokio::test]
async fn concurrent_calls_keep_their_own_outcomes() {
    let (manager, hooks, _) = observed();
    let manager = Arc::new(manager);
    let tool = Arc::new(Inventory.safe());

    let calls: Vec<_> = (0..16)
        .map(|i| {
            let manager = Arc::clone(&manager);
            let tool = Arc::clone(&tool);
            tokio::spawn(async move {
                let count = if i % 2 == 0 { i } else { -i };
                let args = format!(r#"{{"count":{count}}}"#);
                let info = RunInfo::tool(format!("call-{i}"));
                manager
                    .run_tool(&CallScope::new(), &info, tool.as_ref(), &args)
                    .await
            })
        })
        .collect();
    for call in calls {
        call.await.unwrap().unwrap();
    }

    for event in hooks.reporter().events() {
        if let ReportEvent::ToolFinished { name, outcome, .. } = event {
            let i: i64 = name.trim_start_matches("call-").parse().unwrap();
            let expected = if i % 2 == 0 {
                ToolOutcome::Succeeded
            } else {
                ToolOutcome::Failed
            };
            assert_eq!(outcome, expected, "{name}");
        }
    }
    assert_eq!(hooks.reporter().outcomes().len(), 16);
}

// ─────────────────────────────────────────────────────────────────────
// Model streams
// ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn model_stream_is_drained_while_caller_checks_for_tool_calls() {
    let (manager, hooks, recorder) = observed();
    let (writer, stream) = pipe::<Message>(1);

    let (_, caller) = manager.observe_model_stream(
        CallScope::new(),
        &RunInfo::chat_model("scripted"),
        stream,
    );

    let producer = tokio::spawn(async move {
        writer.send(Message::assistant("Let me look that up.")).await?;
        writer
            .send(Message::assistant_tool_calls(vec![ToolCall::new(
                "call_1",
                "inventory",
                r#"{"count":3}"#,
            )]))
            .await?;
        writer.send(Message::assistant("")).await?;
        Ok::<_, StreamError>(())
    });

    assert_eq!(stream_has_tool_calls(caller).await, Ok(true));
    producer.await.unwrap().unwrap();

    let reports = hooks.wait_for_drains().await;
    assert_eq!(reports.len(), 1);
    assert_eq!(hooks.reporter().assistant_text(), ["Let me look that up."]);
    assert_eq!(
        recorder.calls(),
        ["on_end_with_stream_output:ChatModel::scripted"]
    );
}

#[tokio::test]
async fn stream_error_is_reported_by_drain_and_caller() {
    let (manager, hooks, _) = observed();
    let stream = toolscope_stream::StreamReader::from_items([
        Ok(Message::assistant("partial")),
        Err(StreamError::source("connection reset")),
    ]);

    let (_, caller) = manager.observe_model_stream(
        CallScope::new(),
        &RunInfo::chat_model("scripted"),
        stream,
    );

    assert_eq!(
        stream_has_tool_calls(caller).await,
        Err(StreamError::source("connection reset"))
    );
    let reports = hooks.wait_for_drains().await;
    assert!(!reports[0].end.is_eof());
    assert_eq!(hooks.reporter().assistant_text(), ["partial"]);
}

#[tokio::test]
async fn without_handlers_the_stream_is_returned_as_is() {
    let manager = CallbackManager::new();
    let stream = toolscope_stream::StreamReader::from_vec(vec![Message::assistant("hi")]);

    let (scope, caller) =
        manager.observe_model_stream(CallScope::new(), &RunInfo::chat_model("m"), stream);

    assert!(scope.is_empty());
    assert_eq!(stream_has_tool_calls(caller).await, Ok(false));
}
