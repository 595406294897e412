//! Test doubles for callback handlers and reporters.
//!
//! Available with the `test-utils` feature.

use parking_lot::Mutex;
use toolscope_context::CallScope;
use toolscope_stream::StreamReader;

use crate::handler::{CallbackHandler, CallbackInput, CallbackOutput};
use crate::info::{ComponentKind, RunInfo};
use crate::observability::{Reporter, ToolOutcome};

/// One event seen by a [`RecordingReporter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportEvent {
    /// A tool call started.
    ToolStarted {
        /// Tool name.
        name: String,
        /// Raw arguments.
        arguments: String,
    },
    /// A tool call finished.
    ToolFinished {
        /// Tool name.
        name: String,
        /// Outcome read from the execution state.
        outcome: ToolOutcome,
        /// Truncated response.
        preview: String,
    },
    /// A component failed.
    ComponentFailed {
        /// Component kind.
        component: ComponentKind,
        /// Component name.
        name: String,
        /// Error display text.
        error: String,
    },
    /// Assistant content was drained from a model stream.
    AssistantContent {
        /// Model name.
        name: String,
        /// Content text.
        text: String,
    },
}

/// [`Reporter`] that stores every event for later assertions.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<ReportEvent>>,
}

impl RecordingReporter {
    /// Returns all events in the order they were reported.
    #[must_use]
    pub fn events(&self) -> Vec<ReportEvent> {
        self.events.lock().clone()
    }

    /// Returns the outcomes of finished tool calls.
    #[must_use]
    pub fn outcomes(&self) -> Vec<ToolOutcome> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                ReportEvent::ToolFinished { outcome, .. } => Some(*outcome),
                _ => None,
            })
            .collect()
    }

    /// Returns drained assistant content.
    #[must_use]
    pub fn assistant_text(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|event| match event {
                ReportEvent::AssistantContent { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: ReportEvent) {
        self.events.lock().push(event);
    }
}

impl Reporter for RecordingReporter {
    fn tool_started(&self, info: &RunInfo, arguments: &str) {
        self.push(ReportEvent::ToolStarted {
            name: info.name.clone(),
            arguments: arguments.to_string(),
        });
    }

    fn tool_finished(&self, info: &RunInfo, outcome: ToolOutcome, preview: &str) {
        self.push(ReportEvent::ToolFinished {
            name: info.name.clone(),
            outcome,
            preview: preview.to_string(),
        });
    }

    fn component_failed(&self, info: &RunInfo, error: &dyn core::error::Error) {
        self.push(ReportEvent::ComponentFailed {
            component: info.component.clone(),
            name: info.name.clone(),
            error: error.to_string(),
        });
    }

    fn assistant_content(&self, info: &RunInfo, text: &str) {
        self.push(ReportEvent::AssistantContent {
            name: info.name.clone(),
            text: text.to_string(),
        });
    }
}

/// [`CallbackHandler`] that records which callbacks fired.
///
/// Each entry is `"<callback>:<run info>"`. Streams are closed unread.
#[derive(Debug, Default)]
pub struct RecordingHandler {
    calls: Mutex<Vec<String>>,
    depths: Mutex<Vec<usize>>,
}

impl RecordingHandler {
    /// Returns the callbacks fired, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Returns the depth of each scope the handler received.
    #[must_use]
    pub fn scope_depths(&self) -> Vec<usize> {
        self.depths.lock().clone()
    }

    fn record(&self, callback: &str, info: &RunInfo, scope: &CallScope) {
        self.calls.lock().push(format!("{callback}:{info}"));
        self.depths.lock().push(scope.depth());
    }
}

impl CallbackHandler for RecordingHandler {
    fn on_start(&self, scope: CallScope, info: &RunInfo, _input: &CallbackInput) -> CallScope {
        self.record("on_start", info, &scope);
        scope
    }

    fn on_end(&self, scope: CallScope, info: &RunInfo, _output: &CallbackOutput) -> CallScope {
        self.record("on_end", info, &scope);
        scope
    }

    fn on_error(
        &self,
        scope: CallScope,
        info: &RunInfo,
        _error: &dyn core::error::Error,
    ) -> CallScope {
        self.record("on_error", info, &scope);
        scope
    }

    fn on_start_with_stream_input(
        &self,
        scope: CallScope,
        info: &RunInfo,
        mut input: StreamReader<CallbackInput>,
    ) -> CallScope {
        self.record("on_start_with_stream_input", info, &scope);
        input.close();
        scope
    }

    fn on_end_with_stream_output(
        &self,
        scope: CallScope,
        info: &RunInfo,
        mut output: StreamReader<CallbackOutput>,
    ) -> CallScope {
        self.record("on_end_with_stream_output", info, &scope);
        output.close();
        scope
    }
}
