//! The observability handler.
//!
//! [`ObservabilityHooks`] tracks every tool call through a small state
//! machine and drains chat model streams for display:
//!
//! ```text
//! NotStarted ──on_start──► Started ──on_end──► Succeeded | Failed
//!                             │
//!                             └──on_error──► (logged, terminal)
//! ```
//!
//! `on_start` binds a fresh [`ExecutionState`] into the scope handed to the
//! tool, so a [`SafeTool`](toolscope_tools::SafeTool) can record the
//! outcome. `on_end` reads it back through the same scope lineage. A call
//! whose scope carries no state ends as [`ToolOutcome::Unknown`].
//!
//! What gets reported goes through a [`Reporter`]. The default
//! [`TracingReporter`] emits `tracing` events; supply your own to print to a
//! terminal or collect into a UI.

use core::ops::ControlFlow;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinSet;
use tracing::Instrument;
use toolscope_context::{CallScope, ExecutionState, bind_state, lookup_state};
use toolscope_stream::{DrainReport, StreamReader, drain};

use crate::handler::{CallbackHandler, CallbackInput, CallbackOutput};
use crate::info::{ComponentKind, RunInfo};
use crate::preview::truncate_preview;

// ─────────────────────────────────────────────────────────────────────────────
// Outcomes
// ─────────────────────────────────────────────────────────────────────────────

/// How a tool call ended, as seen by `on_end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolOutcome {
    /// The invocation recorded success.
    Succeeded,
    /// The invocation recorded failure, or recorded nothing.
    Failed,
    /// No execution state was bound, so the outcome is indeterminate.
    Unknown,
}

/// Where a tool call stands, read from its scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallPhase {
    /// No execution state is bound.
    NotStarted,
    /// State is bound but no outcome recorded yet.
    Started,
    /// Success was recorded.
    Succeeded,
    /// Failure was recorded.
    Failed,
}

impl CallPhase {
    /// Reads the phase of the call owning `scope`.
    #[must_use]
    pub fn of(scope: &CallScope) -> Self {
        let Some(state) = lookup_state(scope) else {
            return Self::NotStarted;
        };
        match state.outcome() {
            Some(true) => Self::Succeeded,
            Some(false) => Self::Failed,
            None => Self::Started,
        }
    }

    /// Returns `true` once an outcome has been recorded.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Reporter
// ─────────────────────────────────────────────────────────────────────────────

/// Destination for what [`ObservabilityHooks`] observes.
///
/// All methods default to doing nothing. `assistant_content` is called from
/// a drain task, hence the `Send + Sync` bound.
pub trait Reporter: Send + Sync + 'static {
    /// A tool call is starting with the given raw arguments.
    fn tool_started(&self, info: &RunInfo, arguments: &str) {
        let _ = (info, arguments);
    }

    /// A tool call finished. `preview` is the truncated response.
    fn tool_finished(&self, info: &RunInfo, outcome: ToolOutcome, preview: &str) {
        let _ = (info, outcome, preview);
    }

    /// Any component reported an error.
    fn component_failed(&self, info: &RunInfo, error: &dyn core::error::Error) {
        let _ = (info, error);
    }

    /// A chat model produced non-empty assistant content.
    fn assistant_content(&self, info: &RunInfo, text: &str) {
        let _ = (info, text);
    }
}

/// [`Reporter`] that emits `tracing` events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn tool_started(&self, info: &RunInfo, arguments: &str) {
        tracing::info!(name = %info.name, arguments, "tool call started");
    }

    fn tool_finished(&self, info: &RunInfo, outcome: ToolOutcome, preview: &str) {
        match outcome {
            ToolOutcome::Succeeded => {
                tracing::info!(name = %info.name, response = preview, "tool call succeeded");
            }
            ToolOutcome::Failed => {
                tracing::warn!(name = %info.name, response = preview, "tool call failed");
            }
            ToolOutcome::Unknown => {
                tracing::warn!(
                    name = %info.name,
                    response = preview,
                    "tool call ended without execution state, outcome indeterminate"
                );
            }
        }
    }

    fn component_failed(&self, info: &RunInfo, error: &dyn core::error::Error) {
        tracing::error!(
            component = %info.component,
            run_type = %info.run_type,
            name = %info.name,
            error = %error,
            "component failed"
        );
    }

    fn assistant_content(&self, info: &RunInfo, text: &str) {
        tracing::info!(name = %info.name, content = text, "assistant");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HooksConfig
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for [`ObservabilityHooks`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HooksConfig {
    /// Characters of a tool response kept in the `on_end` report.
    pub response_preview_len: usize,
    /// Whether chat model output streams are drained to the reporter.
    /// When `false` they are closed unread.
    pub drain_model_streams: bool,
}

impl HooksConfig {
    /// Default response preview length.
    pub const DEFAULT_PREVIEW_LEN: usize = 200;

    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            response_preview_len: Self::DEFAULT_PREVIEW_LEN,
            drain_model_streams: true,
        }
    }

    /// Sets the response preview length.
    #[must_use]
    pub fn with_response_preview_len(mut self, chars: usize) -> Self {
        self.response_preview_len = chars;
        self
    }

    /// Enables or disables draining of chat model streams.
    #[must_use]
    pub fn with_drain_model_streams(mut self, enabled: bool) -> Self {
        self.drain_model_streams = enabled;
        self
    }
}

impl Default for HooksConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ObservabilityHooks
// ─────────────────────────────────────────────────────────────────────────────

/// Tracks tool call outcomes and drains chat model streams.
///
/// Spawned drains are kept in a [`JoinSet`]; call
/// [`wait_for_drains`](Self::wait_for_drains) before shutdown so no output
/// is lost.
///
/// # Example
///
/// ```ignore
/// let hooks = Arc::new(ObservabilityHooks::new());
/// manager.register_shared("observability", hooks.clone())?;
///
/// // ... run tools and models through the manager ...
///
/// hooks.wait_for_drains().await;
/// ```
pub struct ObservabilityHooks<R: Reporter = TracingReporter> {
    reporter: Arc<R>,
    config: HooksConfig,
    drains: Mutex<JoinSet<DrainReport>>,
}

impl ObservabilityHooks {
    /// Creates hooks reporting through `tracing`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_reporter(TracingReporter)
    }
}

impl Default for ObservabilityHooks {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Reporter> core::fmt::Debug for ObservabilityHooks<R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ObservabilityHooks")
            .field("config", &self.config)
            .field("pending_drains", &self.pending_drains())
            .finish_non_exhaustive()
    }
}

impl<R: Reporter> ObservabilityHooks<R> {
    /// Creates hooks reporting to `reporter`.
    #[must_use]
    pub fn with_reporter(reporter: R) -> Self {
        Self::with_shared_reporter(Arc::new(reporter))
    }

    /// Creates hooks reporting to a shared `reporter`.
    #[must_use]
    pub fn with_shared_reporter(reporter: Arc<R>) -> Self {
        Self {
            reporter,
            config: HooksConfig::default(),
            drains: Mutex::new(JoinSet::new()),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub fn with_config(mut self, config: HooksConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the reporter.
    #[must_use]
    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &HooksConfig {
        &self.config
    }

    /// Returns the number of drains spawned and not yet collected.
    #[must_use]
    pub fn pending_drains(&self) -> usize {
        self.drains.lock().len()
    }

    /// Waits for every spawned drain to finish.
    ///
    /// Returns the reports of drains that completed; panicked or cancelled
    /// drains are logged and skipped.
    pub async fn wait_for_drains(&self) -> Vec<DrainReport> {
        let mut drains = core::mem::take(&mut *self.drains.lock());
        let mut reports = Vec::with_capacity(drains.len());
        while let Some(result) = drains.join_next().await {
            if let Some(report) = collect(result) {
                reports.push(report);
            }
        }
        reports
    }

    fn spawn_drain(&self, info: &RunInfo, output: StreamReader<CallbackOutput>) {
        let Ok(handle) = Handle::try_current() else {
            tracing::warn!(
                name = %info.name,
                "no async runtime to drain model output, closing stream"
            );
            drop(output);
            return;
        };

        let reporter = Arc::clone(&self.reporter);
        let owner = info.clone();
        let observer = move |text: &str| {
            reporter.assistant_content(&owner, text);
            ControlFlow::Continue(())
        };
        let span = tracing::debug_span!("stream_drain", name = %info.name);

        let mut drains = self.drains.lock();
        while let Some(result) = drains.try_join_next() {
            let _ = collect(result);
        }
        drains.spawn_on(drain(output, observer).instrument(span), &handle);
    }
}

/// Unwraps a finished drain, logging panics and cancellations.
fn collect(result: Result<DrainReport, tokio::task::JoinError>) -> Option<DrainReport> {
    match result {
        Ok(report) => Some(report),
        Err(err) if err.is_panic() => {
            tracing::error!(error = %err, "stream drain task panicked");
            None
        }
        Err(err) => {
            tracing::warn!(error = %err, "stream drain task cancelled");
            None
        }
    }
}

impl<R: Reporter> CallbackHandler for ObservabilityHooks<R> {
    fn on_start(&self, scope: CallScope, info: &RunInfo, input: &CallbackInput) -> CallScope {
        if info.component != ComponentKind::Tool {
            return scope;
        }
        let arguments = match input {
            CallbackInput::Tool { arguments } => arguments.as_str(),
            CallbackInput::Messages(_) | CallbackInput::Opaque(_) => "",
        };
        self.reporter.tool_started(info, arguments);
        bind_state(&scope, Arc::new(ExecutionState::new()))
    }

    fn on_end(&self, scope: CallScope, info: &RunInfo, output: &CallbackOutput) -> CallScope {
        if info.component != ComponentKind::Tool {
            return scope;
        }
        let outcome = match lookup_state(&scope) {
            Some(state) if state.success() => ToolOutcome::Succeeded,
            Some(_) => ToolOutcome::Failed,
            None => ToolOutcome::Unknown,
        };
        let limit = self.config.response_preview_len;
        match output {
            CallbackOutput::Tool { response } => {
                self.reporter
                    .tool_finished(info, outcome, &truncate_preview(response, limit));
            }
            CallbackOutput::Message(message) => {
                self.reporter
                    .tool_finished(info, outcome, &truncate_preview(&message.content, limit));
            }
            CallbackOutput::Opaque(value) => {
                self.reporter
                    .tool_finished(info, outcome, &truncate_preview(&value.to_string(), limit));
            }
        }
        scope
    }

    fn on_error(
        &self,
        scope: CallScope,
        info: &RunInfo,
        error: &dyn core::error::Error,
    ) -> CallScope {
        self.reporter.component_failed(info, error);
        scope
    }

    fn on_start_with_stream_input(
        &self,
        scope: CallScope,
        _info: &RunInfo,
        mut input: StreamReader<CallbackInput>,
    ) -> CallScope {
        input.close();
        scope
    }

    fn on_end_with_stream_output(
        &self,
        scope: CallScope,
        info: &RunInfo,
        mut output: StreamReader<CallbackOutput>,
    ) -> CallScope {
        if info.component == ComponentKind::ChatModel && self.config.drain_model_streams {
            self.spawn_drain(info, output);
        } else {
            output.close();
        }
        scope
    }
}
