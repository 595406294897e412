//! The reason-act loop.

use std::sync::Arc;

use crate::model::{ScriptedModel, collect_reply};
use toolscope_callbacks::{CallbackManager, ObservabilityHooks, Reporter, RunInfo};
use toolscope_context::CallScope;
use toolscope_models::Message;
use toolscope_stream::{StreamError, StreamReader, stream_has_tool_calls};
use toolscope_tools::{ToolError, ToolRegistry};

/// Errors that end an agent run.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// A tool call failed in a way the model cannot recover from.
    #[error(transparent)]
    Tool(#[from] ToolError),
    /// The model stream failed.
    #[error("model stream failed: {0}")]
    Stream(#[from] StreamError),
    /// The model kept calling tools.
    #[error("no final answer after {0} model turns")]
    MaxIterations(usize),
}

/// Alternates model turns and tool calls until the model answers.
///
/// Every model reply is streamed through the [`CallbackManager`] so the
/// hooks can drain it for display, while the loop checks the same reply for
/// tool calls. Every tool call runs through the manager as well.
pub struct ReactAgent<R: Reporter> {
    model: ScriptedModel,
    tools: ToolRegistry,
    manager: CallbackManager,
    hooks: Arc<ObservabilityHooks<R>>,
    max_iterations: usize,
}

impl<R: Reporter> ReactAgent<R> {
    /// Default number of model turns before giving up.
    pub const DEFAULT_MAX_ITERATIONS: usize = 10;

    /// Creates an agent.
    ///
    /// `hooks` should already be registered with `manager`; the agent keeps
    /// it to wait for display drains between turns.
    #[must_use]
    pub fn new(
        model: ScriptedModel,
        tools: ToolRegistry,
        manager: CallbackManager,
        hooks: Arc<ObservabilityHooks<R>>,
    ) -> Self {
        Self {
            model,
            tools,
            manager,
            hooks,
            max_iterations: Self::DEFAULT_MAX_ITERATIONS,
        }
    }

    /// Sets the maximum number of model turns.
    #[must_use]
    pub fn with_max_iterations(mut self, turns: usize) -> Self {
        self.max_iterations = turns;
        self
    }

    /// Runs the conversation to a final answer.
    ///
    /// Returns the full transcript, ending with the model's answer.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError`] if a stream fails, a tool call has invalid
    /// arguments or names an unknown tool, or the turn limit is reached.
    pub async fn run(&self, mut messages: Vec<Message>) -> Result<Vec<Message>, AgentError> {
        let model_info = RunInfo::chat_model("scripted").with_run_type("ScriptedModel");

        for _ in 0..self.max_iterations {
            let stream = self.model.stream(&messages);
            let (_, stream) = self
                .manager
                .observe_model_stream(CallScope::new(), &model_info, stream);

            let [checker, full]: [StreamReader<Message>; 2] = stream
                .copy(2)
                .try_into()
                .map_err(|_| StreamError::Closed)?;
            let (wants_tools, reply) =
                tokio::join!(stream_has_tool_calls(checker), collect_reply(full));
            let (wants_tools, reply) = (wants_tools?, reply?);

            self.hooks.wait_for_drains().await;
            messages.push(reply.clone());
            if !wants_tools {
                return Ok(messages);
            }

            for call in &reply.tool_calls {
                let name = &call.function.name;
                let tool = self
                    .tools
                    .get(name)
                    .ok_or_else(|| ToolError::UnknownTool(name.clone()))?;
                let info = RunInfo::tool(name).with_run_type("SafeTool");
                let output = self
                    .manager
                    .run_tool(&CallScope::new(), &info, tool.as_ref(), &call.function.arguments)
                    .await?;
                messages.push(Message::tool_result(&call.id, output));
            }
        }

        Err(AgentError::MaxIterations(self.max_iterations))
    }
}
