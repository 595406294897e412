//! The [`CallbackHandler`] trait and its payloads.

use toolscope_context::CallScope;
use toolscope_models::Message;
use toolscope_stream::{Frame, StreamReader};

use crate::info::RunInfo;

/// Input a component was started with.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackInput {
    /// Raw JSON arguments of a tool call.
    Tool {
        /// Arguments exactly as the model produced them.
        arguments: String,
    },
    /// Messages sent to a chat model.
    Messages(Vec<Message>),
    /// Input of a component this crate has no shape for.
    Opaque(serde_json::Value),
}

/// Output a component produced, or one frame of it when streamed.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackOutput {
    /// The string a tool returned.
    Tool {
        /// Tool response as handed back to the model.
        response: String,
    },
    /// A chat model message or message chunk.
    Message(Message),
    /// Output of a component this crate has no shape for.
    Opaque(serde_json::Value),
}

impl Frame for CallbackOutput {
    fn assistant_content(&self) -> Option<&str> {
        match self {
            Self::Message(message) => message.assistant_text(),
            Self::Tool { .. } | Self::Opaque(_) => None,
        }
    }

    fn has_tool_calls(&self) -> bool {
        matches!(self, Self::Message(message) if message.has_tool_calls())
    }
}

/// Lifecycle callbacks around a component run.
///
/// Every method has a default implementation, so a handler only overrides
/// what it cares about. Methods receive the scope of the current call and
/// return the scope to continue with; return a derived scope to make values
/// visible to the component and to later callbacks for the same call.
///
/// Stream callbacks take ownership of the reader. A handler must close it,
/// or hand it to something that will; dropping it counts.
pub trait CallbackHandler: Send + Sync + 'static {
    /// Called before a component runs with a single input.
    fn on_start(&self, scope: CallScope, info: &RunInfo, input: &CallbackInput) -> CallScope {
        let _ = (info, input);
        scope
    }

    /// Called after a component produced a single output.
    fn on_end(&self, scope: CallScope, info: &RunInfo, output: &CallbackOutput) -> CallScope {
        let _ = (info, output);
        scope
    }

    /// Called when a component failed.
    fn on_error(
        &self,
        scope: CallScope,
        info: &RunInfo,
        error: &dyn core::error::Error,
    ) -> CallScope {
        let _ = (info, error);
        scope
    }

    /// Called before a component runs with a streamed input.
    fn on_start_with_stream_input(
        &self,
        scope: CallScope,
        info: &RunInfo,
        input: StreamReader<CallbackInput>,
    ) -> CallScope {
        let _ = info;
        drop(input);
        scope
    }

    /// Called when a component started producing a streamed output.
    fn on_end_with_stream_output(
        &self,
        scope: CallScope,
        info: &RunInfo,
        output: StreamReader<CallbackOutput>,
    ) -> CallScope {
        let _ = info;
        drop(output);
        scope
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolscope_models::ToolCall;

    #[test]
    fn only_messages_carry_assistant_content() {
        let message = CallbackOutput::Message(Message::assistant("hi"));
        let tool = CallbackOutput::Tool {
            response: "hi".into(),
        };
        let opaque = CallbackOutput::Opaque(serde_json::json!({"content": "hi"}));

        assert_eq!(message.assistant_content(), Some("hi"));
        assert_eq!(tool.assistant_content(), None);
        assert_eq!(opaque.assistant_content(), None);
    }

    #[test]
    fn tool_call_chunks_are_detected() {
        let call = ToolCall::new("1", "t", "{}");
        let chunk = CallbackOutput::Message(Message::assistant_tool_calls(vec![call]));
        assert!(chunk.has_tool_calls());
        assert!(!CallbackOutput::Message(Message::assistant("x")).has_tool_calls());
    }
}
