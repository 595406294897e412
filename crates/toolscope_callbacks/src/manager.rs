//! Handler registry and dispatch.
//!
//! The [`CallbackManager`] stands in for the surrounding framework's
//! dispatcher: it fires every registered [`CallbackHandler`] around a
//! component run.
//!
//! # Dispatch Rules
//!
//! - Handlers run in registration order
//! - The scope returned by one handler is passed to the next, so values a
//!   handler binds in `on_start` are visible to the component and to every
//!   later callback of the same call
//! - Each stream callback receives its own copy of the stream; no handler
//!   can stall another by reading slowly
//!
//! # Example
//!
//! ```ignore
//! let manager = CallbackManager::new();
//! manager.register("observability", ObservabilityHooks::new())?;
//!
//! // One tool call: on_start → execute → on_end | on_error
//! let output = manager
//!     .run_tool(&scope, &RunInfo::tool("query_dishes"), &tool, args)
//!     .await?;
//! ```

use core::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use toolscope_context::CallScope;
use toolscope_models::Message;
use toolscope_stream::StreamReader;
use toolscope_tools::{Tool, ToolError};

use crate::handler::{CallbackHandler, CallbackInput, CallbackOutput};
use crate::info::RunInfo;

// ─────────────────────────────────────────────────────────────────────────────
// RegistrationError
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during handler registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// A handler with this name already exists.
    DuplicateName {
        /// The duplicate handler name.
        name: String,
    },
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationError::DuplicateName { name } => {
                write!(f, "callback handler '{}' already registered", name)
            }
        }
    }
}

impl core::error::Error for RegistrationError {}

// ─────────────────────────────────────────────────────────────────────────────
// CallbackManager
// ─────────────────────────────────────────────────────────────────────────────

/// Entry in the handler registry.
struct HandlerEntry {
    /// Human-readable name for debugging and logging.
    name: String,
    handler: Arc<dyn CallbackHandler>,
}

/// Registry and dispatcher for [`CallbackHandler`]s.
///
/// # Thread Safety
///
/// Registration and dispatch both take `&self`. Dispatch works on a snapshot
/// of the handler list, so no lock is held while a component runs.
#[derive(Default)]
pub struct CallbackManager {
    handlers: RwLock<Vec<HandlerEntry>>,
}

impl fmt::Debug for CallbackManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackManager")
            .field("handlers", &self.names())
            .finish()
    }
}

impl CallbackManager {
    /// Creates a manager with no handlers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(Vec::new()),
        }
    }

    /// Registers a handler under a unique name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::DuplicateName`] if the name is taken.
    pub fn register(
        &self,
        name: impl Into<String>,
        handler: impl CallbackHandler,
    ) -> Result<&Self, RegistrationError> {
        self.register_shared(name, Arc::new(handler))
    }

    /// Registers a shared handler under a unique name.
    ///
    /// Keep a clone of the `Arc` to reach the handler after registration.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::DuplicateName`] if the name is taken.
    pub fn register_shared(
        &self,
        name: impl Into<String>,
        handler: Arc<dyn CallbackHandler>,
    ) -> Result<&Self, RegistrationError> {
        let name = name.into();
        let mut handlers = self.handlers.write();
        if handlers.iter().any(|entry| entry.name == name) {
            return Err(RegistrationError::DuplicateName { name });
        }
        tracing::debug!(handler = %name, "registered callback handler");
        handlers.push(HandlerEntry { name, handler });
        Ok(self)
    }

    /// Returns handler names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        self.handlers
            .read()
            .iter()
            .map(|entry| entry.name.clone())
            .collect()
    }

    /// Returns the number of registered handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.read().len()
    }

    /// Returns `true` if no handlers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.read().is_empty()
    }

    fn snapshot(&self) -> Vec<Arc<dyn CallbackHandler>> {
        self.handlers
            .read()
            .iter()
            .map(|entry| Arc::clone(&entry.handler))
            .collect()
    }

    /// Fires `on_start` on every handler.
    #[must_use]
    pub fn on_start(&self, scope: CallScope, info: &RunInfo, input: &CallbackInput) -> CallScope {
        self.snapshot()
            .iter()
            .fold(scope, |scope, handler| handler.on_start(scope, info, input))
    }

    /// Fires `on_end` on every handler.
    #[must_use]
    pub fn on_end(&self, scope: CallScope, info: &RunInfo, output: &CallbackOutput) -> CallScope {
        self.snapshot()
            .iter()
            .fold(scope, |scope, handler| handler.on_end(scope, info, output))
    }

    /// Fires `on_error` on every handler.
    #[must_use]
    pub fn on_error(
        &self,
        scope: CallScope,
        info: &RunInfo,
        error: &dyn core::error::Error,
    ) -> CallScope {
        self.snapshot()
            .iter()
            .fold(scope, |scope, handler| handler.on_error(scope, info, error))
    }

    /// Fires `on_start_with_stream_input`, giving each handler its own copy.
    ///
    /// With no handlers the stream is closed.
    ///
    /// Outside a Tokio runtime with more than one handler, every handler
    /// receives a closed copy.
    #[must_use]
    pub fn on_start_with_stream_input(
        &self,
        scope: CallScope,
        info: &RunInfo,
        input: StreamReader<CallbackInput>,
    ) -> CallScope {
        let handlers = self.snapshot();
        let copies = input.copy(handlers.len());
        handlers
            .iter()
            .zip(copies)
            .fold(scope, |scope, (handler, copy)| {
                handler.on_start_with_stream_input(scope, info, copy)
            })
    }

    /// Fires `on_end_with_stream_output`, giving each handler its own copy.
    ///
    /// With no handlers the stream is closed.
    ///
    /// Outside a Tokio runtime with more than one handler, every handler
    /// receives a closed copy.
    #[must_use]
    pub fn on_end_with_stream_output(
        &self,
        scope: CallScope,
        info: &RunInfo,
        output: StreamReader<CallbackOutput>,
    ) -> CallScope {
        let handlers = self.snapshot();
        let copies = output.copy(handlers.len());
        handlers
            .iter()
            .zip(copies)
            .fold(scope, |scope, (handler, copy)| {
                handler.on_end_with_stream_output(scope, info, copy)
            })
    }

    /// Runs one tool call with callbacks around it.
    ///
    /// Fires `on_start`, executes the tool with the scope the handlers
    /// returned, then fires `on_end` with the response or `on_error` with
    /// the error. The same scope lineage flows through all three steps.
    ///
    /// # Errors
    ///
    /// Returns whatever the tool returns. Wrap the tool in a
    /// [`SafeTool`](toolscope_tools::SafeTool) to keep operational failures
    /// off this path.
    pub async fn run_tool(
        &self,
        scope: &CallScope,
        info: &RunInfo,
        tool: &dyn Tool,
        args: &str,
    ) -> Result<String, ToolError> {
        let input = CallbackInput::Tool {
            arguments: args.to_string(),
        };
        let scope = self.on_start(scope.clone(), info, &input);

        match tool.execute(&scope, args).await {
            Ok(response) => {
                let output = CallbackOutput::Tool {
                    response: response.clone(),
                };
                let _ = self.on_end(scope, info, &output);
                Ok(response)
            }
            Err(err) => {
                let _ = self.on_error(scope, info, &err);
                Err(err)
            }
        }
    }

    /// Reports a chat model's streamed output to the handlers.
    ///
    /// Splits `stream` in two: one copy goes to
    /// `on_end_with_stream_output` (as [`CallbackOutput::Message`] frames),
    /// the other is returned for the caller, typically a tool-call checker.
    /// The two copies are read independently.
    ///
    /// Outside a Tokio runtime the stream is closed with a warning and both
    /// copies yield [`StreamError::Closed`](toolscope_stream::StreamError::Closed).
    #[must_use]
    pub fn observe_model_stream(
        &self,
        scope: CallScope,
        info: &RunInfo,
        stream: StreamReader<Message>,
    ) -> (CallScope, StreamReader<Message>) {
        if self.is_empty() {
            return (scope, stream);
        }
        let mut copies = stream.copy(2);
        let (Some(caller), Some(observed)) = (copies.pop(), copies.pop()) else {
            unreachable!("copy(2) yields two readers")
        };
        let observed = observed.map(|message: &Message| CallbackOutput::Message(message.clone()));
        let scope = self.on_end_with_stream_output(scope, info, observed);
        (scope, caller)
    }
}
