//! A scripted chat model that streams its replies.
//!
//! The model reads the conversation so far and plays a fixed
//! recommendation script: find restaurants, open the best one's menu,
//! recommend dishes. A tool result carrying a retryable fault makes it
//! repeat the failed call.

use crate::tools::{Dish, Restaurant};
use toolscope_models::{Message, Role, ToolCall};
use toolscope_stream::{StreamError, StreamReader, pipe};
use toolscope_tools::TransientFault;

/// Deterministic stand-in for a streaming chat model.
#[derive(Debug, Clone)]
pub struct ScriptedModel {
    location: String,
    buffer: usize,
}

impl ScriptedModel {
    /// Creates a model that looks for restaurants in `location`.
    #[must_use]
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            buffer: 4,
        }
    }

    /// Sets how many chunks the stream buffers before the producer waits.
    #[must_use]
    pub fn with_buffer(mut self, chunks: usize) -> Self {
        self.buffer = chunks;
        self
    }

    /// Returns the chunks of the next reply to `history`.
    #[must_use]
    pub fn next_turn(&self, history: &[Message]) -> Vec<Message> {
        let turn = history.iter().filter(|m| m.has_tool_calls()).count() + 1;
        let call_id = format!("call_{turn}");
        let last_call = history
            .iter()
            .rev()
            .find_map(|m| m.tool_calls.first());
        let last_result = history.iter().rev().find(|m| m.role == Role::Tool);

        let (Some(call), Some(result)) = (last_call, last_result) else {
            let args = serde_json::json!({ "location": self.location, "topn": 2 });
            return reply(
                &format!("Let me look for restaurants in {}.", self.location),
                Some(ToolCall::new(call_id, "query_restaurants", args.to_string())),
            );
        };

        if TransientFault::parse(&result.content).is_some_and(|fault| fault.should_retry()) {
            let retry = ToolCall::new(call_id, &call.function.name, &call.function.arguments);
            return reply(
                &format!("{} is busy, trying again.", call.function.name),
                Some(retry),
            );
        }

        match call.function.name.as_str() {
            "query_restaurants" => match serde_json::from_str::<Vec<Restaurant>>(&result.content) {
                Ok(found) => match found.first() {
                    Some(best) => {
                        let args = serde_json::json!({ "restaurant_id": best.id });
                        reply(
                            &format!("{} looks best, checking its menu.", best.name),
                            Some(ToolCall::new(call_id, "query_dishes", args.to_string())),
                        )
                    }
                    None => reply(
                        &format!("I could not find any restaurants in {}.", self.location),
                        None,
                    ),
                },
                Err(_) => give_up(&result.content),
            },
            "query_dishes" => match serde_json::from_str::<Vec<Dish>>(&result.content) {
                Ok(dishes) => {
                    let picks: Vec<String> = dishes
                        .iter()
                        .map(|dish| format!("{} ({} yuan)", dish.name, dish.price))
                        .collect();
                    reply(&format!("You should try: {}.", picks.join(", ")), None)
                }
                Err(_) => give_up(&result.content),
            },
            _ => give_up(&result.content),
        }
    }

    /// Streams the next reply to `history`.
    ///
    /// A producer task writes the chunks; it stops early once the reader
    /// is closed.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    #[must_use]
    pub fn stream(&self, history: &[Message]) -> StreamReader<Message> {
        let chunks = self.next_turn(history);
        let (writer, reader) = pipe(self.buffer);
        tokio::spawn(async move {
            for chunk in chunks {
                if writer.send(chunk).await.is_err() {
                    tracing::debug!("model stream closed before the reply finished");
                    return;
                }
            }
        });
        reader
    }
}

/// Splits text into word chunks, then appends the tool call and an empty
/// closing chunk.
fn reply(text: &str, call: Option<ToolCall>) -> Vec<Message> {
    let mut chunks: Vec<Message> = text.split_inclusive(' ').map(Message::assistant).collect();
    if let Some(call) = call {
        chunks.push(Message::assistant_tool_calls(vec![call]));
    }
    chunks.push(Message::assistant(""));
    chunks
}

fn give_up(tool_output: &str) -> Vec<Message> {
    reply(&format!("Sorry, I could not finish that: {tool_output}"), None)
}

/// Reads a streamed reply to its end and joins the chunks into one message.
///
/// # Errors
///
/// Returns the stream's error if it fails before end-of-stream.
pub async fn collect_reply(mut reader: StreamReader<Message>) -> Result<Message, StreamError> {
    let mut message = Message::assistant("");
    while let Some(chunk) = reader.recv().await? {
        message.content.push_str(&chunk.content);
        message.tool_calls.extend(chunk.tool_calls);
    }
    Ok(message)
}
