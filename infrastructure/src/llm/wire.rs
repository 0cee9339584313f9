//! Chat-completions request/response shapes.

use gitsmith_domain::{ContentBlock, ConversationThread, LlmResponse, Role, StopReason, ThreadEntry};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub tools: &'a [serde_json::Value],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<&'a str>,
}

impl<'a> ChatRequest<'a> {
    pub fn new(model: &'a str, thread: &'a ConversationThread, tools: &'a [serde_json::Value]) -> Self {
        Self {
            model,
            messages: thread.entries().iter().map(ChatMessage::from).collect(),
            tools,
            tool_choice: (!tools.is_empty()).then_some("auto"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'static str,
    /// `null` for assistant messages that only carry tool calls
    pub content: Option<&'a str>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<OutgoingToolCall<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<&'a str>,
}

impl<'a> From<&'a ThreadEntry> for ChatMessage<'a> {
    fn from(entry: &'a ThreadEntry) -> Self {
        let content = match entry.role {
            Role::Assistant if entry.content.is_empty() && !entry.tool_calls.is_empty() => None,
            _ => Some(entry.content.as_str()),
        };
        Self {
            role: entry.role.as_str(),
            content,
            tool_calls: entry
                .tool_calls
                .iter()
                .map(|call| OutgoingToolCall {
                    id: &call.id,
                    kind: "function",
                    function: OutgoingFunction {
                        name: &call.tool_name,
                        arguments: call.arguments_value().to_string(),
                    },
                })
                .collect(),
            tool_call_id: entry.tool_call_id.as_deref(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OutgoingToolCall<'a> {
    pub id: &'a str,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub function: OutgoingFunction<'a>,
}

#[derive(Debug, Serialize)]
pub struct OutgoingFunction<'a> {
    pub name: &'a str,
    /// JSON-encoded argument object
    pub arguments: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub model: Option<String>,
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<IncomingToolCall>>,
}

#[derive(Debug, Deserialize)]
pub struct IncomingToolCall {
    pub id: String,
    pub function: IncomingFunction,
}

#[derive(Debug, Deserialize)]
pub struct IncomingFunction {
    pub name: String,
    #[serde(default)]
    pub arguments: String,
}

impl ChatResponse {
    /// First choice as an [`LlmResponse`], or `None` when there are no choices
    pub fn into_llm_response(self) -> Option<LlmResponse> {
        let choice = self.choices.into_iter().next()?;
        let mut content = Vec::new();
        if let Some(text) = choice.message.content.filter(|t| !t.is_empty()) {
            content.push(ContentBlock::Text(text));
        }
        for call in choice.message.tool_calls.unwrap_or_default() {
            content.push(ContentBlock::ToolUse {
                input: parse_arguments(&call.function.name, &call.function.arguments),
                id: call.id,
                name: call.function.name,
            });
        }
        Some(LlmResponse {
            content,
            stop_reason: choice
                .finish_reason
                .as_deref()
                .map(StopReason::from_finish_reason),
            model: self.model,
        })
    }
}

/// Decode the argument string of a tool call.
///
/// Malformed arguments become an empty map; the dispatcher then reports the
/// missing parameters back to the model instead of failing the turn.
fn parse_arguments(tool: &str, raw: &str) -> HashMap<String, serde_json::Value> {
    if raw.trim().is_empty() {
        return HashMap::new();
    }
    serde_json::from_str(raw).unwrap_or_else(|e| {
        warn!("Malformed arguments for {}: {} ({})", tool, e, raw);
        HashMap::new()
    })
}
