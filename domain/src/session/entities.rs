//! Conversation thread entities

use crate::core::error::DomainError;
use crate::tool::entities::ToolCall;
use crate::tool::value_objects::ToolResult;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Role of an entry in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
    /// Feedback for one tool call
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// One entry of a [`ConversationThread`] (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadEntry {
    pub role: Role,
    pub content: String,
    /// Tool calls proposed by the assistant (assistant entries only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// Call this entry answers (tool entries only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ThreadEntry {
    pub fn system(content: impl Into<String>) -> Self {
        Self::plain(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::plain(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            tool_calls,
            tool_call_id: None,
        }
    }

    pub fn tool(result: &ToolResult) -> Self {
        Self {
            role: Role::Tool,
            content: result.feedback_text(),
            tool_calls: Vec::new(),
            tool_call_id: Some(result.call_id.clone()),
        }
    }

    fn plain(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }
}

/// Ordered, append-only transcript of one chat process
///
/// Tool results can only be appended as a complete answer to the tool calls
/// of the latest assistant entry: one result per call id, no extras, no
/// duplicates.
#[derive(Debug, Clone, Default)]
pub struct ConversationThread {
    entries: Vec<ThreadEntry>,
}

impl ConversationThread {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        let mut thread = Self::new();
        thread.entries.push(ThreadEntry::system(prompt));
        thread
    }

    pub fn entries(&self) -> &[ThreadEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.entries.push(ThreadEntry::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>, tool_calls: Vec<ToolCall>) {
        self.entries.push(ThreadEntry::assistant(content, tool_calls));
    }

    /// Tool calls of the latest assistant entry that have no result yet
    pub fn pending_tool_calls(&self) -> Vec<&ToolCall> {
        let Some(idx) = self.entries.iter().rposition(|e| e.role == Role::Assistant) else {
            return Vec::new();
        };
        let answered: HashSet<&str> = self.entries[idx + 1..]
            .iter()
            .filter_map(|e| e.tool_call_id.as_deref())
            .collect();
        self.entries[idx]
            .tool_calls
            .iter()
            .filter(|c| !answered.contains(c.id.as_str()))
            .collect()
    }

    pub fn has_pending_tool_calls(&self) -> bool {
        !self.pending_tool_calls().is_empty()
    }

    /// Drop the latest assistant entry, and any results after it, when some
    /// of its calls are still unanswered. Returns whether anything was dropped.
    pub fn discard_pending_tool_calls(&mut self) -> bool {
        if !self.has_pending_tool_calls() {
            return false;
        }
        if let Some(idx) = self.entries.iter().rposition(|e| e.role == Role::Assistant) {
            self.entries.truncate(idx);
        }
        true
    }

    /// Append one tool entry per result.
    ///
    /// The result ids must equal the pending call ids exactly; otherwise
    /// nothing is appended.
    pub fn record_tool_results(&mut self, results: &[ToolResult]) -> Result<(), DomainError> {
        let pending: HashSet<String> = self
            .pending_tool_calls()
            .into_iter()
            .map(|c| c.id.clone())
            .collect();

        let mut seen = HashSet::new();
        for result in results {
            if !seen.insert(result.call_id.as_str()) {
                return Err(DomainError::UnmatchedToolResults(format!(
                    "duplicate result for call '{}'",
                    result.call_id
                )));
            }
            if !pending.contains(&result.call_id) {
                return Err(DomainError::UnmatchedToolResults(format!(
                    "no pending call with id '{}'",
                    result.call_id
                )));
            }
        }

        let mut missing: Vec<&str> = pending
            .iter()
            .map(String::as_str)
            .filter(|id| !seen.contains(id))
            .collect();
        if !missing.is_empty() {
            missing.sort_unstable();
            return Err(DomainError::UnmatchedToolResults(format!(
                "missing results for calls: {}",
                missing.join(", ")
            )));
        }

        self.entries.extend(results.iter().map(ThreadEntry::tool));
        Ok(())
    }
}
