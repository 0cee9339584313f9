//! Port for structured conversation logging.
//!
//! Separate from `tracing`: tracing carries diagnostics, this port records
//! the chat transcript (user messages, tool calls, tool results, replies)
//! in a machine-readable form.

use serde_json::Value;

/// A structured conversation event.
pub struct ConversationEvent {
    /// Event type identifier (e.g., "user_message", "tool_call", "tool_result").
    pub event_type: &'static str,
    pub payload: Value,
}

impl ConversationEvent {
    pub fn new(event_type: &'static str, payload: Value) -> Self {
        Self {
            event_type,
            payload,
        }
    }
}

/// Implementations write each event as one record. `log` is synchronous and
/// infallible; write failures are the adapter's concern.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}
