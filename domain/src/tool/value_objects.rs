//! Tool domain value objects: errors and results
//!
//! | Code | Raised when |
//! |------|-------------|
//! | `NOT_FOUND` | The model named a tool outside the contract |
//! | `INVALID_ARGUMENT` | A required field is missing or has the wrong type |
//! | `EXECUTION_FAILED` | git or the repository host reported a failure |

use serde::{Deserialize, Serialize};

/// Error that occurred while decoding or executing a tool call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolError {
    /// Error code (e.g., "NOT_FOUND", "EXECUTION_FAILED")
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

impl ToolError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new("INVALID_ARGUMENT", message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new("EXECUTION_FAILED", message)
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for ToolError {}

/// Outcome of one tool call: exactly one of a success message or an error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum ToolOutcome {
    Success(String),
    Error(ToolError),
}

/// Result of executing a [`ToolCall`](super::entities::ToolCall)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Identifier of the originating call
    pub call_id: String,
    /// Name of the tool that was requested
    pub tool_name: String,
    pub outcome: ToolOutcome,
}

impl ToolResult {
    pub fn success(
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            outcome: ToolOutcome::Success(message.into()),
        }
    }

    pub fn failure(call_id: impl Into<String>, tool_name: impl Into<String>, error: ToolError) -> Self {
        Self {
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            outcome: ToolOutcome::Error(error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ToolOutcome::Success(_))
    }

    pub fn error(&self) -> Option<&ToolError> {
        match &self.outcome {
            ToolOutcome::Error(e) => Some(e),
            ToolOutcome::Success(_) => None,
        }
    }

    /// Text returned to the model for this call
    pub fn feedback_text(&self) -> String {
        match &self.outcome {
            ToolOutcome::Success(message) => message.clone(),
            ToolOutcome::Error(e) => format!("Error: {}", e.message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_error_display() {
        let err = ToolError::execution_failed("fatal: not a git repository");
        assert_eq!(err.to_string(), "[EXECUTION_FAILED] fatal: not a git repository");
        assert_eq!(ToolError::not_found("x").code, "NOT_FOUND");
        assert_eq!(ToolError::invalid_argument("x").code, "INVALID_ARGUMENT");
    }

    #[test]
    fn test_feedback_text() {
        let ok = ToolResult::success("c1", "git_commit", "Committed changes with message: 'init'");
        assert!(ok.is_success());
        assert!(ok.error().is_none());
        assert_eq!(ok.feedback_text(), "Committed changes with message: 'init'");

        let failed = ToolResult::failure(
            "c2",
            "git_push",
            ToolError::execution_failed("src refspec main does not match any"),
        );
        assert!(!failed.is_success());
        assert_eq!(failed.error().unwrap().code, "EXECUTION_FAILED");
        assert_eq!(
            failed.feedback_text(),
            "Error: src refspec main does not match any"
        );
    }

    #[test]
    fn test_outcome_serialization() {
        let ok = ToolResult::success("c1", "git_pull", "done");
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["outcome"]["status"], "success");
        assert_eq!(json["outcome"]["value"], "done");
    }
}
