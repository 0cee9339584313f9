//! Tool Executor port
//!
//! Defines the interface for executing tool calls proposed by the model.

use async_trait::async_trait;
use gitsmith_domain::tool::{
    entities::{ToolCall, ToolDefinition, ToolSpec},
    value_objects::ToolResult,
};

/// Port for tool execution
///
/// `execute` never fails: decoding and execution errors come back as error
/// results so every call gets an answer.
#[async_trait]
pub trait ToolExecutorPort: Send + Sync {
    /// Get the specification of all available tools
    fn tool_spec(&self) -> &ToolSpec;

    fn has_tool(&self, name: &str) -> bool {
        self.tool_spec().get(name).is_some()
    }

    fn get_tool(&self, name: &str) -> Option<&ToolDefinition> {
        self.tool_spec().get(name)
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult;

    /// Execute calls one at a time, in order, returning one result per call
    async fn execute_batch(&self, calls: &[ToolCall]) -> Vec<ToolResult> {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            results.push(self.execute(call).await);
        }
        results
    }
}
