//! Tool schema conversion port.
//!
//! Separates "which tools exist" (domain) from "how to serialize them for
//! the model API" (infrastructure).

use gitsmith_domain::tool::entities::{ToolDefinition, ToolSpec};

pub trait ToolSchemaPort: Send + Sync {
    /// Convert a single tool definition to the API's tool format.
    fn tool_to_schema(&self, tool: &ToolDefinition) -> serde_json::Value;

    /// Convert all tools (sorted by name).
    fn all_tools_schema(&self, spec: &ToolSpec) -> Vec<serde_json::Value> {
        spec.sorted()
            .into_iter()
            .map(|t| self.tool_to_schema(t))
            .collect()
    }
}
