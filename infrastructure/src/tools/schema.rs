//! JSON Schema tool converter.
//!
//! Default implementation of [`ToolSchemaPort`] that produces the
//! function-calling format of OpenAI-compatible chat completion APIs.

use gitsmith_application::ports::tool_schema::ToolSchemaPort;
use gitsmith_domain::tool::entities::{ParamType, ToolDefinition};
use serde_json::{Map, Value, json};

/// Converts tool definitions to `{"type": "function", "function": {...}}`.
///
/// Parameter type mapping:
/// - [`ParamType::String`] → `"string"`
/// - [`ParamType::Boolean`] → `"boolean"`
/// - [`ParamType::StringArray`] → `"array"` of `"string"`
pub struct JsonSchemaToolConverter;

fn param_schema(param_type: ParamType, description: &str) -> Value {
    match param_type {
        ParamType::String => json!({ "type": "string", "description": description }),
        ParamType::Boolean => json!({ "type": "boolean", "description": description }),
        ParamType::StringArray => json!({
            "type": "array",
            "items": { "type": "string" },
            "description": description,
        }),
    }
}

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> Value {
        let properties: Map<String, Value> = tool
            .parameters
            .iter()
            .map(|p| (p.name.clone(), param_schema(p.param_type, &p.description)))
            .collect();
        let required: Vec<&str> = tool.required_parameters().collect();

        json!({
            "type": "function",
            "function": {
                "name": tool.name,
                "description": tool.description,
                "parameters": {
                    "type": "object",
                    "properties": properties,
                    "required": required,
                }
            }
        })
    }
}
