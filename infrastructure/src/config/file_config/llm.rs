//! Language-model configuration from TOML (`[llm]` section)

use serde::{Deserialize, Serialize};

pub const DEFAULT_INSTRUCTIONS: &str =
    "You control github api calls to manage a project and codebase.";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLlmConfig {
    /// `OPENAI_API_KEY`
    pub api_key: Option<String>,
    /// `OPENAI_MODEL`
    pub model: String,
    /// `OPENAI_BASE_URL`; any OpenAI-compatible endpoint
    pub base_url: Option<String>,
    /// System prompt for the agent
    pub instructions: String,
    /// Per-request timeout; unset means no timeout
    pub request_timeout_secs: Option<u64>,
}

impl Default for FileLlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gpt-4o".to_string(),
            base_url: None,
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
            request_timeout_secs: None,
        }
    }
}
