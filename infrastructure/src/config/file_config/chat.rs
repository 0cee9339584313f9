//! Chat configuration from TOML (`[chat]` section)

use super::{ConfigValidationError, FileConfig, non_empty};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileChatConfig {
    /// Sent as the first message when `gitsmith chat` gets no MESSAGE
    pub opening_message: Option<String>,
    /// JSONL transcript path
    pub conversation_log: Option<String>,
    /// REPL history file (default: data dir)
    pub history_file: Option<String>,
}

/// Everything `gitsmith chat` needs, validated
#[derive(Debug, Clone)]
pub struct ChatSettings {
    pub api_key: String,
    pub model: String,
    pub base_url: Option<String>,
    pub instructions: String,
    pub request_timeout: Option<Duration>,
    /// Used by the remote-host tool; unset means those calls fail with
    /// an authentication error
    pub github_token: Option<String>,
    pub github_api_url: Option<String>,
    pub opening_message: Option<String>,
    pub conversation_log: Option<PathBuf>,
    pub history_file: Option<PathBuf>,
}

impl FileConfig {
    pub fn chat_settings(&self) -> Result<ChatSettings, ConfigValidationError> {
        let llm = &self.llm;
        let api_key = non_empty(&llm.api_key).ok_or(ConfigValidationError::MissingApiKey)?;
        if llm.request_timeout_secs == Some(0) {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        Ok(ChatSettings {
            api_key: api_key.to_string(),
            model: llm.model.trim().to_string(),
            base_url: non_empty(&llm.base_url).map(str::to_string),
            instructions: llm.instructions.clone(),
            request_timeout: llm.request_timeout_secs.map(Duration::from_secs),
            github_token: non_empty(&self.github.token).map(str::to_string),
            github_api_url: non_empty(&self.github.api_url).map(str::to_string),
            opening_message: non_empty(&self.chat.opening_message).map(str::to_string),
            conversation_log: non_empty(&self.chat.conversation_log).map(PathBuf::from),
            history_file: non_empty(&self.chat.history_file).map(PathBuf::from),
        })
    }
}
