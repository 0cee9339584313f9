//! Raw TOML configuration data types
//!
//! These structs mirror the config file. Each command resolves them into a
//! validated settings struct before anything is constructed.

mod bootstrap;
mod chat;
mod github;
mod llm;
mod output;

pub use bootstrap::{BootstrapSettings, FileBootstrapConfig};
pub use chat::{ChatSettings, FileChatConfig};
pub use github::FileGithubConfig;
pub use llm::{DEFAULT_INSTRUCTIONS, FileLlmConfig};
pub use output::FileOutputConfig;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("GitHub token is not set (GITHUB_TOKEN or [github] token)")]
    MissingGithubToken,

    #[error("GitHub username is not set (GITHUB_USERNAME or [github] username)")]
    MissingGithubUsername,

    #[error("Repository name is not set (REPO_NAME or [github] repository)")]
    MissingRepository,

    #[error("OpenAI API key is not set (OPENAI_API_KEY or [llm] api_key)")]
    MissingApiKey,

    #[error("Invalid label color '{0}' (expected 6 hex digits)")]
    InvalidLabelColor(String),

    #[error("request_timeout_secs cannot be 0")]
    InvalidTimeout,
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// GitHub credentials and target repository
    pub github: FileGithubConfig,
    /// Language-model service
    pub llm: FileLlmConfig,
    /// Declarative provisioning
    pub bootstrap: FileBootstrapConfig,
    /// Conversational agent
    pub chat: FileChatConfig,
    /// Output settings
    pub output: FileOutputConfig,
}

/// Treat blank strings as unset
pub(crate) fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
