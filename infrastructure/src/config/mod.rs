//! Configuration loading for gitsmith
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables (`GITHUB_TOKEN`, `OPENAI_API_KEY`, ...)
//! 2. `--config <path>` specified file
//! 3. Project root: `./gitsmith.toml` or `./.gitsmith.toml`
//! 4. Global: `$XDG_CONFIG_HOME/gitsmith/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    BootstrapSettings, ChatSettings, ConfigValidationError, DEFAULT_INSTRUCTIONS, FileBootstrapConfig,
    FileChatConfig, FileConfig, FileGithubConfig, FileLlmConfig, FileOutputConfig,
};
pub use loader::ConfigLoader;
