//! Infrastructure layer for gitsmith
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer, including configuration file loading.

pub mod config;
pub mod git;
pub mod github;
pub mod llm;
pub mod logging;
pub mod tasks;
pub mod tools;

// Re-export commonly used types
pub use config::{
    BootstrapSettings, ChatSettings, ConfigLoader, ConfigValidationError, FileConfig,
};
pub use git::CommandGitClient;
pub use github::GitHubClient;
pub use llm::{OpenAiGateway, OpenAiSession};
pub use logging::JsonlConversationLogger;
pub use tasks::{TaskPlanError, load_task_plan};
pub use tools::JsonSchemaToolConverter;
