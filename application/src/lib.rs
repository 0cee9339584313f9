//! Application layer for gitsmith
//!
//! This crate contains use cases and port definitions.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    llm_gateway::{GatewayError, LlmGateway, LlmSession},
    progress::{BootstrapProgressNotifier, ChatProgressNotifier, NoBootstrapProgress, NoChatProgress},
    repository_host::{FileWrite, HostError, RepositoryHostPort},
    tool_executor::ToolExecutorPort,
    tool_schema::ToolSchemaPort,
    version_control::{GitError, VersionControlPort},
};
pub use use_cases::dispatch_tools::ToolDispatcher;
pub use use_cases::run_bootstrap::{RunBootstrapError, RunBootstrapInput, RunBootstrapUseCase};
pub use use_cases::run_chat::{ChatTurn, RunChatError, RunChatUseCase};
