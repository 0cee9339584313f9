//! LLM Gateway port
//!
//! Defines the interface for communicating with the language-model service.

use async_trait::async_trait;
use gitsmith_domain::{DomainError, LlmResponse, ToolResult};
use thiserror::Error;

/// Errors that can occur during LLM gateway operations
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Request failed ({status}): {message}")]
    RequestFailed { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error(transparent)]
    Conversation(#[from] DomainError),

    #[error("Other error: {0}")]
    Other(String),
}

/// Gateway for LLM communication
///
/// Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait LlmGateway: Send + Sync {
    /// Model identifier used for new sessions
    fn model(&self) -> &str;

    async fn create_session(&self) -> Result<Box<dyn LlmSession>, GatewayError>;

    /// Create a session whose thread starts with a system prompt
    async fn create_session_with_system_prompt(
        &self,
        system_prompt: &str,
    ) -> Result<Box<dyn LlmSession>, GatewayError>;
}

/// An active conversation with the model.
///
/// The session owns the conversation thread. Each call appends to it and
/// returns the model's next reply.
#[async_trait]
pub trait LlmSession: Send + Sync {
    fn model(&self) -> &str;

    /// Append a user message and ask for a reply, offering `tools`
    async fn send_with_tools(
        &self,
        content: &str,
        tools: &[serde_json::Value],
    ) -> Result<LlmResponse, GatewayError>;

    /// Append results for every pending tool call and ask for the next reply.
    ///
    /// Results that do not answer exactly the pending calls are rejected with
    /// [`GatewayError::Conversation`] before anything is sent.
    async fn send_tool_results(&self, results: &[ToolResult]) -> Result<LlmResponse, GatewayError>;
}
