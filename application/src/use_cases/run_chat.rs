//! Run Chat use case.
//!
//! One conversation thread per use case instance. Each call to
//! [`RunChatUseCase::send`] is one turn: the user message goes to the model,
//! every batch of proposed tool calls is dispatched and answered, and the
//! turn ends when the model replies without tool calls.
//!
//! There is no turn limit and no cancellation; a dispatched batch always runs
//! to completion before its results are submitted.

use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::llm_gateway::{GatewayError, LlmGateway, LlmSession};
use crate::ports::progress::ChatProgressNotifier;
use crate::ports::tool_executor::ToolExecutorPort;
use crate::ports::tool_schema::ToolSchemaPort;
use gitsmith_domain::util::preview;
use gitsmith_domain::{DomainError, ToolOutcome, ToolResult, TurnState};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum RunChatError {
    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Conversation(#[from] DomainError),

    #[error("Message must not be empty")]
    EmptyMessage,
}

/// What one turn produced
#[derive(Debug, Clone)]
pub struct ChatTurn {
    /// Final assistant reply
    pub reply: String,
    /// Every tool result of the turn, in dispatch order
    pub tool_results: Vec<ToolResult>,
    /// Number of dispatched batches
    pub rounds: usize,
}

pub struct RunChatUseCase {
    gateway: Arc<dyn LlmGateway>,
    tool_executor: Arc<dyn ToolExecutorPort>,
    tool_schema: Arc<dyn ToolSchemaPort>,
    conversation_logger: Arc<dyn ConversationLogger>,
    instructions: Option<String>,
    session: OnceCell<Box<dyn LlmSession>>,
}

impl RunChatUseCase {
    pub fn new(
        gateway: Arc<dyn LlmGateway>,
        tool_executor: Arc<dyn ToolExecutorPort>,
        tool_schema: Arc<dyn ToolSchemaPort>,
    ) -> Self {
        Self {
            gateway,
            tool_executor,
            tool_schema,
            conversation_logger: Arc::new(NoConversationLogger),
            instructions: None,
            session: OnceCell::new(),
        }
    }

    /// System prompt for the thread
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.instructions = Some(instructions.into());
        self
    }

    pub fn with_conversation_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.conversation_logger = logger;
        self
    }

    pub fn tool_executor(&self) -> &Arc<dyn ToolExecutorPort> {
        &self.tool_executor
    }

    async fn session(&self) -> Result<&dyn LlmSession, GatewayError> {
        let session = self
            .session
            .get_or_try_init(|| async {
                debug!("Opening conversation with model {}", self.gateway.model());
                match &self.instructions {
                    Some(prompt) => self.gateway.create_session_with_system_prompt(prompt).await,
                    None => self.gateway.create_session().await,
                }
            })
            .await?;
        Ok(session.as_ref())
    }

    /// Run one turn on the shared thread.
    pub async fn send(
        &self,
        message: &str,
        progress: &dyn ChatProgressNotifier,
    ) -> Result<ChatTurn, RunChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(RunChatError::EmptyMessage);
        }
        info!("Chat turn: {}", preview(message, 100));

        let session = self.session().await?;
        let tools = self
            .tool_schema
            .all_tools_schema(self.tool_executor.tool_spec());

        self.conversation_logger.log(ConversationEvent::new(
            "user_message",
            serde_json::json!({ "text": message }),
        ));

        progress.on_model_request();
        let mut response = session.send_with_tools(message, &tools).await?;
        progress.on_model_response();

        let mut state = TurnState::AwaitingModel.on_response(&response)?;
        let mut tool_results = Vec::new();
        let mut rounds = 0;

        loop {
            match state {
                TurnState::Dispatching(calls) => {
                    rounds += 1;
                    debug!("Dispatch round {}: {} tool call(s)", rounds, calls.len());

                    let mut results = Vec::with_capacity(calls.len());
                    for call in &calls {
                        self.conversation_logger.log(ConversationEvent::new(
                            "tool_call",
                            serde_json::json!({
                                "id": call.id,
                                "tool": call.tool_name,
                                "arguments": call.arguments_value(),
                            }),
                        ));
                        progress.on_tool_start(call);
                        let result = self.tool_executor.execute(call).await;
                        progress.on_tool_complete(&result);
                        self.log_result(&result);
                        results.push(result);
                    }

                    progress.on_model_request();
                    response = session.send_tool_results(&results).await?;
                    progress.on_model_response();

                    tool_results.extend(results);
                    state = TurnState::Dispatching(calls)
                        .on_results_submitted()?
                        .on_response(&response)?;
                }
                TurnState::TurnComplete(reply) => {
                    info!("Chat turn completed after {} dispatch round(s)", rounds);
                    self.conversation_logger.log(ConversationEvent::new(
                        "assistant_message",
                        serde_json::json!({ "text": reply, "rounds": rounds }),
                    ));
                    return Ok(ChatTurn {
                        reply,
                        tool_results,
                        rounds,
                    });
                }
                TurnState::AwaitingModel => {
                    return Err(DomainError::InvalidTurnTransition(
                        "loop observed awaiting_model without a reply".to_string(),
                    )
                    .into());
                }
            }
        }
    }

    fn log_result(&self, result: &ToolResult) {
        let payload = match &result.outcome {
            ToolOutcome::Success(message) => serde_json::json!({
                "id": result.call_id,
                "tool": result.tool_name,
                "success": true,
                "output": message,
            }),
            ToolOutcome::Error(e) => serde_json::json!({
                "id": result.call_id,
                "tool": result.tool_name,
                "success": false,
                "error": e.to_string(),
            }),
        };
        self.conversation_logger
            .log(ConversationEvent::new("tool_result", payload));
    }
}
