//! Per-turn dispatch state machine
//!
//! ```text
//!                 reply with calls                results submitted
//! AwaitingModel ───────────────────▶ Dispatching ──────────────────▶ AwaitingModel
//!       │
//!       │ reply without calls
//!       ▼
//! TurnComplete
//! ```

use super::response::LlmResponse;
use crate::core::error::DomainError;
use crate::tool::entities::ToolCall;

#[derive(Debug, Clone, PartialEq)]
pub enum TurnState {
    /// A request to the model is outstanding
    AwaitingModel,
    /// The model asked for these calls; results are being collected
    Dispatching(Vec<ToolCall>),
    /// The model answered without tool calls
    TurnComplete(String),
}

impl TurnState {
    /// Transition on a model reply. Only valid while awaiting the model.
    pub fn on_response(self, response: &LlmResponse) -> Result<Self, DomainError> {
        match self {
            TurnState::AwaitingModel => {
                let calls = response.tool_calls();
                if calls.is_empty() {
                    Ok(TurnState::TurnComplete(response.text_content()))
                } else {
                    Ok(TurnState::Dispatching(calls))
                }
            }
            other => Err(DomainError::InvalidTurnTransition(format!(
                "model reply received in state {}",
                other.name()
            ))),
        }
    }

    /// Transition once a batch's results have been handed back to the model.
    pub fn on_results_submitted(self) -> Result<Self, DomainError> {
        match self {
            TurnState::Dispatching(_) => Ok(TurnState::AwaitingModel),
            other => Err(DomainError::InvalidTurnTransition(format!(
                "results submitted in state {}",
                other.name()
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TurnState::AwaitingModel => "awaiting_model",
            TurnState::Dispatching(_) => "dispatching",
            TurnState::TurnComplete(_) => "turn_complete",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::response::{ContentBlock, StopReason};

    fn tool_reply() -> LlmResponse {
        LlmResponse {
            content: vec![ContentBlock::ToolUse {
                id: "call_1".to_string(),
                name: "git_pull".to_string(),
                input: Default::default(),
            }],
            stop_reason: Some(StopReason::ToolUse),
            model: None,
        }
    }

    #[test]
    fn test_full_cycle() {
        let state = TurnState::AwaitingModel.on_response(&tool_reply()).unwrap();
        match &state {
            TurnState::Dispatching(calls) => assert_eq!(calls[0].id, "call_1"),
            other => panic!("unexpected state: {:?}", other),
        }

        let state = state.on_results_submitted().unwrap();
        assert_eq!(state, TurnState::AwaitingModel);

        let state = state.on_response(&LlmResponse::from_text("Pulled.")).unwrap();
        assert_eq!(state, TurnState::TurnComplete("Pulled.".to_string()));
    }

    #[test]
    fn test_invalid_transitions() {
        let done = TurnState::TurnComplete("x".to_string());
        assert!(done.clone().on_response(&tool_reply()).is_err());
        assert!(done.on_results_submitted().is_err());

        let err = TurnState::AwaitingModel.on_results_submitted().unwrap_err();
        assert!(err.to_string().contains("awaiting_model"));
    }
}
