//! Conversation domain.
//!
//! - [`entities::ConversationThread`] - append-only transcript of one chat process
//! - [`response::LlmResponse`] - a model reply (text and/or tool calls)
//! - [`turn::TurnState`] - per-turn dispatch state machine

pub mod entities;
pub mod response;
pub mod turn;
