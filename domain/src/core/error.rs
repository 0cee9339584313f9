//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid repository reference: {0}")]
    InvalidRepoRef(String),

    #[error("Invalid task plan: {0}")]
    InvalidTaskPlan(String),

    #[error("Tool results do not match pending tool calls: {0}")]
    UnmatchedToolResults(String),

    #[error("Invalid turn transition: {0}")]
    InvalidTurnTransition(String),
}

impl DomainError {
    /// Check if this error is a broken call/result pairing
    pub fn is_unmatched_results(&self) -> bool {
        matches!(self, DomainError::UnmatchedToolResults(_))
    }
}
