//! Domain layer for gitsmith
//!
//! This crate contains the core entities and value objects shared by the
//! conversational agent and the bootstrap runner. It performs no I/O.
//!
//! # Core Concepts
//!
//! ## Tool Contract
//!
//! The agent may only ask for operations from a closed set. Each operation is
//! a [`ToolKind`] (name + parameter schema, handed to the language model) and
//! a [`RepoOperation`] (the decoded, typed request the dispatcher executes).
//! Both are exhaustive enums, so the registry and the dispatcher mapping can
//! only change together.
//!
//! ## Conversation Thread
//!
//! A [`ConversationThread`] is the append-only transcript of one chat
//! process. It refuses tool results that do not answer exactly the pending
//! tool calls of the last assistant message; such a batch of calls can be
//! discarded so the thread stays well-formed.
//!
//! ## Task Plan
//!
//! A [`TaskPlan`] is the declarative milestone/task description the
//! bootstrap runner materialises on the repository host.

pub mod bootstrap;
pub mod core;
pub mod session;
pub mod tool;
pub mod util;

// Re-export commonly used types
pub use bootstrap::{
    outcome::{BootstrapReport, EntityKind, ProvisionOutcome, ProvisionRecord},
    plan::{MilestonePlan, TaskItem, TaskPlan},
    profile::ProjectProfile,
    readme::render_readme,
};
pub use core::{
    error::DomainError,
    repo::{NewIssue, NewRepository, RemoteIssue, RemoteRepository, RepoRef},
};
pub use session::{
    entities::{ConversationThread, Role, ThreadEntry},
    response::{ContentBlock, LlmResponse, StopReason},
    turn::TurnState,
};
pub use tool::{
    entities::{ParamType, ToolCall, ToolDefinition, ToolParameter, ToolSpec, ToolTarget},
    operation::{RepoOperation, ToolKind},
    value_objects::{ToolError, ToolOutcome, ToolResult},
};
