//! Tool domain module
//!
//! This module defines the **Tool Contract**: the closed set of operations the
//! conversational agent may ask for, how a request is decoded, and how its
//! outcome is reported back.
//!
//! # Overview
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌───────────────┐    ┌──────────────┐
//! │ ToolSpec     │───▶│ ToolCall     │───▶│ RepoOperation │───▶│ ToolResult   │
//! │ (registry)   │    │ (request)    │    │ (typed)       │    │ (outcome)    │
//! └──────────────┘    └──────────────┘    └───────────────┘    └──────────────┘
//! ```
//!
//! # Closed World
//!
//! [`ToolKind`](operation::ToolKind) enumerates every operation and produces
//! its [`ToolDefinition`]. [`RepoOperation`](operation::RepoOperation) is the
//! decoded form the dispatcher matches on. A name outside `ToolKind` never
//! decodes, so the model cannot reach a side effect that was not registered.
//!
//! # Targets
//!
//! | Target | Tools |
//! |--------|-------|
//! | **Working copy** | `git_add_files`, `git_commit`, `git_create_branch`, `git_checkout_branch`, `git_pull`, `git_push`, `git_create_local_repository` |
//! | **Remote host** | `git_clone_repository`, `github_create_repository` |

pub mod entities;
pub mod operation;
pub mod value_objects;

pub use entities::{ToolCall, ToolDefinition, ToolSpec};
pub use operation::{RepoOperation, ToolKind};
pub use value_objects::{ToolError, ToolOutcome, ToolResult};
