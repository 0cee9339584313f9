//! Repository host port
//!
//! Lookups return `Ok(None)` for absent entities so callers can implement
//! create-if-absent without inspecting error codes.

use async_trait::async_trait;
use gitsmith_domain::{MilestonePlan, NewIssue, NewRepository, RemoteIssue, RemoteRepository, RepoRef};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HostError {
    /// Validation failure reporting that the entity exists (HTTP 422 `already_exists`)
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Host API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl HostError {
    pub fn is_already_exists(&self) -> bool {
        matches!(self, HostError::AlreadyExists(_))
    }
}

/// Result of writing a file through the contents API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileWrite {
    Created,
    Updated,
}

#[async_trait]
pub trait RepositoryHostPort: Send + Sync {
    /// Node id of the authenticated user
    async fn viewer_id(&self) -> Result<String, HostError>;

    async fn find_repository(&self, repo: &RepoRef) -> Result<Option<RemoteRepository>, HostError>;

    /// Create a repository owned by the authenticated user
    async fn create_repository(&self, new: &NewRepository) -> Result<RemoteRepository, HostError>;

    /// Create or overwrite a file on the default branch
    async fn upsert_file(
        &self,
        repo: &RepoRef,
        path: &str,
        content: &str,
    ) -> Result<FileWrite, HostError>;

    async fn find_label(&self, repo: &RepoRef, name: &str) -> Result<Option<String>, HostError>;

    async fn create_label(&self, repo: &RepoRef, name: &str, color: &str) -> Result<(), HostError>;

    /// Milestone number by title
    async fn find_milestone(&self, repo: &RepoRef, title: &str) -> Result<Option<u64>, HostError>;

    async fn create_milestone(&self, repo: &RepoRef, milestone: &MilestonePlan) -> Result<u64, HostError>;

    async fn list_issues(&self, repo: &RepoRef) -> Result<Vec<RemoteIssue>, HostError>;

    async fn create_issue(&self, repo: &RepoRef, issue: &NewIssue) -> Result<RemoteIssue, HostError>;

    /// ProjectV2 id owned by `login` with exactly this title
    async fn find_project(&self, login: &str, title: &str) -> Result<Option<String>, HostError>;

    async fn create_project(&self, owner_id: &str, title: &str) -> Result<String, HostError>;

    /// Node ids of the content (issues, pull requests) already on the board
    async fn project_item_content_ids(&self, project_id: &str) -> Result<HashSet<String>, HostError>;

    async fn add_project_item(&self, project_id: &str, content_id: &str) -> Result<(), HostError>;
}
