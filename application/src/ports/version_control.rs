//! Version control port
//!
//! One method per working-copy operation the agent can request. Every call
//! is independent: implementations keep no state about the working copy.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitError {
    #[error("git executable not found")]
    NotInstalled,

    /// Non-zero exit; `stderr` is trimmed
    #[error("git {command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// A branch, remote or URL that git would parse as an option
    #[error("option-like argument rejected: {0}")]
    OptionLikeArgument(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[async_trait]
pub trait VersionControlPort: Send + Sync {
    async fn stage(&self, repo: &Path, paths: &[String]) -> Result<(), GitError>;

    async fn commit(&self, repo: &Path, message: &str) -> Result<(), GitError>;

    async fn create_branch(&self, repo: &Path, name: &str) -> Result<(), GitError>;

    async fn checkout(&self, repo: &Path, name: &str) -> Result<(), GitError>;

    async fn pull(&self, repo: &Path, remote: &str, branch: &str) -> Result<(), GitError>;

    async fn push(&self, repo: &Path, remote: &str, branch: &str) -> Result<(), GitError>;

    async fn clone_repository(&self, url: &str, destination: &Path) -> Result<(), GitError>;

    /// Create an empty repository, creating `directory` if needed
    async fn init(&self, directory: &Path) -> Result<(), GitError>;
}
