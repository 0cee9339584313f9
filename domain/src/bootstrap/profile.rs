//! What the bootstrap runner provisions, independent of the task plan

use crate::core::repo::{NewRepository, RepoRef};
use serde::{Deserialize, Serialize};

pub const DEFAULT_LABEL_COLOR: &str = "c5def5";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectProfile {
    pub repo: RepoRef,
    pub description: String,
    pub private: bool,
    /// ProjectV2 board title
    pub project_title: String,
    /// Six-digit hex colour, no leading '#'
    pub label_color: String,
}

impl ProjectProfile {
    pub fn new(repo: RepoRef) -> Self {
        let project_title = format!("{} Project", repo.name);
        Self {
            repo,
            description: String::new(),
            private: false,
            project_title,
            label_color: DEFAULT_LABEL_COLOR.to_string(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_private(mut self, private: bool) -> Self {
        self.private = private;
        self
    }

    pub fn with_project_title(mut self, title: impl Into<String>) -> Self {
        self.project_title = title.into();
        self
    }

    pub fn with_label_color(mut self, color: impl Into<String>) -> Self {
        self.label_color = color.into();
        self
    }

    pub fn new_repository(&self) -> NewRepository {
        NewRepository::new(&self.repo.name)
            .with_description(&self.description)
            .with_private(self.private)
    }
}

/// Check a label colour the way the host expects it
pub fn is_valid_label_color(color: &str) -> bool {
    color.len() == 6 && color.chars().all(|c| c.is_ascii_hexdigit())
}
