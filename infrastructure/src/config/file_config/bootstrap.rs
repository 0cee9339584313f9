//! Bootstrap configuration from TOML (`[bootstrap]` section)

use super::{ConfigValidationError, FileConfig, non_empty};
use gitsmith_domain::bootstrap::profile::{DEFAULT_LABEL_COLOR, is_valid_label_color};
use gitsmith_domain::{ProjectProfile, RepoRef};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBootstrapConfig {
    /// YAML task plan
    pub tasks_file: String,
    /// Repository description, also rendered into the README
    pub description: String,
    pub private: bool,
    /// ProjectV2 board title (default: "<repository> Project")
    pub project_title: Option<String>,
    pub label_color: String,
    /// Use this file as README instead of rendering one
    pub readme_file: Option<String>,
}

impl Default for FileBootstrapConfig {
    fn default() -> Self {
        Self {
            tasks_file: "milestones.yaml".to_string(),
            description: String::new(),
            private: false,
            project_title: None,
            label_color: DEFAULT_LABEL_COLOR.to_string(),
            readme_file: None,
        }
    }
}

/// Everything `gitsmith bootstrap` needs, validated
#[derive(Debug, Clone)]
pub struct BootstrapSettings {
    pub token: String,
    pub api_url: Option<String>,
    pub profile: ProjectProfile,
    pub tasks_file: PathBuf,
    pub readme_file: Option<PathBuf>,
}

impl FileConfig {
    /// Resolve the bootstrap settings; `tasks_file` overrides the configured plan
    pub fn bootstrap_settings(
        &self,
        tasks_file: Option<PathBuf>,
    ) -> Result<BootstrapSettings, ConfigValidationError> {
        let token = non_empty(&self.github.token).ok_or(ConfigValidationError::MissingGithubToken)?;
        let repo = self.repo_ref()?;

        let section = &self.bootstrap;
        let color = section.label_color.trim().trim_start_matches('#');
        if !is_valid_label_color(color) {
            return Err(ConfigValidationError::InvalidLabelColor(
                section.label_color.clone(),
            ));
        }

        let mut profile = ProjectProfile::new(repo)
            .with_description(section.description.trim())
            .with_private(section.private)
            .with_label_color(color.to_ascii_lowercase());
        if let Some(title) = non_empty(&section.project_title) {
            profile = profile.with_project_title(title);
        }

        Ok(BootstrapSettings {
            token: token.to_string(),
            api_url: non_empty(&self.github.api_url).map(str::to_string),
            profile,
            tasks_file: tasks_file.unwrap_or_else(|| PathBuf::from(&section.tasks_file)),
            readme_file: non_empty(&section.readme_file).map(PathBuf::from),
        })
    }

    /// Target repository, without requiring a token
    pub fn repo_ref(&self) -> Result<RepoRef, ConfigValidationError> {
        let owner =
            non_empty(&self.github.username).ok_or(ConfigValidationError::MissingGithubUsername)?;
        let name =
            non_empty(&self.github.repository).ok_or(ConfigValidationError::MissingRepository)?;
        Ok(RepoRef::new(owner, name))
    }
}
