//! GitHub configuration from TOML (`[github]` section)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileGithubConfig {
    /// Personal access token (`GITHUB_TOKEN`)
    pub token: Option<String>,
    /// Account that owns the repository (`GITHUB_USERNAME`)
    pub username: Option<String>,
    /// Repository name (`REPO_NAME`)
    pub repository: Option<String>,
    /// API root, for GitHub Enterprise
    pub api_url: Option<String>,
}
