//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["gitsmith.toml", ".gitsmith.toml"];

/// Environment variable → config key
const ENV_KEYS: [(&str, &str); 6] = [
    ("GITHUB_TOKEN", "github.token"),
    ("GITHUB_USERNAME", "github.username"),
    ("REPO_NAME", "github.repository"),
    ("OPENAI_API_KEY", "llm.api_key"),
    ("OPENAI_BASE_URL", "llm.base_url"),
    ("OPENAI_MODEL", "llm.model"),
];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./gitsmith.toml` or `./.gitsmith.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/gitsmith/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&Path>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        figment.merge(Self::env()).extract().map_err(Box::new)
    }

    /// Defaults plus environment, no files (for --no-config)
    pub fn load_without_files() -> Result<FileConfig, Box<figment::Error>> {
        Figment::new()
            .merge(Serialized::defaults(FileConfig::default()))
            .merge(Self::env())
            .extract()
            .map_err(Box::new)
    }

    fn env() -> Env {
        Env::raw()
            .only(&ENV_KEYS.map(|(var, _)| var))
            .map(|var| {
                ENV_KEYS
                    .iter()
                    .find(|(name, _)| var == *name)
                    .map(|(_, key)| (*key).into())
                    .unwrap_or_else(|| var.as_str().to_string().into())
            })
    }

    /// `$XDG_CONFIG_HOME/gitsmith/config.toml` (or the platform equivalent)
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("gitsmith").join("config.toml"))
    }

    /// The project-level config file, if one exists
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for --show-config)
    pub fn print_config_sources(config_path: Option<&Path>) {
        println!("Configuration sources (in priority order):");

        for (var, key) in ENV_KEYS {
            let state = if std::env::var_os(var).is_some() { "SET" } else { "   " };
            println!("  [{}] Env:     {} -> {}", state, var, key);
        }

        if let Some(path) = config_path {
            let state = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{}] Explicit: {}", state, path.display());
        }

        match Self::project_config_path() {
            Some(path) => println!("  [FOUND] Project: {}", path.display()),
            None => println!("  [     ] Project: ./gitsmith.toml or ./.gitsmith.toml"),
        }

        if let Some(path) = Self::global_config_path() {
            let state = if path.exists() { "FOUND" } else { "     " };
            println!("  [{}] Global:  {}", state, path.display());
        }

        println!("  [     ] Default: built-in defaults");
    }
}
