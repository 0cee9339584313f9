//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for the bootstrap report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    #[default]
    Text,
    /// The report as JSON
    Json,
}

/// CLI arguments for gitsmith
#[derive(Parser, Debug)]
#[command(name = "gitsmith")]
#[command(author, version, about = "Repository agent and project bootstrapper for git and GitHub")]
#[command(long_about = r#"
gitsmith has two modes:

  chat       A conversational agent that stages, commits, branches, pulls,
             pushes, clones and creates repositories on request.
  bootstrap  Provisions a GitHub repository from a YAML task plan: README,
             labels, milestones, issues and a project board. Safe to re-run.

Configuration files are loaded from (in priority order):
1. Environment variables (GITHUB_TOKEN, GITHUB_USERNAME, REPO_NAME, OPENAI_API_KEY)
2. --config <path>                       Explicit config file
3. ./gitsmith.toml                       Project-level config
4. ~/.config/gitsmith/config.toml        Global config

A .env file in the working directory is read first.

Example:
  gitsmith bootstrap --tasks milestones.yaml --dry-run
  gitsmith chat "Stage a.py and b.py in ./work and commit them as 'init'"
  gitsmith chat
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Provision the configured repository from a task plan
    Bootstrap {
        /// Task plan (default: [bootstrap] tasks_file, "milestones.yaml")
        #[arg(short, long, value_name = "PATH")]
        tasks: Option<PathBuf>,

        /// Validate the plan and show what would be provisioned
        #[arg(long)]
        dry_run: bool,

        /// Report format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Talk to the repository agent
    Chat {
        /// Send one message, print the reply and exit
        message: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_bootstrap() {
        let cli = Cli::parse_from(["gitsmith", "-vv", "bootstrap", "--tasks", "plan.yaml", "--dry-run"]);
        assert_eq!(cli.verbose, 2);
        assert_eq!(
            cli.command,
            Some(Command::Bootstrap {
                tasks: Some(PathBuf::from("plan.yaml")),
                dry_run: true,
                output: OutputFormat::Text,
            })
        );
    }

    #[test]
    fn test_parse_chat() {
        let cli = Cli::parse_from(["gitsmith", "chat", "-q", "commit everything"]);
        assert!(cli.quiet);
        assert_eq!(
            cli.command,
            Some(Command::Chat {
                message: Some("commit everything".to_string())
            })
        );

        let cli = Cli::parse_from(["gitsmith", "--no-config", "chat"]);
        assert!(cli.no_config);
        assert_eq!(cli.command, Some(Command::Chat { message: None }));
    }
}
