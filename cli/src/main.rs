//! CLI entrypoint for gitsmith
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use gitsmith_application::{
    BootstrapProgressNotifier, ChatProgressNotifier, NoBootstrapProgress, NoChatProgress,
    RepositoryHostPort, RunBootstrapInput, RunBootstrapUseCase, RunChatUseCase, ToolDispatcher,
};
use gitsmith_domain::render_readme;
use gitsmith_infrastructure::{
    BootstrapSettings, ChatSettings, CommandGitClient, ConfigLoader, FileConfig, GitHubClient,
    JsonSchemaToolConverter, JsonlConversationLogger, OpenAiGateway, load_task_plan,
};
use gitsmith_presentation::{
    BootstrapProgressReporter, ChatProgressReporter, ChatRepl, Cli, Command, ConsoleFormatter,
    OutputConfig, OutputFormat, ReplConfig,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // A missing .env is fine
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    // Initialize logging: RUST_LOG wins, otherwise the verbosity level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(match (cli.quiet, cli.verbose) {
            (true, 0) => "error",
            (_, 0) => "warn",
            (_, 1) => "info",
            (_, 2) => "debug",
            _ => "trace", // -vvv or more
        })
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_deref());
        return Ok(ExitCode::SUCCESS);
    }

    let config = if cli.no_config {
        ConfigLoader::load_without_files()
    } else {
        ConfigLoader::load(cli.config.as_deref())
    }
    .context("Failed to load configuration")?;

    let output = OutputConfig {
        color: config.output.color,
        show_progress: !cli.quiet,
    };
    output.apply();

    match cli.command {
        Some(Command::Bootstrap {
            tasks,
            dry_run,
            output: format,
        }) => run_bootstrap(&config, tasks, dry_run, format, &output).await,
        Some(Command::Chat { message }) => run_chat(&config, message, &output).await,
        None => {
            Cli::command().print_help()?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

async fn run_bootstrap(
    config: &FileConfig,
    tasks: Option<PathBuf>,
    dry_run: bool,
    format: OutputFormat,
    output: &OutputConfig,
) -> Result<ExitCode> {
    let BootstrapSettings {
        token,
        api_url,
        profile,
        tasks_file,
        readme_file,
    } = config.bootstrap_settings(tasks)?;

    let plan = load_task_plan(&tasks_file)?;

    if dry_run {
        print!("{}", ConsoleFormatter::format_plan(&profile, &plan));
        println!("\n{}", render_readme(&profile, &plan));
        return Ok(ExitCode::SUCCESS);
    }

    let mut input = RunBootstrapInput::new(profile, plan);
    if let Some(path) = readme_file {
        let readme = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read README file {}", path.display()))?;
        input = input.with_readme(readme);
    }

    // === Dependency Injection ===
    let host: Arc<dyn RepositoryHostPort> = Arc::new(match api_url {
        Some(url) => GitHubClient::with_api_url(&token, &url)?,
        None => GitHubClient::new(&token)?,
    });
    let use_case = RunBootstrapUseCase::new(host);

    let reporter = BootstrapProgressReporter::new();
    let progress: &dyn BootstrapProgressNotifier = if output.show_progress {
        &reporter
    } else {
        &NoBootstrapProgress
    };

    let report = use_case.execute(input, progress).await?;

    match format {
        OutputFormat::Text => print!("{}", ConsoleFormatter::format_report(&report)),
        OutputFormat::Json => println!("{}", ConsoleFormatter::format_report_json(&report)),
    }

    if report.has_failures() {
        warn!("{} entities failed to provision", report.failures().count());
        return Ok(ExitCode::from(2));
    }
    Ok(ExitCode::SUCCESS)
}

async fn run_chat(
    config: &FileConfig,
    message: Option<String>,
    output: &OutputConfig,
) -> Result<ExitCode> {
    let settings = config.chat_settings()?;
    let use_case = Arc::new(build_chat(&settings)?);

    // One-shot: the argument, else the configured opening message
    if let Some(message) = message.or_else(|| settings.opening_message.clone()) {
        let reporter = ChatProgressReporter::new();
        let progress: &dyn ChatProgressNotifier = if output.show_progress {
            &reporter
        } else {
            &NoChatProgress
        };
        let turn = use_case.send(&message, progress).await?;
        print!("{}", ConsoleFormatter::format_turn(&turn));
        return Ok(ExitCode::SUCCESS);
    }

    let repl = ChatRepl::new(use_case)
        .with_config(ReplConfig {
            history_file: settings.history_file.clone(),
        })
        .with_progress(output.show_progress);
    repl.run().await?;
    Ok(ExitCode::SUCCESS)
}

fn build_chat(settings: &ChatSettings) -> Result<RunChatUseCase> {
    // === Dependency Injection ===
    let git = Arc::new(CommandGitClient::new()?);

    let token = settings.github_token.as_deref().unwrap_or_else(|| {
        warn!("GITHUB_TOKEN is not set; repository creation will fail");
        ""
    });
    let host = Arc::new(match &settings.github_api_url {
        Some(url) => GitHubClient::with_api_url(token, url)?,
        None => GitHubClient::new(token)?,
    });

    let mut gateway = OpenAiGateway::builder(&settings.api_key)
        .model(&settings.model)
        .timeout(settings.request_timeout);
    if let Some(url) = &settings.base_url {
        gateway = gateway.base_url(url);
    }
    let gateway = Arc::new(gateway.build()?);

    let mut use_case = RunChatUseCase::new(
        gateway,
        Arc::new(ToolDispatcher::new(git, host)),
        Arc::new(JsonSchemaToolConverter),
    )
    .with_instructions(&settings.instructions);

    if let Some(path) = &settings.conversation_log {
        let logger = JsonlConversationLogger::open(path)
            .with_context(|| format!("Failed to open conversation log {}", path.display()))?;
        info!("Logging conversation to {}", logger.path().display());
        use_case = use_case.with_conversation_logger(Arc::new(logger));
    }

    Ok(use_case)
}
