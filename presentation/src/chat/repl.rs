//! REPL (Read-Eval-Print Loop) for interactive chat

use crate::ConsoleFormatter;
use crate::config::ReplConfig;
use crate::progress::reporter::ChatProgressReporter;
use colored::Colorize;
use gitsmith_application::{ChatProgressNotifier, NoChatProgress, RunChatUseCase};
use reedline::{DefaultPrompt, DefaultPromptSegment, FileBackedHistory, Reedline, Signal};
use std::sync::Arc;

const HISTORY_SIZE: usize = 1000;

/// What a slash command asks the loop to do
#[derive(Debug, PartialEq, Eq)]
enum CommandOutcome {
    Continue,
    Quit,
}

/// Interactive chat REPL
///
/// Every line is one turn on the same conversation thread. A failed turn is
/// reported and the loop continues.
pub struct ChatRepl {
    use_case: Arc<RunChatUseCase>,
    config: ReplConfig,
    show_progress: bool,
}

impl ChatRepl {
    pub fn new(use_case: Arc<RunChatUseCase>) -> Self {
        Self {
            use_case,
            config: ReplConfig::default(),
            show_progress: true,
        }
    }

    pub fn with_config(mut self, config: ReplConfig) -> Self {
        self.config = config;
        self
    }

    /// Set whether to show progress
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Run the interactive REPL until /quit or end of input
    pub async fn run(&self) -> std::io::Result<()> {
        let mut editor = Reedline::create();
        if let Some(path) = self.config.history_path() {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            match FileBackedHistory::with_file(HISTORY_SIZE, path) {
                Ok(history) => editor = editor.with_history(Box::new(history)),
                Err(e) => eprintln!("{} history disabled: {}", "warning:".yellow(), e),
            }
        }

        let prompt = DefaultPrompt::new(
            DefaultPromptSegment::Basic("gitsmith".to_string()),
            DefaultPromptSegment::Empty,
        );

        self.print_welcome();

        loop {
            match editor.read_line(&prompt)? {
                Signal::Success(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    if line.starts_with('/') {
                        if self.handle_command(line) == CommandOutcome::Quit {
                            break;
                        }
                        continue;
                    }
                    self.process_message(line).await;
                }
                Signal::CtrlC => {
                    println!("^C");
                }
                Signal::CtrlD => {
                    println!("Bye!");
                    break;
                }
                #[allow(unreachable_patterns)]
                _ => {}
            }
        }

        Ok(())
    }

    /// Run one turn and print the result; errors are printed, not returned
    pub async fn process_message(&self, message: &str) {
        println!();
        let reporter = ChatProgressReporter::new();
        let progress: &dyn ChatProgressNotifier = if self.show_progress {
            &reporter
        } else {
            &NoChatProgress
        };

        match self.use_case.send(message, progress).await {
            Ok(turn) => print!("{}", ConsoleFormatter::format_turn(&turn)),
            Err(e) => eprintln!("{} {}", "Error:".red().bold(), e),
        }
        println!();
    }

    fn print_welcome(&self) {
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│              gitsmith - Chat Mode           │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!(
            "Tools: {}",
            self.use_case.tool_executor().tool_spec().len()
        );
        println!();
        Self::print_help();
    }

    fn print_help() {
        println!("Commands:");
        println!("  /help, /h, /?    - Show this help");
        println!("  /tools           - List the available tools");
        println!("  /quit, /exit, /q - Exit chat");
        println!();
    }

    fn handle_command(&self, cmd: &str) -> CommandOutcome {
        match cmd {
            "/quit" | "/exit" | "/q" => {
                println!("Bye!");
                CommandOutcome::Quit
            }
            "/help" | "/h" | "/?" => {
                println!();
                Self::print_help();
                CommandOutcome::Continue
            }
            "/tools" => {
                println!();
                print!(
                    "{}",
                    ConsoleFormatter::format_tools(self.use_case.tool_executor().tool_spec())
                );
                println!();
                CommandOutcome::Continue
            }
            _ => {
                println!("Unknown command: {}", cmd);
                println!("Type /help for available commands");
                CommandOutcome::Continue
            }
        }
    }
}
