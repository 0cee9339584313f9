//! Progress reporting for chat turns and bootstrap runs

use colored::Colorize;
use gitsmith_application::ports::progress::{BootstrapProgressNotifier, ChatProgressNotifier};
use gitsmith_domain::{ProvisionOutcome, ProvisionRecord, ToolCall, ToolResult};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner:.green} {prefix:.bold.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn start_spinner(prefix: &str, message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(spinner_style());
    pb.set_prefix(prefix.to_string());
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Spinner while the model thinks, one line per tool call
#[derive(Default)]
pub struct ChatProgressReporter {
    current: Mutex<Option<ProgressBar>>,
}

impl ChatProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }

    fn replace(&self, pb: Option<ProgressBar>) -> Option<ProgressBar> {
        match self.current.lock() {
            Ok(mut guard) => std::mem::replace(&mut *guard, pb),
            Err(_) => None,
        }
    }
}

impl ChatProgressNotifier for ChatProgressReporter {
    fn on_model_request(&self) {
        if let Some(old) = self.replace(Some(start_spinner("model", "thinking..."))) {
            old.finish_and_clear();
        }
    }

    fn on_model_response(&self) {
        if let Some(pb) = self.replace(None) {
            pb.finish_and_clear();
        }
    }

    fn on_tool_start(&self, call: &ToolCall) {
        let args = call.arguments_value().to_string();
        if let Some(old) = self.replace(Some(start_spinner(&call.tool_name, &args))) {
            old.finish_and_clear();
        }
    }

    fn on_tool_complete(&self, result: &ToolResult) {
        let Some(pb) = self.replace(None) else {
            return;
        };
        let status = match result.error() {
            None => format!("{} {}", "v".green(), result.tool_name),
            Some(e) => format!("{} {} {}", "x".red(), result.tool_name, e.code.dimmed()),
        };
        pb.set_style(ProgressStyle::default_spinner());
        pb.finish_with_message(status);
    }
}

/// One spinner per bootstrap step, finished with a tally of its records
#[derive(Default)]
pub struct BootstrapProgressReporter {
    step: Mutex<Option<StepState>>,
}

struct StepState {
    bar: ProgressBar,
    done: usize,
    failed: usize,
}

impl BootstrapProgressReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BootstrapProgressNotifier for BootstrapProgressReporter {
    fn on_step_start(&self, step: &str) {
        if let Ok(mut guard) = self.step.lock() {
            *guard = Some(StepState {
                bar: start_spinner(step, "working..."),
                done: 0,
                failed: 0,
            });
        }
    }

    fn on_record(&self, record: &ProvisionRecord) {
        let Ok(mut guard) = self.step.lock() else {
            return;
        };
        let Some(state) = guard.as_mut() else {
            return;
        };
        state.done += 1;
        if record.outcome.is_failure() {
            state.failed += 1;
            state
                .bar
                .println(format!("  {} {} {}", "x".red(), record.kind, record.key));
        }
        let verb = match record.outcome {
            ProvisionOutcome::AlreadyExists => "exists",
            _ => record.outcome.label(),
        };
        state.bar.set_message(format!("{} ({})", record.key, verb));
    }

    fn on_step_complete(&self, step: &str) {
        let Ok(mut guard) = self.step.lock() else {
            return;
        };
        let Some(state) = guard.take() else {
            return;
        };
        let mark = if state.failed == 0 {
            "v".green()
        } else {
            "!".yellow()
        };
        let tally = match (state.done, state.failed) {
            (0, _) => String::new(),
            (n, 0) => format!(" ({})", n),
            (n, f) => format!(" ({}, {} failed)", n, f),
        };
        state.bar.set_style(ProgressStyle::default_spinner());
        state.bar.finish_with_message(format!("{} {}{}", mark, step, tally));
    }
}
