//! Console output formatter for bootstrap reports and chat turns

use colored::Colorize;
use gitsmith_application::ChatTurn;
use gitsmith_domain::{
    BootstrapReport, EntityKind, ProjectProfile, ProvisionOutcome, ProvisionRecord, TaskPlan,
    ToolOutcome, ToolResult, ToolSpec,
};

const KIND_ORDER: [EntityKind; 7] = [
    EntityKind::Repository,
    EntityKind::Readme,
    EntityKind::Label,
    EntityKind::Milestone,
    EntityKind::Issue,
    EntityKind::Project,
    EntityKind::ProjectItem,
];

/// Formats results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the bootstrap report, grouped by entity kind
    pub fn format_report(report: &BootstrapReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Bootstrap Report"));
        output.push('\n');

        for kind in KIND_ORDER {
            let records: Vec<&ProvisionRecord> = report.of_kind(kind).collect();
            if records.is_empty() {
                continue;
            }
            output.push_str(&Self::section_header(&Self::plural(kind, records.len())));
            for record in records {
                output.push_str(&format!("  {}\n", Self::record_line(record)));
            }
        }

        output.push_str(&format!(
            "\n{} {} created, {} updated, {} already existed, {} failed\n",
            "Summary:".cyan().bold(),
            report.count(&ProvisionOutcome::Created),
            report.count(&ProvisionOutcome::Updated),
            report.count(&ProvisionOutcome::AlreadyExists),
            report.count(&ProvisionOutcome::Failed(String::new())),
        ));

        output.push_str(&Self::footer());
        output
    }

    /// Format the report as JSON
    pub fn format_report_json(report: &BootstrapReport) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "{}".to_string())
    }

    fn record_line(record: &ProvisionRecord) -> String {
        let status = match &record.outcome {
            ProvisionOutcome::Created => "created".green(),
            ProvisionOutcome::Updated => "updated".green(),
            ProvisionOutcome::AlreadyExists => "exists".dimmed(),
            ProvisionOutcome::Failed(_) => "failed".red().bold(),
        };
        match &record.outcome {
            ProvisionOutcome::Failed(reason) => {
                format!("{:>8}  {}\n{}", status, record.key, Self::indent(reason, "            "))
            }
            _ => format!("{:>8}  {}", status, record.key),
        }
    }

    fn plural(kind: EntityKind, count: usize) -> String {
        let name = match kind {
            EntityKind::Repository => "Repository",
            EntityKind::Readme => "README",
            EntityKind::Label => "Labels",
            EntityKind::Milestone => "Milestones",
            EntityKind::Issue => "Issues",
            EntityKind::Project => "Project",
            EntityKind::ProjectItem => "Project items",
        };
        format!("{} ({})", name, count)
    }

    /// Describe what a bootstrap run would provision (for --dry-run)
    pub fn format_plan(profile: &ProjectProfile, plan: &TaskPlan) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Bootstrap Plan (dry run)"));
        output.push('\n');

        let visibility = if profile.private { "private" } else { "public" };
        output.push_str(&format!(
            "{} {} ({})\n",
            "Repository:".cyan().bold(),
            profile.repo,
            visibility
        ));
        output.push_str(&format!(
            "{} {}\n",
            "Project:".cyan().bold(),
            profile.project_title
        ));

        let labels: Vec<&str> = plan.label_names().into_iter().collect();
        output.push_str(&format!(
            "{} {}\n",
            format!("Labels (#{}):", profile.label_color).cyan().bold(),
            if labels.is_empty() {
                "none".to_string()
            } else {
                labels.join(", ")
            }
        ));

        output.push_str(&Self::section_header(&format!(
            "Milestones ({}), issues ({})",
            plan.milestones.len(),
            plan.task_count()
        )));
        for milestone in &plan.milestones {
            let due = milestone
                .due_on
                .map(|d| format!(" (due {})", d.format("%Y-%m-%d")))
                .unwrap_or_default();
            output.push_str(&format!("\n{}{}\n", milestone.title.yellow().bold(), due));
            for task in &milestone.tasks {
                if task.labels.is_empty() {
                    output.push_str(&format!("  - {}\n", task.title));
                } else {
                    output.push_str(&format!(
                        "  - {} {}\n",
                        task.title,
                        format!("[{}]", task.labels.join(", ")).dimmed()
                    ));
                }
            }
        }

        output.push_str(&Self::footer());
        output
    }

    /// One line per tool result
    pub fn format_tool_result(result: &ToolResult) -> String {
        match &result.outcome {
            ToolOutcome::Success(message) => {
                format!("{} {}: {}", "v".green(), result.tool_name.bold(), message)
            }
            ToolOutcome::Error(error) => {
                format!("{} {}: {}", "x".red(), result.tool_name.bold(), error)
            }
        }
    }

    /// Tool activity (when any) followed by the reply
    pub fn format_turn(turn: &ChatTurn) -> String {
        let mut output = String::new();
        if !turn.tool_results.is_empty() {
            for result in &turn.tool_results {
                output.push_str(&format!("  {}\n", Self::format_tool_result(result)));
            }
            output.push('\n');
        }
        output.push_str(turn.reply.trim_end());
        output.push('\n');
        output
    }

    /// Tool listing for the REPL's /tools command
    pub fn format_tools(spec: &ToolSpec) -> String {
        let mut output = String::new();
        for tool in spec.sorted() {
            output.push_str(&format!(
                "  {} {}\n",
                tool.name.cyan(),
                format!("({})", tool.target).dimmed()
            ));
            output.push_str(&format!("      {}\n", tool.description));
            for param in &tool.parameters {
                let marker = if param.required { "*" } else { " " };
                output.push_str(&format!(
                    "      {}{}: {}\n",
                    marker, param.name, param.description
                ));
            }
        }
        output
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }

    /// Indent a multi-line string
    pub fn indent(text: &str, prefix: &str) -> String {
        text.lines()
            .map(|line| format!("{}{}", prefix, line))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gitsmith_domain::{MilestonePlan, RepoRef, TaskItem, ToolError};

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_format_report() {
        plain();
        let mut report = BootstrapReport::new();
        report.record(EntityKind::Repository, "me/demo", ProvisionOutcome::Created);
        report.record(EntityKind::Label, "core", ProvisionOutcome::AlreadyExists);
        report.record(
            EntityKind::Issue,
            "Parse code",
            ProvisionOutcome::Failed("Validation Failed".to_string()),
        );

        let text = ConsoleFormatter::format_report(&report);
        assert!(text.contains("Repository (1)"));
        assert!(text.contains("Labels (1)"));
        assert!(text.contains("failed  Parse code"));
        assert!(text.contains("Validation Failed"));
        assert!(text.contains("1 created, 0 updated, 1 already existed, 1 failed"));
        assert!(!text.contains("Milestones"));
    }

    #[test]
    fn test_format_report_json() {
        let mut report = BootstrapReport::new();
        report.record(EntityKind::Readme, "README.md", ProvisionOutcome::Updated);
        let json: serde_json::Value =
            serde_json::from_str(&ConsoleFormatter::format_report_json(&report)).unwrap();
        assert_eq!(json["records"][0]["kind"], "readme");
        assert_eq!(json["records"][0]["outcome"]["status"], "updated");
    }

    #[test]
    fn test_format_plan() {
        plain();
        let profile = ProjectProfile::new(RepoRef::new("me", "demo")).with_private(true);
        let plan = TaskPlan::new(vec![
            MilestonePlan::new("Phase 1")
                .with_due_on(chrono_date())
                .with_task(TaskItem::new("Parse").with_label("parser")),
        ]);

        let text = ConsoleFormatter::format_plan(&profile, &plan);
        assert!(text.contains("me/demo (private)"));
        assert!(text.contains("demo Project"));
        assert!(text.contains("Phase 1 (due 2024-11-15)"));
        assert!(text.contains("- Parse [parser]"));
    }

    fn chrono_date() -> chrono::NaiveDate {
        chrono::NaiveDate::from_ymd_opt(2024, 11, 15).unwrap()
    }

    #[test]
    fn test_format_turn() {
        plain();
        let turn = ChatTurn {
            reply: "Done.".to_string(),
            tool_results: vec![
                ToolResult::success("c1", "git_commit", "Changes committed with message: init"),
                ToolResult::failure(
                    "c2",
                    "git_push",
                    ToolError::execution_failed("src refspec main does not match any"),
                ),
            ],
            rounds: 1,
        };

        let text = ConsoleFormatter::format_turn(&turn);
        assert!(text.contains("v git_commit: Changes committed"));
        assert!(text.contains("x git_push: [EXECUTION_FAILED] src refspec"));
        assert!(text.ends_with("Done.\n"));
    }

    #[test]
    fn test_format_tools() {
        plain();
        let text = ConsoleFormatter::format_tools(&ToolSpec::standard());
        assert!(text.contains("git_add_files"));
        assert!(text.contains("github_create_repository (remote_host)"));
        assert!(text.contains("*repository_path"));
    }
}
