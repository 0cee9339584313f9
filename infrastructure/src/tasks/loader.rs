//! YAML task plan loader.
//!
//! ```yaml
//! MILESTONES:
//!   "Phase 1: Setup":
//!     description: Prepare the environment
//!     due_on: "2024-11-15"
//!     tasks:
//!       - title: Install dependencies
//!         body: Install the Python packages
//!         labels: [setup]
//! ```
//!
//! Milestones keep the order they have in the file.

use gitsmith_domain::{DomainError, MilestonePlan, TaskItem, TaskPlan};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug)]
pub enum TaskPlanError {
    #[error("Failed to read task file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid task YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Task file has no top-level MILESTONES mapping")]
    MissingMilestones,

    #[error("Milestone keys must be strings")]
    InvalidMilestoneKey,

    #[error("Invalid due_on '{value}' for milestone '{milestone}' (expected YYYY-MM-DD)")]
    InvalidDate { milestone: String, value: String },

    #[error(transparent)]
    Invalid(#[from] DomainError),
}

#[derive(Debug, Deserialize)]
struct TasksFile {
    #[serde(rename = "MILESTONES")]
    milestones: Option<serde_yaml::Mapping>,
}

#[derive(Debug, Deserialize)]
struct MilestoneEntry {
    #[serde(default)]
    description: String,
    #[serde(default)]
    due_on: Option<String>,
    #[serde(default)]
    tasks: Vec<TaskEntry>,
}

#[derive(Debug, Deserialize)]
struct TaskEntry {
    title: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    labels: Vec<String>,
}

/// Read and validate a task plan file
pub fn load_task_plan(path: &Path) -> Result<TaskPlan, TaskPlanError> {
    let text = std::fs::read_to_string(path).map_err(|source| TaskPlanError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let plan = parse_task_plan(&text)?;
    debug!(
        "Loaded {} milestones, {} tasks from {}",
        plan.milestones.len(),
        plan.task_count(),
        path.display()
    );
    Ok(plan)
}

/// Parse and validate a task plan document
pub fn parse_task_plan(text: &str) -> Result<TaskPlan, TaskPlanError> {
    let file: TasksFile = serde_yaml::from_str(text)?;
    let mapping = file.milestones.ok_or(TaskPlanError::MissingMilestones)?;

    let milestones = mapping
        .into_iter()
        .map(|(key, value)| {
            let title = key
                .as_str()
                .ok_or(TaskPlanError::InvalidMilestoneKey)?
                .to_string();
            let entry: MilestoneEntry = serde_yaml::from_value(value)?;
            milestone_from_entry(title, entry)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let plan = TaskPlan::new(milestones);
    plan.validate()?;
    Ok(plan)
}

fn milestone_from_entry(title: String, entry: MilestoneEntry) -> Result<MilestonePlan, TaskPlanError> {
    let mut milestone = MilestonePlan::new(title.as_str()).with_description(entry.description);

    if let Some(raw) = entry.due_on.filter(|d| !d.trim().is_empty()) {
        let date = NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
            TaskPlanError::InvalidDate {
                milestone: title.clone(),
                value: raw.clone(),
            }
        })?;
        milestone = milestone.with_due_on(date);
    }

    for task in entry.tasks {
        let item = task
            .labels
            .into_iter()
            .fold(TaskItem::new(task.title).with_body(task.body), |item, label| {
                item.with_label(label)
            });
        milestone = milestone.with_task(item);
    }
    Ok(milestone)
}
