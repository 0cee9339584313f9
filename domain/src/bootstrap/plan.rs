//! Task plan entities

use crate::core::error::DomainError;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// One task, provisioned as an issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskItem {
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub labels: Vec<String>,
}

impl TaskItem {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: String::new(),
            labels: Vec::new(),
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.labels.push(label.into());
        self
    }
}

/// A milestone and the tasks scheduled under it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestonePlan {
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Calendar due date, interpreted as midnight UTC
    #[serde(default)]
    pub due_on: Option<NaiveDate>,
    #[serde(default)]
    pub tasks: Vec<TaskItem>,
}

impl MilestonePlan {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            due_on: None,
            tasks: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_due_on(mut self, due_on: NaiveDate) -> Self {
        self.due_on = Some(due_on);
        self
    }

    pub fn with_task(mut self, task: TaskItem) -> Self {
        self.tasks.push(task);
        self
    }

    pub fn due_on_utc(&self) -> Option<DateTime<Utc>> {
        self.due_on
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }
}

/// Ordered milestones with their tasks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPlan {
    pub milestones: Vec<MilestonePlan>,
}

impl TaskPlan {
    pub fn new(milestones: Vec<MilestonePlan>) -> Self {
        Self { milestones }
    }

    /// Every label used by any task, sorted and deduplicated
    pub fn label_names(&self) -> BTreeSet<&str> {
        self.tasks()
            .flat_map(|t| t.labels.iter().map(String::as_str))
            .collect()
    }

    pub fn tasks(&self) -> impl Iterator<Item = &TaskItem> {
        self.milestones.iter().flat_map(|m| m.tasks.iter())
    }

    pub fn task_count(&self) -> usize {
        self.tasks().count()
    }

    /// Reject blank titles and repeated milestone titles.
    ///
    /// Task titles may repeat across milestones; the host lookup dedupes them.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut seen = HashSet::new();
        for milestone in &self.milestones {
            if milestone.title.trim().is_empty() {
                return Err(DomainError::InvalidTaskPlan(
                    "milestone title must not be empty".to_string(),
                ));
            }
            if !seen.insert(milestone.title.as_str()) {
                return Err(DomainError::InvalidTaskPlan(format!(
                    "duplicate milestone '{}'",
                    milestone.title
                )));
            }
            if let Some(task) = milestone.tasks.iter().find(|t| t.title.trim().is_empty()) {
                return Err(DomainError::InvalidTaskPlan(format!(
                    "task with empty title in milestone '{}' (body: {:?})",
                    milestone.title,
                    crate::util::preview(&task.body, 40)
                )));
            }
        }
        Ok(())
    }
}
