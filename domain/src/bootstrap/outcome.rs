//! Provisioning outcomes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of entity provisioned on the repository host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Repository,
    Readme,
    Label,
    Milestone,
    Issue,
    Project,
    ProjectItem,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Repository => "repository",
            EntityKind::Readme => "readme",
            EntityKind::Label => "label",
            EntityKind::Milestone => "milestone",
            EntityKind::Issue => "issue",
            EntityKind::Project => "project",
            EntityKind::ProjectItem => "project item",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum ProvisionOutcome {
    Created,
    Updated,
    AlreadyExists,
    Failed(String),
}

impl ProvisionOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, ProvisionOutcome::Failed(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProvisionOutcome::Created => "created",
            ProvisionOutcome::Updated => "updated",
            ProvisionOutcome::AlreadyExists => "already exists",
            ProvisionOutcome::Failed(_) => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionRecord {
    pub kind: EntityKind,
    /// Natural key on the host (name, title, path)
    pub key: String,
    pub outcome: ProvisionOutcome,
}

/// Every provisioning step of one run, in execution order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapReport {
    pub records: Vec<ProvisionRecord>,
}

impl BootstrapReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: EntityKind, key: impl Into<String>, outcome: ProvisionOutcome) {
        self.records.push(ProvisionRecord {
            kind,
            key: key.into(),
            outcome,
        });
    }

    pub fn count(&self, outcome: &ProvisionOutcome) -> usize {
        self.records
            .iter()
            .filter(|r| std::mem::discriminant(&r.outcome) == std::mem::discriminant(outcome))
            .count()
    }

    pub fn of_kind(&self, kind: EntityKind) -> impl Iterator<Item = &ProvisionRecord> {
        self.records.iter().filter(move |r| r.kind == kind)
    }

    pub fn failures(&self) -> impl Iterator<Item = &ProvisionRecord> {
        self.records.iter().filter(|r| r.outcome.is_failure())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}
