//! Run Bootstrap use case.
//!
//! Materialises a [`TaskPlan`] on the repository host with create-if-absent
//! semantics, in a fixed order:
//!
//! 1. viewer id
//! 2. repository
//! 3. README.md
//! 4. labels (sorted)
//! 5. milestones, each followed by its issues
//! 6. project board
//! 7. project items
//!
//! Issue creation failures are recorded and skipped. Any other host error
//! ends the run.

use crate::ports::progress::BootstrapProgressNotifier;
use crate::ports::repository_host::{FileWrite, HostError, RepositoryHostPort};
use gitsmith_domain::{
    BootstrapReport, DomainError, EntityKind, NewIssue, ProjectProfile, ProvisionOutcome,
    ProvisionRecord, TaskPlan, render_readme,
};
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

const README_PATH: &str = "README.md";

#[derive(Error, Debug)]
pub enum RunBootstrapError {
    #[error("Invalid task plan: {0}")]
    InvalidPlan(#[from] DomainError),

    #[error("{step} failed: {source}")]
    Host {
        step: &'static str,
        #[source]
        source: HostError,
    },
}

impl RunBootstrapError {
    fn host(step: &'static str) -> impl FnOnce(HostError) -> Self {
        move |source| RunBootstrapError::Host { step, source }
    }
}

#[derive(Debug, Clone)]
pub struct RunBootstrapInput {
    pub profile: ProjectProfile,
    pub plan: TaskPlan,
    /// README content; generated from the plan when `None`
    pub readme: Option<String>,
}

impl RunBootstrapInput {
    pub fn new(profile: ProjectProfile, plan: TaskPlan) -> Self {
        Self {
            profile,
            plan,
            readme: None,
        }
    }

    pub fn with_readme(mut self, readme: impl Into<String>) -> Self {
        self.readme = Some(readme.into());
        self
    }
}

pub struct RunBootstrapUseCase {
    host: Arc<dyn RepositoryHostPort>,
}

/// Records outcomes and forwards them to the progress notifier
struct Recorder<'a> {
    report: BootstrapReport,
    progress: &'a dyn BootstrapProgressNotifier,
}

impl Recorder<'_> {
    fn record(&mut self, kind: EntityKind, key: &str, outcome: ProvisionOutcome) {
        match &outcome {
            ProvisionOutcome::AlreadyExists => info!("{} '{}' already exists", kind, key),
            ProvisionOutcome::Failed(e) => warn!("{} '{}' failed: {}", kind, key, e),
            other => info!("{} '{}' {}", kind, key, other.label()),
        }
        self.progress.on_record(&ProvisionRecord {
            kind,
            key: key.to_string(),
            outcome: outcome.clone(),
        });
        self.report.record(kind, key, outcome);
    }
}

impl RunBootstrapUseCase {
    pub fn new(host: Arc<dyn RepositoryHostPort>) -> Self {
        Self { host }
    }

    pub async fn execute(
        &self,
        input: RunBootstrapInput,
        progress: &dyn BootstrapProgressNotifier,
    ) -> Result<BootstrapReport, RunBootstrapError> {
        input.plan.validate()?;
        let RunBootstrapInput {
            profile,
            plan,
            readme,
        } = input;
        let repo = &profile.repo;
        let host = self.host.as_ref();
        let mut rec = Recorder {
            report: BootstrapReport::new(),
            progress,
        };

        info!(
            "Bootstrapping {} ({} milestones, {} tasks)",
            repo,
            plan.milestones.len(),
            plan.task_count()
        );

        progress.on_step_start("viewer");
        let viewer_id = host
            .viewer_id()
            .await
            .map_err(RunBootstrapError::host("viewer lookup"))?;
        debug!("Authenticated viewer id: {}", viewer_id);
        progress.on_step_complete("viewer");

        progress.on_step_start("repository");
        let outcome = match host
            .find_repository(repo)
            .await
            .map_err(RunBootstrapError::host("repository lookup"))?
        {
            Some(_) => ProvisionOutcome::AlreadyExists,
            None => match host.create_repository(&profile.new_repository()).await {
                Ok(_) => ProvisionOutcome::Created,
                Err(e) if e.is_already_exists() => ProvisionOutcome::AlreadyExists,
                Err(e) => return Err(RunBootstrapError::host("repository creation")(e)),
            },
        };
        rec.record(EntityKind::Repository, &repo.to_string(), outcome);
        progress.on_step_complete("repository");

        progress.on_step_start("readme");
        let content = readme.unwrap_or_else(|| render_readme(&profile, &plan));
        let outcome = match host
            .upsert_file(repo, README_PATH, &content)
            .await
            .map_err(RunBootstrapError::host("README update"))?
        {
            FileWrite::Created => ProvisionOutcome::Created,
            FileWrite::Updated => ProvisionOutcome::Updated,
        };
        rec.record(EntityKind::Readme, README_PATH, outcome);
        progress.on_step_complete("readme");

        progress.on_step_start("labels");
        for label in plan.label_names() {
            let outcome = match host
                .find_label(repo, label)
                .await
                .map_err(RunBootstrapError::host("label lookup"))?
            {
                Some(_) => ProvisionOutcome::AlreadyExists,
                None => match host.create_label(repo, label, &profile.label_color).await {
                    Ok(()) => ProvisionOutcome::Created,
                    Err(e) if e.is_already_exists() => ProvisionOutcome::AlreadyExists,
                    Err(e) => return Err(RunBootstrapError::host("label creation")(e)),
                },
            };
            rec.record(EntityKind::Label, label, outcome);
        }
        progress.on_step_complete("labels");

        progress.on_step_start("milestones");
        let existing = host
            .list_issues(repo)
            .await
            .map_err(RunBootstrapError::host("issue listing"))?;
        let mut existing_titles: HashSet<String> =
            existing.into_iter().map(|issue| issue.title).collect();

        for milestone in &plan.milestones {
            let number = match host
                .find_milestone(repo, &milestone.title)
                .await
                .map_err(RunBootstrapError::host("milestone lookup"))?
            {
                Some(number) => {
                    rec.record(EntityKind::Milestone, &milestone.title, ProvisionOutcome::AlreadyExists);
                    number
                }
                None => {
                    let number = host
                        .create_milestone(repo, milestone)
                        .await
                        .map_err(RunBootstrapError::host("milestone creation"))?;
                    rec.record(EntityKind::Milestone, &milestone.title, ProvisionOutcome::Created);
                    number
                }
            };

            for task in &milestone.tasks {
                if existing_titles.contains(&task.title) {
                    rec.record(EntityKind::Issue, &task.title, ProvisionOutcome::AlreadyExists);
                    continue;
                }
                let issue = NewIssue {
                    title: task.title.clone(),
                    body: task.body.clone(),
                    labels: task.labels.clone(),
                    milestone: Some(number),
                };
                let outcome = match host.create_issue(repo, &issue).await {
                    Ok(created) => {
                        debug!("Created issue #{} '{}'", created.number, created.title);
                        existing_titles.insert(task.title.clone());
                        ProvisionOutcome::Created
                    }
                    Err(e) if e.is_already_exists() => ProvisionOutcome::AlreadyExists,
                    Err(e) => ProvisionOutcome::Failed(e.to_string()),
                };
                rec.record(EntityKind::Issue, &task.title, outcome);
            }
        }
        progress.on_step_complete("milestones");

        progress.on_step_start("project");
        let project_id = match host
            .find_project(&repo.owner, &profile.project_title)
            .await
            .map_err(RunBootstrapError::host("project lookup"))?
        {
            Some(id) => {
                rec.record(EntityKind::Project, &profile.project_title, ProvisionOutcome::AlreadyExists);
                id
            }
            None => {
                let id = host
                    .create_project(&viewer_id, &profile.project_title)
                    .await
                    .map_err(RunBootstrapError::host("project creation"))?;
                rec.record(EntityKind::Project, &profile.project_title, ProvisionOutcome::Created);
                id
            }
        };
        progress.on_step_complete("project");

        progress.on_step_start("project items");
        let on_board = host
            .project_item_content_ids(&project_id)
            .await
            .map_err(RunBootstrapError::host("project item listing"))?;
        let issues = host
            .list_issues(repo)
            .await
            .map_err(RunBootstrapError::host("issue listing"))?;
        for issue in issues {
            let key = format!("#{} {}", issue.number, issue.title);
            if on_board.contains(&issue.node_id) {
                rec.record(EntityKind::ProjectItem, &key, ProvisionOutcome::AlreadyExists);
                continue;
            }
            host.add_project_item(&project_id, &issue.node_id)
                .await
                .map_err(RunBootstrapError::host("project item creation"))?;
            rec.record(EntityKind::ProjectItem, &key, ProvisionOutcome::Created);
        }
        progress.on_step_complete("project items");

        info!("Bootstrap of {} finished ({} records)", repo, rec.report.records.len());
        Ok(rec.report)
    }
}
