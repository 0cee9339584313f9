//! Tool dispatch.
//!
//! [`ToolDispatcher`] decodes each model-proposed call into a
//! [`RepoOperation`] and runs it against the version-control or repository
//! host port. Any failure becomes an error [`ToolResult`]; nothing escapes.

use crate::ports::repository_host::RepositoryHostPort;
use crate::ports::tool_executor::ToolExecutorPort;
use crate::ports::version_control::VersionControlPort;
use async_trait::async_trait;
use gitsmith_domain::tool::operation::RepoOperation;
use gitsmith_domain::{ToolCall, ToolError, ToolResult, ToolSpec};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

pub struct ToolDispatcher {
    vcs: Arc<dyn VersionControlPort>,
    host: Arc<dyn RepositoryHostPort>,
    spec: ToolSpec,
}

impl ToolDispatcher {
    pub fn new(vcs: Arc<dyn VersionControlPort>, host: Arc<dyn RepositoryHostPort>) -> Self {
        Self {
            vcs,
            host,
            spec: ToolSpec::standard(),
        }
    }

    async fn run(&self, op: RepoOperation) -> Result<String, ToolError> {
        match op {
            RepoOperation::AddFiles(p) => {
                self.vcs
                    .stage(Path::new(&p.repository_path), &p.file_paths)
                    .await
                    .map_err(failed)?;
                Ok("Files added to staging area.".to_string())
            }
            RepoOperation::Commit(p) => {
                self.vcs
                    .commit(Path::new(&p.repository_path), &p.message)
                    .await
                    .map_err(failed)?;
                Ok(format!("Committed changes with message: '{}'", p.message))
            }
            RepoOperation::CreateBranch(p) => {
                self.vcs
                    .create_branch(Path::new(&p.repository_path), &p.branch_name)
                    .await
                    .map_err(failed)?;
                Ok(format!("Branch '{}' created.", p.branch_name))
            }
            RepoOperation::CheckoutBranch(p) => {
                self.vcs
                    .checkout(Path::new(&p.repository_path), &p.branch_name)
                    .await
                    .map_err(failed)?;
                Ok(format!("Checked out to branch '{}'.", p.branch_name))
            }
            RepoOperation::Pull(p) => {
                self.vcs
                    .pull(Path::new(&p.repository_path), p.remote(), &p.branch_name)
                    .await
                    .map_err(failed)?;
                Ok(format!(
                    "Pulled latest changes from '{}/{}'.",
                    p.remote(),
                    p.branch_name
                ))
            }
            RepoOperation::Push(p) => {
                self.vcs
                    .push(Path::new(&p.repository_path), p.remote(), &p.branch_name)
                    .await
                    .map_err(failed)?;
                Ok(format!(
                    "Pushed local changes to '{}/{}'.",
                    p.remote(),
                    p.branch_name
                ))
            }
            RepoOperation::CloneRepository(p) => {
                self.vcs
                    .clone_repository(&p.repository_url, Path::new(&p.local_path))
                    .await
                    .map_err(failed)?;
                Ok(format!("Repository cloned to {}.", p.local_path))
            }
            RepoOperation::CreateLocalRepository(p) => {
                self.vcs
                    .init(Path::new(&p.directory_path))
                    .await
                    .map_err(failed)?;
                Ok(format!(
                    "Initialized empty Git repository in {}.",
                    p.directory_path
                ))
            }
            RepoOperation::CreateRemoteRepository(p) => {
                let new = p.into_new_repository();
                let created = self.host.create_repository(&new).await.map_err(failed)?;
                Ok(format!(
                    "Repository '{}' created on GitHub: {}",
                    new.name, created.html_url
                ))
            }
        }
    }
}

fn failed(e: impl std::fmt::Display) -> ToolError {
    ToolError::execution_failed(e.to_string())
}

#[async_trait]
impl ToolExecutorPort for ToolDispatcher {
    fn tool_spec(&self) -> &ToolSpec {
        &self.spec
    }

    async fn execute(&self, call: &ToolCall) -> ToolResult {
        debug!(call_id = %call.id, tool = %call.tool_name, "Dispatching tool call");

        let outcome = match RepoOperation::from_call(call) {
            Ok(op) => self.run(op).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(message) => ToolResult::success(&call.id, &call.tool_name, message),
            Err(e) => {
                warn!(call_id = %call.id, tool = %call.tool_name, "Tool call failed: {}", e);
                ToolResult::failure(&call.id, &call.tool_name, e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::repository_host::{FileWrite, HostError};
    use crate::ports::version_control::GitError;
    use gitsmith_domain::{
        MilestonePlan, NewIssue, NewRepository, RemoteIssue, RemoteRepository, RepoRef,
        ToolOutcome,
    };
    use std::collections::HashSet;
    use std::path::Path;
    use std::sync::Mutex;

    /// Records every call; fails `push` (no commits yet) and any op on "/missing"
    #[derive(Default)]
    struct MockVcs {
        calls: Mutex<Vec<String>>,
    }

    impl MockVcs {
        fn record(&self, entry: String, repo: &Path) -> Result<(), GitError> {
            self.calls.lock().unwrap().push(entry);
            if repo == Path::new("/missing") {
                return Err(GitError::CommandFailed {
                    command: "status".to_string(),
                    stderr: "fatal: not a git repository".to_string(),
                });
            }
            Ok(())
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl VersionControlPort for MockVcs {
        async fn stage(&self, repo: &Path, paths: &[String]) -> Result<(), GitError> {
            self.record(format!("add {}", paths.join(" ")), repo)
        }
        async fn commit(&self, repo: &Path, message: &str) -> Result<(), GitError> {
            self.record(format!("commit {}", message), repo)
        }
        async fn create_branch(&self, repo: &Path, name: &str) -> Result<(), GitError> {
            self.record(format!("branch {}", name), repo)
        }
        async fn checkout(&self, repo: &Path, name: &str) -> Result<(), GitError> {
            self.record(format!("checkout {}", name), repo)
        }
        async fn pull(&self, repo: &Path, remote: &str, branch: &str) -> Result<(), GitError> {
            self.record(format!("pull {} {}", remote, branch), repo)
        }
        async fn push(&self, repo: &Path, remote: &str, branch: &str) -> Result<(), GitError> {
            self.record(format!("push {} {}", remote, branch), repo)?;
            Err(GitError::CommandFailed {
                command: "push".to_string(),
                stderr: format!("error: src refspec {} does not match any", branch),
            })
        }
        async fn clone_repository(&self, url: &str, destination: &Path) -> Result<(), GitError> {
            self.record(format!("clone {} {}", url, destination.display()), destination)
        }
        async fn init(&self, directory: &Path) -> Result<(), GitError> {
            self.record(format!("init {}", directory.display()), directory)
        }
    }

    /// Only repository creation is reachable from the dispatcher
    #[derive(Default)]
    struct MockHost {
        created: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl RepositoryHostPort for MockHost {
        async fn viewer_id(&self) -> Result<String, HostError> {
            unreachable!()
        }
        async fn find_repository(&self, _: &RepoRef) -> Result<Option<RemoteRepository>, HostError> {
            unreachable!()
        }
        async fn create_repository(&self, new: &NewRepository) -> Result<RemoteRepository, HostError> {
            let mut created = self.created.lock().unwrap();
            if created.contains(&new.name) {
                return Err(HostError::Api {
                    status: 422,
                    message: "Repository creation failed: name already exists on this account"
                        .to_string(),
                });
            }
            created.push(new.name.clone());
            Ok(RemoteRepository {
                node_id: "R_1".to_string(),
                full_name: format!("me/{}", new.name),
                html_url: format!("https://github.com/me/{}", new.name),
            })
        }
        async fn upsert_file(&self, _: &RepoRef, _: &str, _: &str) -> Result<FileWrite, HostError> {
            unreachable!()
        }
        async fn find_label(&self, _: &RepoRef, _: &str) -> Result<Option<String>, HostError> {
            unreachable!()
        }
        async fn create_label(&self, _: &RepoRef, _: &str, _: &str) -> Result<(), HostError> {
            unreachable!()
        }
        async fn find_milestone(&self, _: &RepoRef, _: &str) -> Result<Option<u64>, HostError> {
            unreachable!()
        }
        async fn create_milestone(&self, _: &RepoRef, _: &MilestonePlan) -> Result<u64, HostError> {
            unreachable!()
        }
        async fn list_issues(&self, _: &RepoRef) -> Result<Vec<RemoteIssue>, HostError> {
            unreachable!()
        }
        async fn create_issue(&self, _: &RepoRef, _: &NewIssue) -> Result<RemoteIssue, HostError> {
            unreachable!()
        }
        async fn find_project(&self, _: &str, _: &str) -> Result<Option<String>, HostError> {
            unreachable!()
        }
        async fn create_project(&self, _: &str, _: &str) -> Result<String, HostError> {
            unreachable!()
        }
        async fn project_item_content_ids(&self, _: &str) -> Result<HashSet<String>, HostError> {
            unreachable!()
        }
        async fn add_project_item(&self, _: &str, _: &str) -> Result<(), HostError> {
            unreachable!()
        }
    }

    fn dispatcher() -> (ToolDispatcher, Arc<MockVcs>, Arc<MockHost>) {
        let vcs = Arc::new(MockVcs::default());
        let host = Arc::new(MockHost::default());
        (ToolDispatcher::new(vcs.clone(), host.clone()), vcs, host)
    }

    fn message(result: &ToolResult) -> &str {
        match &result.outcome {
            ToolOutcome::Success(m) => m,
            ToolOutcome::Error(e) => &e.message,
        }
    }

    #[tokio::test]
    async fn test_batch_returns_one_result_per_call_in_order() {
        let (dispatcher, vcs, _) = dispatcher();
        let calls = vec![
            ToolCall::new("c1", "git_add_files")
                .with_arg("repository_path", "/work")
                .with_arg("file_paths", serde_json::json!(["a.py", "b.py"])),
            ToolCall::new("c2", "git_commit")
                .with_arg("repository_path", "/work")
                .with_arg("message", "init"),
            ToolCall::new("c3", "git_create_branch")
                .with_arg("repository_path", "/work")
                .with_arg("branch_name", "feature"),
        ];

        let results = dispatcher.execute_batch(&calls).await;

        assert_eq!(results.len(), 3);
        let ids: Vec<&str> = results.iter().map(|r| r.call_id.as_str()).collect();
        assert_eq!(ids, vec!["c1", "c2", "c3"]);
        assert!(results.iter().all(|r| r.is_success()));
        assert_eq!(message(&results[0]), "Files added to staging area.");
        assert_eq!(message(&results[1]), "Committed changes with message: 'init'");
        assert_eq!(message(&results[2]), "Branch 'feature' created.");
        assert_eq!(
            vcs.calls(),
            vec!["add a.py b.py", "commit init", "branch feature"]
        );
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_batch() {
        let (dispatcher, vcs, _) = dispatcher();
        let calls = vec![
            ToolCall::new("c1", "git_checkout_branch")
                .with_arg("repository_path", "/missing")
                .with_arg("branch_name", "main"),
            ToolCall::new("c2", "git_pull")
                .with_arg("repository_path", "/work")
                .with_arg("branch_name", "main"),
        ];

        let results = dispatcher.execute_batch(&calls).await;

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].error().unwrap().code, "EXECUTION_FAILED");
        assert!(message(&results[0]).contains("not a git repository"));
        assert_eq!(message(&results[1]), "Pulled latest changes from 'origin/main'.");
        assert_eq!(vcs.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_tool_has_no_side_effect() {
        let (dispatcher, vcs, host) = dispatcher();
        let result = dispatcher
            .execute(&ToolCall::new("c1", "git_reset_hard").with_arg("repository_path", "/work"))
            .await;

        assert_eq!(result.call_id, "c1");
        assert_eq!(result.error().unwrap().code, "NOT_FOUND");
        assert!(vcs.calls().is_empty());
        assert!(host.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_argument_has_no_side_effect() {
        let (dispatcher, vcs, _) = dispatcher();
        let result = dispatcher
            .execute(&ToolCall::new("c1", "git_commit").with_arg("repository_path", "/work"))
            .await;

        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
        assert!(vcs.calls().is_empty());
    }

    #[tokio::test]
    async fn test_push_without_commits_is_error_result() {
        let (dispatcher, _, _) = dispatcher();
        let result = dispatcher
            .execute(
                &ToolCall::new("c1", "git_push")
                    .with_arg("repository_path", "/work")
                    .with_arg("remote_name", "origin")
                    .with_arg("branch_name", "main"),
            )
            .await;

        assert!(!result.is_success());
        assert!(message(&result).contains("src refspec main"));
    }

    #[tokio::test]
    async fn test_create_remote_repository_twice() {
        let (dispatcher, _, host) = dispatcher();
        let call = ToolCall::new("c1", "github_create_repository")
            .with_arg("repository_name", "demo")
            .with_arg("private", true);

        let first = dispatcher.execute(&call).await;
        assert_eq!(
            message(&first),
            "Repository 'demo' created on GitHub: https://github.com/me/demo"
        );

        let second = dispatcher.execute(&call).await;
        assert!(!second.is_success());
        assert!(message(&second).contains("already exists"));
        assert_eq!(host.created.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_clone_and_init_messages() {
        let (dispatcher, _, _) = dispatcher();
        let clone = dispatcher
            .execute(
                &ToolCall::new("c1", "git_clone_repository")
                    .with_arg("repository_url", "https://github.com/me/demo.git")
                    .with_arg("local_path", "/work/demo"),
            )
            .await;
        assert_eq!(message(&clone), "Repository cloned to /work/demo.");

        let init = dispatcher
            .execute(&ToolCall::new("c2", "git_create_local_repository").with_arg("directory_path", "/work/new"))
            .await;
        assert_eq!(message(&init), "Initialized empty Git repository in /work/new.");
    }

    #[test]
    fn test_spec_is_standard() {
        let (dispatcher, _, _) = dispatcher();
        assert!(dispatcher.has_tool("git_push"));
        assert!(!dispatcher.has_tool("run_command"));
        assert_eq!(dispatcher.tool_spec().len(), 9);
    }
}
