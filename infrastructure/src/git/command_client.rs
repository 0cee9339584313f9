//! Version control through the `git` CLI.
//!
//! One `git` process per operation. A non-zero exit becomes
//! [`GitError::CommandFailed`] carrying the trimmed stderr, which is what the
//! model sees in the error result. Branch, remote and URL values never start
//! with `-`, and are placed after `--` where the subcommand accepts it.

use async_trait::async_trait;
use gitsmith_application::ports::version_control::{GitError, VersionControlPort};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, trace};

/// Identity used for commits when git cannot resolve one from its config
const FALLBACK_NAME: &str = "gitsmith";
const FALLBACK_EMAIL: &str = "gitsmith@localhost";

pub struct CommandGitClient {
    program: PathBuf,
    /// Extra environment for every git process; `None` removes the variable
    env: Vec<(String, Option<String>)>,
}

impl CommandGitClient {
    /// Use the `git` found on `PATH`.
    pub fn new() -> Result<Self, GitError> {
        let program = which::which("git").map_err(|_| GitError::NotInstalled)?;
        debug!("Using git at {}", program.display());
        Ok(Self {
            program,
            env: Vec::new(),
        })
    }

    async fn run_git(&self, cwd: Option<&Path>, args: &[&str]) -> Result<String, GitError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        for (key, value) in &self.env {
            match value {
                Some(value) => cmd.env(key, value),
                None => cmd.env_remove(key),
            };
        }
        if let Some(dir) = cwd {
            cmd.current_dir(dir);
        }
        trace!(cwd = ?cwd, args = ?args, "running git");

        let command = subcommand(args);
        let output = cmd.output().await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound if cwd.is_some_and(|d| !d.exists()) => {
                GitError::CommandFailed {
                    command: command.clone(),
                    stderr: format!(
                        "repository path does not exist: {}",
                        cwd.map(|d| d.display().to_string()).unwrap_or_default()
                    ),
                }
            }
            std::io::ErrorKind::NotFound => GitError::NotInstalled,
            _ => GitError::Io(e),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let stderr = if stderr.is_empty() {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            } else {
                stderr
            };
            return Err(GitError::CommandFailed { command, stderr });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Whether git can build both author and committer identities on its own
    async fn has_identity(&self, repo: &Path) -> bool {
        self.run_git(Some(repo), &["var", "GIT_AUTHOR_IDENT"])
            .await
            .is_ok()
            && self
                .run_git(Some(repo), &["var", "GIT_COMMITTER_IDENT"])
                .await
                .is_ok()
    }
}

/// First non-option argument, skipping `-c key=value` pairs
fn subcommand(args: &[&str]) -> String {
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if *arg == "-c" {
            iter.next();
        } else if !arg.starts_with('-') {
            return arg.to_string();
        }
    }
    String::new()
}

fn positional(value: &str) -> Result<&str, GitError> {
    if value.trim_start().starts_with('-') {
        return Err(GitError::OptionLikeArgument(value.to_string()));
    }
    Ok(value)
}

#[async_trait]
impl VersionControlPort for CommandGitClient {
    async fn stage(&self, repo: &Path, paths: &[String]) -> Result<(), GitError> {
        let mut args = vec!["add", "--"];
        args.extend(paths.iter().map(String::as_str));
        self.run_git(Some(repo), &args).await?;
        debug!(repo = %repo.display(), files = paths.len(), "staged files");
        Ok(())
    }

    async fn commit(&self, repo: &Path, message: &str) -> Result<(), GitError> {
        if self.has_identity(repo).await {
            self.run_git(Some(repo), &["commit", "-m", message]).await?;
        } else {
            debug!(repo = %repo.display(), "no git identity configured, using fallback");
            let name = format!("user.name={}", FALLBACK_NAME);
            let email = format!("user.email={}", FALLBACK_EMAIL);
            self.run_git(
                Some(repo),
                &["-c", name.as_str(), "-c", email.as_str(), "commit", "-m", message],
            )
            .await?;
        }
        debug!(repo = %repo.display(), "created commit");
        Ok(())
    }

    async fn create_branch(&self, repo: &Path, name: &str) -> Result<(), GitError> {
        let name = positional(name)?;
        self.run_git(Some(repo), &["branch", "--", name]).await?;
        debug!(repo = %repo.display(), branch = name, "created branch");
        Ok(())
    }

    async fn checkout(&self, repo: &Path, name: &str) -> Result<(), GitError> {
        let name = positional(name)?;
        self.run_git(Some(repo), &["checkout", name, "--"]).await?;
        debug!(repo = %repo.display(), branch = name, "checked out branch");
        Ok(())
    }

    async fn pull(&self, repo: &Path, remote: &str, branch: &str) -> Result<(), GitError> {
        let (remote, branch) = (positional(remote)?, positional(branch)?);
        self.run_git(Some(repo), &["pull", remote, branch]).await?;
        debug!(repo = %repo.display(), remote, branch, "pulled");
        Ok(())
    }

    async fn push(&self, repo: &Path, remote: &str, branch: &str) -> Result<(), GitError> {
        let (remote, branch) = (positional(remote)?, positional(branch)?);
        self.run_git(Some(repo), &["push", remote, branch]).await?;
        debug!(repo = %repo.display(), remote, branch, "pushed");
        Ok(())
    }

    async fn clone_repository(&self, url: &str, destination: &Path) -> Result<(), GitError> {
        let url = positional(url)?;
        let dest = destination.to_string_lossy();
        self.run_git(None, &["clone", "--", url, dest.as_ref()]).await?;
        debug!(url, destination = %destination.display(), "cloned repository");
        Ok(())
    }

    async fn init(&self, directory: &Path) -> Result<(), GitError> {
        tokio::fs::create_dir_all(directory).await?;
        self.run_git(Some(directory), &["init"]).await?;
        debug!(directory = %directory.display(), "initialized repository");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> Option<CommandGitClient> {
        match CommandGitClient::new() {
            Ok(client) => Some(client),
            Err(_) => {
                eprintln!("git not on PATH; skipping");
                None
            }
        }
    }

    /// A client whose git sees no user or system config and no identity env.
    fn isolated(client: &CommandGitClient, home: &Path) -> CommandGitClient {
        let home = home.display().to_string();
        let mut env = vec![
            ("HOME".to_string(), Some(home.clone())),
            ("XDG_CONFIG_HOME".to_string(), Some(home)),
            ("GIT_CONFIG_NOSYSTEM".to_string(), Some("1".to_string())),
        ];
        for key in [
            "GIT_AUTHOR_NAME",
            "GIT_AUTHOR_EMAIL",
            "GIT_COMMITTER_NAME",
            "GIT_COMMITTER_EMAIL",
            "EMAIL",
        ] {
            env.push((key.to_string(), None));
        }
        CommandGitClient {
            program: client.program.clone(),
            env,
        }
    }

    async fn configure_identity(client: &CommandGitClient, repo: &Path) {
        client
            .run_git(Some(repo), &["config", "user.email", "dev@example.com"])
            .await
            .unwrap();
        client
            .run_git(Some(repo), &["config", "user.name", "Dev"])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_stage_and_commit_on_fresh_repository() {
        let Some(client) = client() else { return };
        let dir = tempfile::tempdir().unwrap();
        let repo = dir.path().join("work");

        client.init(&repo).await.unwrap();
        configure_identity(&client, &repo).await;
        std::fs::write(repo.join("a.py"), "print('a')\n").unwrap();
        std::fs::write(repo.join("b.py"), "print('b')\n").unwrap();

        client
            .stage(&repo, &["a.py".to_string(), "b.py".to_string()])
            .await
            .unwrap();
        client.commit(&repo, "init").await.unwrap();

        let subject = client
            .run_git(Some(&repo), &["log", "-1", "--format=%s"])
            .await
            .unwrap();
        assert_eq!(subject, "init");
    }

    #[tokio::test]
    async fn test_commit_without_configured_identity() {
        let Some(client) = client() else { return };
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path().join("home");
        std::fs::create_dir_all(&home).unwrap();
        let client = isolated(&client, &home);
        let repo = dir.path().join("work");

        client.init(&repo).await.unwrap();
        std::fs::write(repo.join("a.py"), "print('a')\n").unwrap();
        std::fs::write(repo.join("b.py"), "print('b')\n").unwrap();
        client
            .stage(&repo, &["a.py".to_string(), "b.py".to_string()])
            .await
            .unwrap();
        client.commit(&repo, "init").await.unwrap();

        let subject = client
            .run_git(Some(&repo), &["log", "-1", "--format=%s"])
            .await
            .unwrap();
        assert_eq!(subject, "init");
    }

    #[tokio::test]
    async fn test_branch_and_checkout() {
        let Some(client) = client() else { return };
        let dir = tempfile::tempdir().unwrap();
        let repo = dir.path().to_path_buf();

        client.init(&repo).await.unwrap();
        configure_identity(&client, &repo).await;
        std::fs::write(repo.join("README.md"), "# demo\n").unwrap();
        client.stage(&repo, &["README.md".to_string()]).await.unwrap();
        client.commit(&repo, "first").await.unwrap();

        client.create_branch(&repo, "feature").await.unwrap();
        client.checkout(&repo, "feature").await.unwrap();

        let head = client
            .run_git(Some(&repo), &["rev-parse", "--abbrev-ref", "HEAD"])
            .await
            .unwrap();
        assert_eq!(head, "feature");
    }

    #[tokio::test]
    async fn test_push_without_commits_fails_with_stderr() {
        let Some(client) = client() else { return };
        let dir = tempfile::tempdir().unwrap();
        let remote = dir.path().join("remote.git");
        let repo = dir.path().join("work");

        client.run_git(None, &["init", "--bare", remote.to_str().unwrap()]).await.unwrap();
        client.init(&repo).await.unwrap();
        client
            .run_git(Some(&repo), &["remote", "add", "origin", remote.to_str().unwrap()])
            .await
            .unwrap();

        let err = client.push(&repo, "origin", "main").await.unwrap_err();
        match err {
            GitError::CommandFailed { command, stderr } => {
                assert_eq!(command, "push");
                assert!(stderr.contains("main"), "stderr: {}", stderr);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_clone_local_repository() {
        let Some(client) = client() else { return };
        let dir = tempfile::tempdir().unwrap();
        let source = dir.path().join("source");
        let dest = dir.path().join("copy");

        client.init(&source).await.unwrap();
        configure_identity(&client, &source).await;
        std::fs::write(source.join("f.txt"), "x").unwrap();
        client.stage(&source, &["f.txt".to_string()]).await.unwrap();
        client.commit(&source, "seed").await.unwrap();

        client
            .clone_repository(source.to_str().unwrap(), &dest)
            .await
            .unwrap();
        assert!(dest.join("f.txt").exists());
    }

    #[tokio::test]
    async fn test_option_like_remote_never_reaches_git() {
        let Some(client) = client() else { return };
        let dir = tempfile::tempdir().unwrap();
        let repo = dir.path().join("work");
        let marker = dir.path().join("marker");
        client.init(&repo).await.unwrap();

        let remote = format!("--upload-pack=touch {}; git-upload-pack", marker.display());
        let err = client.pull(&repo, &remote, "main").await.unwrap_err();
        assert!(matches!(err, GitError::OptionLikeArgument(_)));
        assert!(!marker.exists());

        let err = client.push(&repo, "origin", "--force").await.unwrap_err();
        assert!(matches!(err, GitError::OptionLikeArgument(_)));
    }

    #[tokio::test]
    async fn test_checkout_force_flag_keeps_uncommitted_work() {
        let Some(client) = client() else { return };
        let dir = tempfile::tempdir().unwrap();
        let repo = dir.path().to_path_buf();

        client.init(&repo).await.unwrap();
        configure_identity(&client, &repo).await;
        std::fs::write(repo.join("notes.txt"), "v1").unwrap();
        client.stage(&repo, &["notes.txt".to_string()]).await.unwrap();
        client.commit(&repo, "first").await.unwrap();
        std::fs::write(repo.join("notes.txt"), "uncommitted work").unwrap();

        assert!(client.checkout(&repo, "-f").await.is_err());
        assert!(client.create_branch(&repo, "-D").await.is_err());
        assert_eq!(
            std::fs::read_to_string(repo.join("notes.txt")).unwrap(),
            "uncommitted work"
        );
    }

    #[test]
    fn test_subcommand_skips_config_pairs() {
        assert_eq!(subcommand(&["-c", "user.name=x", "commit", "-m", "y"]), "commit");
        assert_eq!(subcommand(&["clone", "--", "url"]), "clone");
        assert_eq!(subcommand(&[]), "");
    }

    #[tokio::test]
    async fn test_missing_repository_path() {
        let Some(client) = client() else { return };
        let err = client
            .commit(Path::new("/definitely/not/here"), "x")
            .await
            .unwrap_err();
        assert!(matches!(err, GitError::CommandFailed { .. }));
    }
}
