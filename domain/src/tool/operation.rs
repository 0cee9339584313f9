//! Closed operation set
//!
//! [`ToolKind`] is the registry side (names and descriptors) and
//! [`RepoOperation`] is the dispatch side (decoded, typed parameters). Both are
//! exhaustive enums; adding a tool means adding a variant to each.

use super::entities::{ParamType, ToolCall, ToolDefinition, ToolParameter, ToolTarget};
use super::value_objects::ToolError;
use crate::core::repo::NewRepository;
use serde::Deserialize;
use serde::de::DeserializeOwned;

const DEFAULT_REMOTE: &str = "origin";

/// Every tool the agent may invoke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    AddFiles,
    Commit,
    CreateBranch,
    CheckoutBranch,
    Pull,
    Push,
    CloneRepository,
    CreateLocalRepository,
    CreateRemoteRepository,
}

impl ToolKind {
    pub const ALL: [ToolKind; 9] = [
        ToolKind::AddFiles,
        ToolKind::Commit,
        ToolKind::CreateBranch,
        ToolKind::CheckoutBranch,
        ToolKind::Pull,
        ToolKind::Push,
        ToolKind::CloneRepository,
        ToolKind::CreateLocalRepository,
        ToolKind::CreateRemoteRepository,
    ];

    /// Wire name exposed to the model
    pub fn name(&self) -> &'static str {
        match self {
            ToolKind::AddFiles => "git_add_files",
            ToolKind::Commit => "git_commit",
            ToolKind::CreateBranch => "git_create_branch",
            ToolKind::CheckoutBranch => "git_checkout_branch",
            ToolKind::Pull => "git_pull",
            ToolKind::Push => "git_push",
            ToolKind::CloneRepository => "git_clone_repository",
            ToolKind::CreateLocalRepository => "git_create_local_repository",
            ToolKind::CreateRemoteRepository => "github_create_repository",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    pub fn target(&self) -> ToolTarget {
        match self {
            ToolKind::CloneRepository | ToolKind::CreateRemoteRepository => ToolTarget::RemoteHost,
            _ => ToolTarget::WorkingCopy,
        }
    }

    pub fn definition(&self) -> ToolDefinition {
        let def = ToolDefinition::new(self.name(), self.description(), self.target());
        match self {
            ToolKind::AddFiles => def.with_parameter(repository_path()).with_parameter(
                ToolParameter::new("file_paths", "List of file paths to add.", true)
                    .with_type(ParamType::StringArray),
            ),
            ToolKind::Commit => def
                .with_parameter(repository_path())
                .with_parameter(ToolParameter::new("message", "Commit message.", true)),
            ToolKind::CreateBranch => def
                .with_parameter(repository_path())
                .with_parameter(ToolParameter::new("branch_name", "Name of the new branch.", true)),
            ToolKind::CheckoutBranch => def.with_parameter(repository_path()).with_parameter(
                ToolParameter::new("branch_name", "Name of the branch to checkout.", true),
            ),
            ToolKind::Pull => def
                .with_parameter(repository_path())
                .with_parameter(remote_name())
                .with_parameter(ToolParameter::new("branch_name", "Name of the branch to pull.", true)),
            ToolKind::Push => def
                .with_parameter(repository_path())
                .with_parameter(remote_name())
                .with_parameter(ToolParameter::new("branch_name", "Name of the branch to push.", true)),
            ToolKind::CloneRepository => def
                .with_parameter(ToolParameter::new(
                    "repository_url",
                    "URL of the remote repository to clone.",
                    true,
                ))
                .with_parameter(ToolParameter::new(
                    "local_path",
                    "Local directory path where the repository will be cloned.",
                    true,
                )),
            ToolKind::CreateLocalRepository => def.with_parameter(ToolParameter::new(
                "directory_path",
                "Path to the directory where the repository will be initialized.",
                true,
            )),
            ToolKind::CreateRemoteRepository => def
                .with_parameter(ToolParameter::new(
                    "repository_name",
                    "Name of the new GitHub repository.",
                    true,
                ))
                .with_parameter(ToolParameter::new(
                    "description",
                    "Description of the repository.",
                    false,
                ))
                .with_parameter(
                    ToolParameter::new("private", "Whether the repository should be private.", false)
                        .with_type(ParamType::Boolean),
                )
                .with_parameter(
                    ToolParameter::new(
                        "auto_init",
                        "Whether to initialize the repository with a README.",
                        false,
                    )
                    .with_type(ParamType::Boolean),
                ),
        }
    }

    fn description(&self) -> &'static str {
        match self {
            ToolKind::AddFiles => "Add files to the Git staging area.",
            ToolKind::Commit => "Commit changes to the repository.",
            ToolKind::CreateBranch => "Create a new branch in the repository.",
            ToolKind::CheckoutBranch => "Switch to a specified branch.",
            ToolKind::Pull => "Pull changes from the remote repository.",
            ToolKind::Push => "Push local commits to the remote repository.",
            ToolKind::CloneRepository => "Clone a remote repository to a local directory.",
            ToolKind::CreateLocalRepository => {
                "Initialize a new Git repository in a specified directory."
            }
            ToolKind::CreateRemoteRepository => "Create a new repository on GitHub.",
        }
    }
}

impl std::fmt::Display for ToolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn repository_path() -> ToolParameter {
    ToolParameter::new("repository_path", "Local path to the Git repository.", true)
}

fn remote_name() -> ToolParameter {
    ToolParameter::new("remote_name", "Name of the remote (default 'origin').", false)
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddFilesParams {
    pub repository_path: String,
    pub file_paths: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CommitParams {
    pub repository_path: String,
    pub message: String,
}

/// Shared by create-branch and checkout
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BranchParams {
    pub repository_path: String,
    pub branch_name: String,
}

/// Shared by pull and push
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SyncParams {
    pub repository_path: String,
    #[serde(default)]
    pub remote_name: Option<String>,
    pub branch_name: String,
}

impl SyncParams {
    pub fn remote(&self) -> &str {
        match self.remote_name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => DEFAULT_REMOTE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CloneParams {
    pub repository_url: String,
    pub local_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InitParams {
    pub directory_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateRepositoryParams {
    pub repository_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub private: Option<bool>,
    #[serde(default)]
    pub auto_init: Option<bool>,
}

impl CreateRepositoryParams {
    pub fn into_new_repository(self) -> NewRepository {
        NewRepository::new(self.repository_name)
            .with_description(self.description.unwrap_or_default())
            .with_private(self.private.unwrap_or(false))
            .with_auto_init(self.auto_init.unwrap_or(false))
    }
}

/// A decoded tool invocation, ready to execute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoOperation {
    AddFiles(AddFilesParams),
    Commit(CommitParams),
    CreateBranch(BranchParams),
    CheckoutBranch(BranchParams),
    Pull(SyncParams),
    Push(SyncParams),
    CloneRepository(CloneParams),
    CreateLocalRepository(InitParams),
    CreateRemoteRepository(CreateRepositoryParams),
}

impl RepoOperation {
    /// Decode a model-proposed call.
    ///
    /// Fails with `NOT_FOUND` for an unregistered name and `INVALID_ARGUMENT`
    /// when a field is missing or has the wrong type.
    pub fn from_call(call: &ToolCall) -> Result<Self, ToolError> {
        let kind = ToolKind::from_name(&call.tool_name)
            .ok_or_else(|| ToolError::not_found(format!("Unknown tool: {}", call.tool_name)))?;

        let op = match kind {
            ToolKind::AddFiles => RepoOperation::AddFiles(decode(kind, call)?),
            ToolKind::Commit => RepoOperation::Commit(decode(kind, call)?),
            ToolKind::CreateBranch => RepoOperation::CreateBranch(decode(kind, call)?),
            ToolKind::CheckoutBranch => RepoOperation::CheckoutBranch(decode(kind, call)?),
            ToolKind::Pull => RepoOperation::Pull(decode(kind, call)?),
            ToolKind::Push => RepoOperation::Push(decode(kind, call)?),
            ToolKind::CloneRepository => RepoOperation::CloneRepository(decode(kind, call)?),
            ToolKind::CreateLocalRepository => {
                RepoOperation::CreateLocalRepository(decode(kind, call)?)
            }
            ToolKind::CreateRemoteRepository => {
                RepoOperation::CreateRemoteRepository(decode(kind, call)?)
            }
        };
        op.check_positional_values()?;
        Ok(op)
    }

    /// Branch, remote and URL values end up as positional git arguments and
    /// must not be read as options.
    fn check_positional_values(&self) -> Result<(), ToolError> {
        let kind = self.kind();
        match self {
            RepoOperation::CreateBranch(p) | RepoOperation::CheckoutBranch(p) => {
                positional(kind, "branch_name", &p.branch_name)
            }
            RepoOperation::Pull(p) | RepoOperation::Push(p) => {
                if let Some(remote) = &p.remote_name {
                    positional(kind, "remote_name", remote)?;
                }
                positional(kind, "branch_name", &p.branch_name)
            }
            RepoOperation::CloneRepository(p) => {
                positional(kind, "repository_url", &p.repository_url)
            }
            _ => Ok(()),
        }
    }

    pub fn kind(&self) -> ToolKind {
        match self {
            RepoOperation::AddFiles(_) => ToolKind::AddFiles,
            RepoOperation::Commit(_) => ToolKind::Commit,
            RepoOperation::CreateBranch(_) => ToolKind::CreateBranch,
            RepoOperation::CheckoutBranch(_) => ToolKind::CheckoutBranch,
            RepoOperation::Pull(_) => ToolKind::Pull,
            RepoOperation::Push(_) => ToolKind::Push,
            RepoOperation::CloneRepository(_) => ToolKind::CloneRepository,
            RepoOperation::CreateLocalRepository(_) => ToolKind::CreateLocalRepository,
            RepoOperation::CreateRemoteRepository(_) => ToolKind::CreateRemoteRepository,
        }
    }
}

fn positional(kind: ToolKind, field: &str, value: &str) -> Result<(), ToolError> {
    if value.trim_start().starts_with('-') {
        return Err(ToolError::invalid_argument(format!(
            "Invalid arguments for {}: {} must not start with '-': {}",
            kind.name(),
            field,
            value
        )));
    }
    Ok(())
}

fn decode<T: DeserializeOwned>(kind: ToolKind, call: &ToolCall) -> Result<T, ToolError> {
    serde_json::from_value(call.arguments_value()).map_err(|e| {
        ToolError::invalid_argument(format!("Invalid arguments for {}: {}", kind.name(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in ToolKind::ALL {
            assert_eq!(ToolKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(ToolKind::from_name("git_rebase"), None);
    }

    #[test]
    fn test_targets() {
        assert_eq!(ToolKind::Commit.target(), ToolTarget::WorkingCopy);
        assert_eq!(ToolKind::CreateLocalRepository.target(), ToolTarget::WorkingCopy);
        assert_eq!(ToolKind::CloneRepository.target(), ToolTarget::RemoteHost);
        assert_eq!(ToolKind::CreateRemoteRepository.target(), ToolTarget::RemoteHost);
    }

    #[test]
    fn test_definition_required_fields() {
        let push = ToolKind::Push.definition();
        assert_eq!(
            push.required_parameters().collect::<Vec<_>>(),
            vec!["repository_path", "branch_name"]
        );

        let add = ToolKind::AddFiles.definition();
        let file_paths = add.parameters.iter().find(|p| p.name == "file_paths").unwrap();
        assert_eq!(file_paths.param_type, ParamType::StringArray);

        let create = ToolKind::CreateRemoteRepository.definition();
        assert_eq!(create.required_parameters().collect::<Vec<_>>(), vec!["repository_name"]);
    }

    #[test]
    fn test_decode_add_files() {
        let call = ToolCall::new("c1", "git_add_files")
            .with_arg("repository_path", "/tmp/repo")
            .with_arg("file_paths", serde_json::json!(["a.py", "b.py"]));

        let op = RepoOperation::from_call(&call).unwrap();
        assert_eq!(
            op,
            RepoOperation::AddFiles(AddFilesParams {
                repository_path: "/tmp/repo".to_string(),
                file_paths: vec!["a.py".to_string(), "b.py".to_string()],
            })
        );
        assert_eq!(op.kind(), ToolKind::AddFiles);
    }

    #[test]
    fn test_decode_push_defaults_remote() {
        let call = ToolCall::new("c1", "git_push")
            .with_arg("repository_path", "/tmp/repo")
            .with_arg("branch_name", "main");

        match RepoOperation::from_call(&call).unwrap() {
            RepoOperation::Push(params) => {
                assert_eq!(params.remote(), "origin");
                assert_eq!(params.branch_name, "main");
            }
            other => panic!("unexpected operation: {:?}", other),
        }

        let call = call.with_arg("remote_name", "upstream");
        match RepoOperation::from_call(&call).unwrap() {
            RepoOperation::Push(params) => assert_eq!(params.remote(), "upstream"),
            other => panic!("unexpected operation: {:?}", other),
        }
    }

    #[test]
    fn test_decode_create_repository_defaults() {
        let call = ToolCall::new("c1", "github_create_repository").with_arg("repository_name", "demo");

        match RepoOperation::from_call(&call).unwrap() {
            RepoOperation::CreateRemoteRepository(params) => {
                let repo = params.into_new_repository();
                assert_eq!(repo.name, "demo");
                assert!(!repo.private);
                assert!(!repo.auto_init);
                assert!(repo.description.is_empty());
            }
            other => panic!("unexpected operation: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_tool_is_not_found() {
        let err = RepoOperation::from_call(&ToolCall::new("c1", "rm_rf")).unwrap_err();
        assert_eq!(err.code, "NOT_FOUND");
        assert!(err.message.contains("rm_rf"));
    }

    #[test]
    fn test_missing_field_is_invalid_argument() {
        let call = ToolCall::new("c1", "git_commit").with_arg("repository_path", "/tmp/repo");
        let err = RepoOperation::from_call(&call).unwrap_err();
        assert_eq!(err.code, "INVALID_ARGUMENT");
        assert!(err.message.contains("git_commit"));
        assert!(err.message.contains("message"));
    }

    #[test]
    fn test_option_like_values_are_invalid_argument() {
        let cases = [
            ToolCall::new("c1", "git_pull")
                .with_arg("repository_path", "/tmp/repo")
                .with_arg("remote_name", "--upload-pack=touch /tmp/x; git-upload-pack")
                .with_arg("branch_name", "main"),
            ToolCall::new("c2", "git_push")
                .with_arg("repository_path", "/tmp/repo")
                .with_arg("branch_name", "--force"),
            ToolCall::new("c3", "git_checkout_branch")
                .with_arg("repository_path", "/tmp/repo")
                .with_arg("branch_name", "-f"),
            ToolCall::new("c4", "git_create_branch")
                .with_arg("repository_path", "/tmp/repo")
                .with_arg("branch_name", " -D"),
            ToolCall::new("c5", "git_clone_repository")
                .with_arg("repository_url", "--config=core.sshCommand=sh")
                .with_arg("local_path", "/tmp/copy"),
        ];

        for call in &cases {
            let err = RepoOperation::from_call(call).unwrap_err();
            assert_eq!(err.code, "INVALID_ARGUMENT", "{}", call.tool_name);
            assert!(err.message.contains("must not start with '-'"));
        }
    }

    #[test]
    fn test_dashes_inside_names_are_accepted() {
        let call = ToolCall::new("c1", "git_create_branch")
            .with_arg("repository_path", "/tmp/repo")
            .with_arg("branch_name", "feature/add-login");
        assert!(RepoOperation::from_call(&call).is_ok());
    }

    #[test]
    fn test_mistyped_field_is_invalid_argument() {
        let call = ToolCall::new("c1", "git_add_files")
            .with_arg("repository_path", "/tmp/repo")
            .with_arg("file_paths", "a.py");
        let err = RepoOperation::from_call(&call).unwrap_err();
        assert_eq!(err.code, "INVALID_ARGUMENT");
    }
}
