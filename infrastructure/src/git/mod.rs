//! Working-copy adapter backed by the `git` executable.

mod command_client;

pub use command_client::CommandGitClient;
