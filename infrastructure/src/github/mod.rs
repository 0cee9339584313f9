//! Repository host adapter for GitHub (REST v3 + GraphQL v4).

mod client;
mod wire;

pub use client::{DEFAULT_API_URL, GitHubClient};
