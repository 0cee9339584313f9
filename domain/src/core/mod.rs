//! Core domain concepts shared across all subdomains.
//!
//! - [`repo::RepoRef`] - an `owner/name` pair on the repository host
//! - [`error::DomainError`] - domain-level errors

pub mod error;
pub mod repo;
