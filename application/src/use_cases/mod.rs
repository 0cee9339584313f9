//! Use cases (application services)

pub mod dispatch_tools;
pub mod run_bootstrap;
pub mod run_chat;
