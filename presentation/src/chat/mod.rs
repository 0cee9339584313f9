//! Interactive chat module
//!
//! Provides a line-editor based chat interface to the repository agent.

mod repl;

pub use repl::ChatRepl;
