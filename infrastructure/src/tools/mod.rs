//! Tool schema adapters
//!
//! Execution of the repository tools lives in the application layer
//! (`ToolDispatcher`); this module only serializes the tool contract for the
//! model API.

mod schema;

pub use schema::JsonSchemaToolConverter;
