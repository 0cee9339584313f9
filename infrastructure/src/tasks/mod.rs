//! Declarative task plan files

mod loader;

pub use loader::{TaskPlanError, load_task_plan, parse_task_plan};
