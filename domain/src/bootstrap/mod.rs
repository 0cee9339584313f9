//! Bootstrap domain: the declarative task plan and provisioning outcomes.
//!
//! The runner reads a [`plan::TaskPlan`], provisions each entity on the
//! repository host in a fixed order, and records one
//! [`outcome::ProvisionRecord`] per entity in a [`outcome::BootstrapReport`].

pub mod outcome;
pub mod plan;
pub mod profile;
pub mod readme;
