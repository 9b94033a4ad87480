//! Media organization module.
//!
//! Turns resolved media records into `dst/<year>/<timestamp>.<ext>` copies:
//! the planner groups and names, the executor creates directories and copies.

mod executor;
mod namer;
mod planner;
mod types;

pub use executor::{copy_preserving, OrganizeExecutor};
pub use namer::{normalize_extension, DestinationNamer};
pub use planner::OrganizePlanner;
pub use types::*;
