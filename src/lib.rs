//! Incremental constraint monitoring for timetabling solutions.
//!
//! Provides a solution type whose cost is kept up to date as tasks are
//! assigned resources and times, split and merged, fixed and unfixed.
//! Every constraint is watched by monitors that adjust their deviation from
//! the events of each change, and a DAG of group monitors sums their costs
//! into the solution cost.
//!
//! # Modules
//!
//! - **`models`**: Read-only instance: times, time groups, resources, event
//!   resources, constraints, cost arithmetic
//! - **`monitor`**: Monitor variants, group monitors and links, traces,
//!   event dispatch, monitor construction, debug printing
//! - **`hub`**: Per-resource and per-event-resource hubs routing assignment
//!   events to attached monitors
//! - **`task`**: Tasks, their assignment trees, and the checked operations
//!   that change them
//! - **`validation`**: Instance integrity checks run before a solution is
//!   built
//!
//! # Architecture
//!
//! A [`Soln`] owns every monitor, link, task and hub in index-addressed
//! arenas. Task operations call into the hubs, the hubs call the attached
//! monitors, and monitors report cost changes upward through their group
//! parents. Detached monitors receive no events and cost nothing.
//!
//! # References
//!
//! - Kingston (2012), "A software library for school timetabling research"
//! - Post et al. (2014), "XHSTT: an XML archive for high school timetabling
//!   problems in different countries"

mod copy;
pub mod error;
pub mod hub;
pub mod models;
pub mod monitor;
mod soln;
pub mod task;
#[cfg(test)]
mod test_support;
pub mod validation;
pub mod visit;

pub use copy::CopyMemo;
pub use error::{SolnError, TaskError};
pub use monitor::{Monitor, MonitorId, MonitorKind, MonitorTag};
pub use soln::Soln;
pub use task::{NewTask, Task, TaskId};
pub use visit::VisitContext;
