//! Timetabling domain models.
//!
//! Provides the read-only input the monitors consult: times, resources,
//! time groups, event resources and weighted constraints, plus the cost
//! arithmetic shared by every monitor.
//!
//! # Domain Mappings
//!
//! | u-timetable | School | University | Hospital |
//! |-------------|--------|------------|----------|
//! | Resource | Teacher/Room/Class | Lecturer/Hall | Nurse/Ward |
//! | EventResource | Teacher of a lesson | Lecturer of a course | Nurse of a shift |
//! | TimeGroup | Day/Morning | Week | Night shifts |

mod constraint;
pub mod cost;
mod event;
mod instance;
mod resource;
mod time;

pub use constraint::{Constraint, ConstraintId, ConstraintKind, CostFunction};
pub use cost::Cost;
pub use event::{EventResource, EventResourceId};
pub use instance::Instance;
pub use resource::{Resource, ResourceGroup, ResourceId};
pub use time::{TimeGroup, TimeGroupId};
