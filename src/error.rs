//! Error types.
//!
//! Broken internal invariants (negative deviations, unmatched unassign
//! events, events sent to monitors that do not handle them) are programming
//! errors and panic. The errors here are the conditions a caller is expected
//! to test for before mutating: each `*_check` operation returns them, and
//! the matching mutation returns the same error without changing anything.

use thiserror::Error;

use crate::validation::ValidationError;

/// Why a task operation was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TaskError {
    /// The task's assignment is fixed.
    #[error("task assignment is fixed")]
    Fixed,
    /// Cycle tasks stand for resources and never move.
    #[error("cycle tasks cannot be changed")]
    CycleTask,
    /// The requested target equals the current one.
    #[error("task is already assigned to that target")]
    NoChange,
    /// Assign requires an unassigned task.
    #[error("task is already assigned")]
    AlreadyAssigned,
    /// Unassign requires an assigned task.
    #[error("task is not assigned")]
    NotAssigned,
    /// A target domain (or a child domain) is not inside the task domain.
    #[error("domain is not a subset of the task domain")]
    DomainMismatch,
    /// The target lies below the task in its own assignment tree.
    #[error("assignment would create a cycle")]
    CyclicAssignment,
    /// The task domain is fixed.
    #[error("task domain is fixed")]
    DomainFixed,
    /// The split point is not strictly inside the task.
    #[error("split point {durn1} outside 1..{duration}")]
    BadSplit { durn1: i32, duration: i32 },
    /// The two tasks differ in something a merge must preserve.
    #[error("tasks cannot be merged: {0}")]
    MergeMismatch(&'static str),
    /// Assign time requires a task without a time.
    #[error("task already has a time")]
    TimeAssigned,
    /// Unassign time requires a task with a time.
    #[error("task has no time")]
    TimeUnassigned,
    /// The task would run past the last time.
    #[error("time {time} plus duration {duration} exceeds {time_count} times")]
    TimeOutOfRange {
        time: usize,
        duration: i32,
        time_count: usize,
    },
}

/// Why a solution could not be built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolnError {
    /// The instance failed validation.
    #[error("invalid instance ({} errors, first: {})", .0.len(), first_message(.0))]
    InvalidInstance(Vec<ValidationError>),
}

fn first_message(errors: &[ValidationError]) -> &str {
    errors.first().map(|e| e.message.as_str()).unwrap_or("none")
}
