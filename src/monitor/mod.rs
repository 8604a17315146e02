//! Monitors.
//!
//! A monitor watches one constraint at one point of application and
//! contributes a cost to the solution. Monitors form a DAG: each may have
//! several group-monitor parents, and cost changes flow upward through
//! [`Soln::change_cost`](crate::Soln) until they reach the root group, whose
//! cost is the solution cost.
//!
//! Every variant lives in one closed enum, [`MonitorKind`]. Event dispatch
//! matches it exhaustively; a variant that does not handle an event is a
//! programming error and panics.
//!
//! # Families
//!
//! | Monitor | Watches | Deviation |
//! |---------|---------|-----------|
//! | AssignResource | event resource | duration of unassigned tasks |
//! | PreferResources | event resource | duration of tasks on unpreferred resources |
//! | AvoidSplitAssignments | event resource group | distinct resources − 1 |
//! | AvoidClashes | resource | surplus tasks per time |
//! | AvoidUnavailableTimes | resource | busy unavailable times |
//! | LimitIdleTimes | resource | idle times outside the limits |
//! | LimitBusyTimes | resource | busy times outside the limits, per time group |
//! | LimitWorkload | resource | workload outside the limits |
//!
//! Timetable and time-group monitors carry no cost; they turn task
//! assignments into the busy and idle counts the time-based families need.
//! Group monitors sum the costs of their children.

mod assign_resource;
mod avoid_clashes;
mod avoid_split;
mod avoid_unavailable;
mod debug;
mod dispatch;
mod group;
mod limit_busy;
mod limit_idle;
mod limit_workload;
mod link;
mod make;
mod prefer_resources;
mod time_group;
mod timetable;
mod trace;
mod zero_cost;

pub use assign_resource::AssignResourceMonitor;
pub use avoid_clashes::AvoidClashesMonitor;
pub use avoid_split::AvoidSplitAssignmentsMonitor;
pub use avoid_unavailable::AvoidUnavailableTimesMonitor;
pub use group::GroupMonitor;
pub use limit_busy::LimitBusyTimesMonitor;
pub use limit_idle::LimitIdleTimesMonitor;
pub use limit_workload::LimitWorkloadMonitor;
pub(crate) use link::{LinkId, MonitorLink};
pub use prefer_resources::PreferResourcesMonitor;
pub use time_group::TimeGroupMonitor;
pub use timetable::TimetableMonitor;
pub use trace::TraceId;
pub(crate) use trace::Trace;
pub use zero_cost::ZeroCostTrigger;

use std::fmt;

use crate::models::Cost;

/// Index of a monitor in its solution's arena.
///
/// Ids of deleted monitors are reused by later monitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonitorId(pub(crate) usize);

impl fmt::Display for MonitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m{}", self.0)
    }
}

/// Closed set of monitor variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonitorTag {
    AssignResource,
    PreferResources,
    AvoidSplitAssignments,
    AvoidClashes,
    AvoidUnavailableTimes,
    LimitIdleTimes,
    LimitBusyTimes,
    LimitWorkload,
    Timetable,
    TimeGroup,
    Group,
}

impl MonitorTag {
    /// Every tag, constraint families first.
    pub const ALL: [MonitorTag; 11] = [
        MonitorTag::AssignResource,
        MonitorTag::PreferResources,
        MonitorTag::AvoidSplitAssignments,
        MonitorTag::AvoidClashes,
        MonitorTag::AvoidUnavailableTimes,
        MonitorTag::LimitIdleTimes,
        MonitorTag::LimitBusyTimes,
        MonitorTag::LimitWorkload,
        MonitorTag::Timetable,
        MonitorTag::TimeGroup,
        MonitorTag::Group,
    ];

    /// Label used in debug output.
    pub fn show(self) -> &'static str {
        match self {
            MonitorTag::AssignResource => "AssignResourceMonitor",
            MonitorTag::PreferResources => "PreferResourcesMonitor",
            MonitorTag::AvoidSplitAssignments => "AvoidSplitAssignmentsMonitor",
            MonitorTag::AvoidClashes => "AvoidClashesMonitor",
            MonitorTag::AvoidUnavailableTimes => "AvoidUnavailableTimesMonitor",
            MonitorTag::LimitIdleTimes => "LimitIdleTimesMonitor",
            MonitorTag::LimitBusyTimes => "LimitBusyTimesMonitor",
            MonitorTag::LimitWorkload => "LimitWorkloadMonitor",
            MonitorTag::Timetable => "TimetableMonitor",
            MonitorTag::TimeGroup => "TimeGroupMonitor",
            MonitorTag::Group => "GroupMonitor",
        }
    }

    /// Whether monitors of this tag measure a constraint.
    pub fn is_constraint(self) -> bool {
        match self {
            MonitorTag::AssignResource
            | MonitorTag::PreferResources
            | MonitorTag::AvoidSplitAssignments
            | MonitorTag::AvoidClashes
            | MonitorTag::AvoidUnavailableTimes
            | MonitorTag::LimitIdleTimes
            | MonitorTag::LimitBusyTimes
            | MonitorTag::LimitWorkload => true,
            MonitorTag::Timetable | MonitorTag::TimeGroup | MonitorTag::Group => false,
        }
    }
}

/// Variant-specific monitor state.
#[derive(Debug, Clone)]
pub enum MonitorKind {
    AssignResource(AssignResourceMonitor),
    PreferResources(PreferResourcesMonitor),
    AvoidSplitAssignments(AvoidSplitAssignmentsMonitor),
    AvoidClashes(AvoidClashesMonitor),
    AvoidUnavailableTimes(AvoidUnavailableTimesMonitor),
    LimitIdleTimes(LimitIdleTimesMonitor),
    LimitBusyTimes(LimitBusyTimesMonitor),
    LimitWorkload(LimitWorkloadMonitor),
    Timetable(TimetableMonitor),
    TimeGroup(TimeGroupMonitor),
    Group(GroupMonitor),
}

impl MonitorKind {
    /// The tag of this variant.
    pub fn tag(&self) -> MonitorTag {
        match self {
            MonitorKind::AssignResource(_) => MonitorTag::AssignResource,
            MonitorKind::PreferResources(_) => MonitorTag::PreferResources,
            MonitorKind::AvoidSplitAssignments(_) => MonitorTag::AvoidSplitAssignments,
            MonitorKind::AvoidClashes(_) => MonitorTag::AvoidClashes,
            MonitorKind::AvoidUnavailableTimes(_) => MonitorTag::AvoidUnavailableTimes,
            MonitorKind::LimitIdleTimes(_) => MonitorTag::LimitIdleTimes,
            MonitorKind::LimitBusyTimes(_) => MonitorTag::LimitBusyTimes,
            MonitorKind::LimitWorkload(_) => MonitorTag::LimitWorkload,
            MonitorKind::Timetable(_) => MonitorTag::Timetable,
            MonitorKind::TimeGroup(_) => MonitorTag::TimeGroup,
            MonitorKind::Group(_) => MonitorTag::Group,
        }
    }
}

/// State shared by every monitor.
#[derive(Debug, Clone)]
pub struct Monitor {
    pub(crate) cost: Cost,
    pub(crate) lower_bound: Cost,
    pub(crate) attached: bool,
    pub(crate) parent_links: Vec<LinkId>,
    pub(crate) visit_num: u64,
    pub(crate) soln_index: usize,
    pub(crate) back: Option<usize>,
    pub(crate) kind: MonitorKind,
}

impl Monitor {
    pub(crate) fn new(kind: MonitorKind, lower_bound: Cost, soln_index: usize) -> Self {
        // groups are permanently part of the cost computation
        let attached = matches!(kind, MonitorKind::Group(_));
        Self {
            cost: 0,
            lower_bound,
            attached,
            parent_links: Vec::new(),
            visit_num: 0,
            soln_index,
            back: None,
            kind,
        }
    }

    /// Current cost; always 0 while detached.
    pub fn cost(&self) -> Cost {
        self.cost
    }

    /// Floor on the cost this monitor can reach.
    pub fn lower_bound(&self) -> Cost {
        self.lower_bound
    }

    /// Whether the monitor takes part in the cost computation.
    pub fn attached(&self) -> bool {
        self.attached
    }

    /// Variant tag.
    pub fn tag(&self) -> MonitorTag {
        self.kind.tag()
    }

    /// Variant-specific state.
    pub fn kind(&self) -> &MonitorKind {
        &self.kind
    }

    /// Position in the solution's monitor table.
    pub fn soln_index(&self) -> usize {
        self.soln_index
    }

    /// Client bookkeeping slot.
    pub fn back(&self) -> Option<usize> {
        self.back
    }

    /// Number of group monitors this monitor is a child of.
    pub fn parent_count(&self) -> usize {
        self.parent_links.len()
    }
}

/// Panics for an event a monitor variant does not handle.
pub(crate) fn unsupported(event: &str, tag: MonitorTag) -> ! {
    panic!("{event}: {} does not handle this event", tag.show())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_labels_unique() {
        let mut labels: Vec<_> = MonitorTag::ALL.iter().map(|t| t.show()).collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), MonitorTag::ALL.len());
    }

    #[test]
    fn test_constraint_tags() {
        let count = MonitorTag::ALL.iter().filter(|t| t.is_constraint()).count();
        assert_eq!(count, 8);
        assert!(!MonitorTag::Group.is_constraint());
    }

    #[test]
    fn test_new_group_is_attached() {
        let m = Monitor::new(MonitorKind::Group(GroupMonitor::new(0, "Soln")), 0, 0);
        assert!(m.attached());
        assert_eq!(m.cost(), 0);
        assert_eq!(m.tag(), MonitorTag::Group);
    }
}
