//! Avoid-split-assignments monitors.
//!
//! The monitor keeps the distinct resources assigned to the tasks of its
//! event resources, each with a multiplicity. Deviation is the number of
//! distinct resources minus one.
//!
//! When every task's first unfixed ancestor is one and the same task, all
//! of them must end up on the same resource and the monitor cannot produce
//! cost; the event-resource hubs then detach it.

use super::zero_cost::{ZeroCostCache, ZeroCostTrigger};
use crate::models::{ConstraintId, EventResourceId, ResourceId};

/// Distinct resources across a group of event resources.
#[derive(Debug, Clone)]
pub struct AvoidSplitAssignmentsMonitor {
    pub(crate) constraint: ConstraintId,
    pub(crate) event_resources: Vec<EventResourceId>,
    resources: Vec<ResourceId>,
    multiplicities: Vec<usize>,
    pub(crate) zero_cost: ZeroCostCache,
}

impl AvoidSplitAssignmentsMonitor {
    pub(crate) const ZERO_COST_TRIGGERS: &'static [ZeroCostTrigger] = &[
        ZeroCostTrigger::TaskAdded,
        ZeroCostTrigger::TaskDeleted,
        ZeroCostTrigger::TaskSplit,
        ZeroCostTrigger::TaskMerged,
        ZeroCostTrigger::AssignFixed,
        ZeroCostTrigger::AssignUnfixed,
    ];

    pub(crate) fn new(constraint: ConstraintId, event_resources: Vec<EventResourceId>) -> Self {
        Self {
            constraint,
            event_resources,
            resources: Vec::new(),
            multiplicities: Vec::new(),
            zero_cost: ZeroCostCache::default(),
        }
    }

    pub fn constraint(&self) -> ConstraintId {
        self.constraint
    }

    /// The event resources whose tasks should share one resource.
    pub fn event_resources(&self) -> &[EventResourceId] {
        &self.event_resources
    }

    /// Distinct resources currently assigned.
    pub fn resources(&self) -> &[ResourceId] {
        &self.resources
    }

    /// Number of tasks assigned `r`.
    pub fn multiplicity(&self, r: ResourceId) -> usize {
        self.resources
            .iter()
            .position(|&x| x == r)
            .map_or(0, |i| self.multiplicities[i])
    }

    pub fn deviation(&self) -> i32 {
        self.resources.len().saturating_sub(1) as i32
    }

    pub(crate) fn assign_resource(&mut self, r: ResourceId) {
        match self.resources.iter().position(|&x| x == r) {
            Some(i) => self.multiplicities[i] += 1,
            None => {
                self.resources.push(r);
                self.multiplicities.push(1);
            }
        }
    }

    pub(crate) fn unassign_resource(&mut self, r: ResourceId) {
        let i = match self.resources.iter().position(|&x| x == r) {
            Some(i) => i,
            None => panic!("avoid split assignments: unassign of untracked resource {r}"),
        };
        self.multiplicities[i] -= 1;
        if self.multiplicities[i] == 0 {
            self.resources.swap_remove(i);
            self.multiplicities.swap_remove(i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distinct_resources() {
        let (a, b) = (ResourceId(0), ResourceId(1));
        let mut m = AvoidSplitAssignmentsMonitor::new(ConstraintId(0), vec![EventResourceId(0)]);
        m.assign_resource(a);
        m.assign_resource(a);
        m.assign_resource(b);
        assert_eq!(m.deviation(), 1);
        assert_eq!(m.multiplicity(a), 2);

        m.unassign_resource(b);
        assert_eq!(m.deviation(), 0);
        assert_eq!(m.resources(), &[a]);
    }

    #[test]
    fn test_swap_remove_keeps_pairs() {
        let (a, b, c) = (ResourceId(0), ResourceId(1), ResourceId(2));
        let mut m = AvoidSplitAssignmentsMonitor::new(ConstraintId(0), vec![]);
        m.assign_resource(a);
        m.assign_resource(b);
        m.assign_resource(c);
        m.assign_resource(c);
        m.unassign_resource(a);
        assert_eq!(m.multiplicity(c), 2);
        assert_eq!(m.multiplicity(b), 1);
        assert_eq!(m.deviation(), 1);
    }

    #[test]
    #[should_panic(expected = "untracked resource")]
    fn test_unmatched_unassign_panics() {
        let mut m = AvoidSplitAssignmentsMonitor::new(ConstraintId(0), vec![]);
        m.unassign_resource(ResourceId(3));
    }
}
