//! Prefer-resources monitors.
//!
//! Deviation is the total duration of the watched event resource's tasks
//! assigned a resource outside the preferred group. Unassigned tasks never
//! count. While every task has a fixed domain inside the preferred group
//! the monitor cannot produce cost, and the event-resource hub may detach it.

use super::zero_cost::{ZeroCostCache, ZeroCostTrigger};
use crate::models::{ConstraintId, EventResourceId, ResourceGroup, ResourceId};

/// Duration on unpreferred resources for one event resource.
#[derive(Debug, Clone)]
pub struct PreferResourcesMonitor {
    pub(crate) constraint: ConstraintId,
    pub(crate) event_resource: EventResourceId,
    pub(crate) domain: ResourceGroup,
    deviation: i32,
    pub(crate) zero_cost: ZeroCostCache,
}

impl PreferResourcesMonitor {
    pub(crate) const ZERO_COST_TRIGGERS: &'static [ZeroCostTrigger] = &[
        ZeroCostTrigger::TaskAdded,
        ZeroCostTrigger::TaskDeleted,
        ZeroCostTrigger::TaskSplit,
        ZeroCostTrigger::TaskMerged,
        ZeroCostTrigger::DomainChanged,
        ZeroCostTrigger::DomainFixed,
        ZeroCostTrigger::DomainUnfixed,
    ];

    pub(crate) fn new(
        constraint: ConstraintId,
        event_resource: EventResourceId,
        domain: ResourceGroup,
    ) -> Self {
        Self {
            constraint,
            event_resource,
            domain,
            deviation: 0,
            zero_cost: ZeroCostCache::default(),
        }
    }

    pub fn constraint(&self) -> ConstraintId {
        self.constraint
    }

    pub fn event_resource(&self) -> EventResourceId {
        self.event_resource
    }

    /// Preferred resources.
    pub fn domain(&self) -> &ResourceGroup {
        &self.domain
    }

    pub fn deviation(&self) -> i32 {
        self.deviation
    }

    /// Whether a task on `r` counts against this monitor.
    pub fn is_wrong(&self, r: Option<ResourceId>) -> bool {
        matches!(r, Some(r) if !self.domain.contains(r))
    }

    pub(crate) fn add_task(&mut self, duration: i32, r: Option<ResourceId>) {
        if self.is_wrong(r) {
            self.deviation += duration;
        }
    }

    pub(crate) fn delete_task(&mut self, duration: i32, r: Option<ResourceId>) {
        if self.is_wrong(r) {
            self.deviation -= duration;
            assert!(self.deviation >= 0, "prefer resources: negative deviation");
        }
    }

    pub(crate) fn assign_resource(&mut self, duration: i32, r: ResourceId) {
        self.add_task(duration, Some(r));
    }

    pub(crate) fn unassign_resource(&mut self, duration: i32, r: ResourceId) {
        self.delete_task(duration, Some(r));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_monitor() -> PreferResourcesMonitor {
        PreferResourcesMonitor::new(
            ConstraintId(0),
            EventResourceId(0),
            ResourceGroup::new([ResourceId(0), ResourceId(1)]),
        )
    }

    #[test]
    fn test_wrong_resources_count() {
        let mut m = sample_monitor();
        m.add_task(2, None);
        m.assign_resource(2, ResourceId(1));
        assert_eq!(m.deviation(), 0);

        m.unassign_resource(2, ResourceId(1));
        m.assign_resource(2, ResourceId(5));
        assert_eq!(m.deviation(), 2);

        m.delete_task(2, Some(ResourceId(5)));
        assert_eq!(m.deviation(), 0);
    }

    #[test]
    fn test_unassigned_is_not_wrong() {
        let m = sample_monitor();
        assert!(!m.is_wrong(None));
        assert!(!m.is_wrong(Some(ResourceId(0))));
        assert!(m.is_wrong(Some(ResourceId(2))));
    }
}
