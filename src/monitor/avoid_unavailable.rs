//! Avoid-unavailable-times monitors.
//!
//! Deviation is the busy count of the unavailable time group, fed by a
//! single time-group monitor.

use crate::models::{ConstraintId, ResourceId, TimeGroupId};

/// Busy unavailable times of one resource.
#[derive(Debug, Clone)]
pub struct AvoidUnavailableTimesMonitor {
    pub(crate) constraint: ConstraintId,
    pub(crate) resource: ResourceId,
    pub(crate) times: TimeGroupId,
    deviation: i32,
}

impl AvoidUnavailableTimesMonitor {
    pub(crate) fn new(constraint: ConstraintId, resource: ResourceId, times: TimeGroupId) -> Self {
        Self {
            constraint,
            resource,
            times,
            deviation: 0,
        }
    }

    pub fn constraint(&self) -> ConstraintId {
        self.constraint
    }

    pub fn resource(&self) -> ResourceId {
        self.resource
    }

    /// The unavailable times.
    pub fn times(&self) -> TimeGroupId {
        self.times
    }

    pub fn deviation(&self) -> i32 {
        self.deviation
    }

    pub(crate) fn add_busy_and_idle(&mut self, busy: i32) {
        assert_eq!(self.deviation, 0, "avoid unavailable times: added twice");
        self.deviation = busy;
    }

    pub(crate) fn delete_busy_and_idle(&mut self, busy: i32) {
        assert_eq!(
            self.deviation, busy,
            "avoid unavailable times: busy count out of step"
        );
        self.deviation = 0;
    }

    pub(crate) fn change_busy_and_idle(&mut self, old_busy: i32, new_busy: i32) {
        assert_eq!(
            self.deviation, old_busy,
            "avoid unavailable times: busy count out of step"
        );
        self.deviation = new_busy;
    }
}
