//! Limit-idle-times monitors.
//!
//! The monitor sums the idle counts of its time-group monitors and compares
//! the total against `[minimum, maximum]`. Like limit-busy-times it stages
//! changes and commits them in one flush. Until some time-group monitor
//! feeds it the monitor has no deviation, so a detached monitor reads zero
//! even when its minimum is positive.

use super::MonitorId;
use crate::models::{ConstraintId, ResourceId};

/// Idle-time limits of one resource.
#[derive(Debug, Clone)]
pub struct LimitIdleTimesMonitor {
    pub(crate) constraint: ConstraintId,
    pub(crate) resource: ResourceId,
    minimum: i32,
    maximum: i32,
    total_idle: i32,
    new_total_idle: i32,
    feeds: usize,
    pub(crate) time_group_monitors: Vec<MonitorId>,
}

impl LimitIdleTimesMonitor {
    pub(crate) fn new(
        constraint: ConstraintId,
        resource: ResourceId,
        minimum: i32,
        maximum: i32,
    ) -> Self {
        Self {
            constraint,
            resource,
            minimum,
            maximum,
            total_idle: 0,
            new_total_idle: 0,
            feeds: 0,
            time_group_monitors: Vec::new(),
        }
    }

    pub fn constraint(&self) -> ConstraintId {
        self.constraint
    }

    pub fn resource(&self) -> ResourceId {
        self.resource
    }

    pub fn minimum(&self) -> i32 {
        self.minimum
    }

    pub fn maximum(&self) -> i32 {
        self.maximum
    }

    /// Committed total idle count.
    pub fn total_idle(&self) -> i32 {
        self.total_idle
    }

    /// Time-group monitors feeding this monitor while attached.
    pub fn time_group_monitors(&self) -> &[MonitorId] {
        &self.time_group_monitors
    }

    pub fn deviation(&self) -> i32 {
        self.dev(self.total_idle)
    }

    fn dev(&self, idle: i32) -> i32 {
        if self.feeds == 0 {
            0
        } else if idle < self.minimum {
            self.minimum - idle
        } else if idle > self.maximum {
            idle - self.maximum
        } else {
            0
        }
    }

    pub(crate) fn add_busy_and_idle(&mut self, idle: i32) {
        self.feeds += 1;
        self.new_total_idle += idle;
    }

    pub(crate) fn delete_busy_and_idle(&mut self, idle: i32) {
        assert!(self.feeds > 0, "limit idle times: unmatched delete");
        self.feeds -= 1;
        self.new_total_idle -= idle;
    }

    pub(crate) fn change_busy_and_idle(&mut self, old_idle: i32, new_idle: i32) {
        self.new_total_idle += new_idle - old_idle;
    }

    /// Commits the staged total and returns the deviation.
    pub(crate) fn flush(&mut self) -> i32 {
        assert!(
            self.new_total_idle >= 0,
            "limit idle times: negative idle count"
        );
        self.total_idle = self.new_total_idle;
        self.deviation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_idle() {
        let mut m = LimitIdleTimesMonitor::new(ConstraintId(0), ResourceId(0), 0, 1);
        m.add_busy_and_idle(2);
        m.add_busy_and_idle(1);
        assert_eq!(m.deviation(), 0);
        assert_eq!(m.flush(), 2);

        m.change_busy_and_idle(2, 0);
        assert_eq!(m.flush(), 0);
        assert_eq!(m.total_idle(), 1);

        m.delete_busy_and_idle(1);
        assert_eq!(m.flush(), 0);
    }

    #[test]
    fn test_minimum_shortfall() {
        let mut m = LimitIdleTimesMonitor::new(ConstraintId(0), ResourceId(0), 2, 5);
        assert_eq!(m.deviation(), 0);
        m.add_busy_and_idle(1);
        assert_eq!(m.flush(), 1);
        m.delete_busy_and_idle(1);
        assert_eq!(m.flush(), 0);
    }
}
