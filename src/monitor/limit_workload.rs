//! Limit-workload monitors.
//!
//! The monitor sums the workload of every task assigned its resource.
//! Workloads are fractional, so comparisons against the limits allow a
//! tolerance of 0.001 and deviations round up. A resource with no tasks has
//! workload 0 and falls short of any positive minimum. Tasks of workload 0
//! are not recorded.
//!
//! Attaching replays the resource's tasks and then sets the cost from the
//! resulting workload, so the shortfall of an idle resource is charged too.

use crate::models::{ConstraintId, ResourceId};

const TOLERANCE: f64 = 0.001;

/// Workload limits of one resource.
#[derive(Debug, Clone)]
pub struct LimitWorkloadMonitor {
    pub(crate) constraint: ConstraintId,
    pub(crate) resource: ResourceId,
    minimum: i32,
    maximum: i32,
    pub(crate) ceiling: i32,
    workload: f64,
}

impl LimitWorkloadMonitor {
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
            ceiling: i32::MAX,
            workload: 0.0,
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

    /// Workloads above this are not defective.
    pub fn ceiling(&self) -> i32 {
        self.ceiling
    }

    /// Total workload of the assigned tasks.
    pub fn workload(&self) -> f64 {
        self.workload
    }

    pub fn deviation(&self) -> i32 {
        let w = self.workload;
        if w > self.ceiling as f64 + TOLERANCE {
            0
        } else if w < self.minimum as f64 - TOLERANCE {
            (self.minimum as f64 - TOLERANCE - w).ceil() as i32
        } else if w > self.maximum as f64 + TOLERANCE {
            (w - self.maximum as f64 - TOLERANCE).ceil() as i32
        } else {
            0
        }
    }

    /// Whether the deviation exceeds the maximum rather than falls short.
    pub fn is_over(&self) -> bool {
        self.workload > self.maximum as f64 + TOLERANCE
    }

    pub(crate) fn assign_resource(&mut self, workload: f64) {
        if workload > 0.0 {
            self.workload += workload;
        }
    }

    pub(crate) fn unassign_resource(&mut self, workload: f64) {
        if workload <= 0.0 {
            return;
        }
        self.workload -= workload;
        assert!(
            self.workload > -TOLERANCE,
            "limit workload: negative workload"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workload_window() {
        let mut m = LimitWorkloadMonitor::new(ConstraintId(0), ResourceId(0), 4, 6);
        assert_eq!(m.deviation(), 4);
        m.assign_resource(3.5);
        assert_eq!(m.deviation(), 1);
        m.assign_resource(1.0);
        assert_eq!(m.deviation(), 0);
        m.assign_resource(2.5);
        assert_eq!(m.deviation(), 1);
        assert!(m.is_over());
    }

    #[test]
    fn test_tolerance_and_ceiling() {
        let mut m = LimitWorkloadMonitor::new(ConstraintId(0), ResourceId(0), 0, 2);
        m.assign_resource(2.0005);
        assert_eq!(m.deviation(), 0);
        m.assign_resource(3.0);
        assert_eq!(m.deviation(), 3);
        m.ceiling = 4;
        assert_eq!(m.deviation(), 0);
        m.unassign_resource(3.0);
        m.unassign_resource(2.0005);
        assert_eq!(m.deviation(), 0);
    }

    #[test]
    fn test_zero_workload_tasks_ignored() {
        let mut m = LimitWorkloadMonitor::new(ConstraintId(0), ResourceId(0), 2, 4);
        assert_eq!(m.deviation(), 2);
        m.assign_resource(0.0);
        assert_eq!(m.workload(), 0.0);
        assert_eq!(m.deviation(), 2);
        m.assign_resource(1.0);
        assert_eq!(m.deviation(), 1);
        m.unassign_resource(0.0);
        m.unassign_resource(1.0);
        assert_eq!(m.deviation(), 2);
    }
}
