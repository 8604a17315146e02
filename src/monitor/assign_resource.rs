//! Assign-resource monitors.
//!
//! Deviation is the total duration of the watched event resource's tasks
//! that have no resource.

use crate::models::{ConstraintId, EventResourceId};

/// Unassigned duration of one event resource.
#[derive(Debug, Clone)]
pub struct AssignResourceMonitor {
    pub(crate) constraint: ConstraintId,
    pub(crate) event_resource: EventResourceId,
    deviation: i32,
}

impl AssignResourceMonitor {
    pub(crate) fn new(constraint: ConstraintId, event_resource: EventResourceId) -> Self {
        Self {
            constraint,
            event_resource,
            deviation: 0,
        }
    }

    pub fn constraint(&self) -> ConstraintId {
        self.constraint
    }

    pub fn event_resource(&self) -> EventResourceId {
        self.event_resource
    }

    pub fn deviation(&self) -> i32 {
        self.deviation
    }

    pub(crate) fn add_task(&mut self, duration: i32, has_resource: bool) {
        if !has_resource {
            self.deviation += duration;
        }
    }

    pub(crate) fn delete_task(&mut self, duration: i32, has_resource: bool) {
        if !has_resource {
            self.deviation -= duration;
            assert!(self.deviation >= 0, "assign resource: negative deviation");
        }
    }

    pub(crate) fn assign_resource(&mut self, duration: i32) {
        self.deviation -= duration;
        assert!(self.deviation >= 0, "assign resource: negative deviation");
    }

    pub(crate) fn unassign_resource(&mut self, duration: i32) {
        self.deviation += duration;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unassigned_duration() {
        let mut m = AssignResourceMonitor::new(ConstraintId(0), EventResourceId(0));
        m.add_task(2, false);
        m.add_task(3, true);
        assert_eq!(m.deviation(), 2);

        m.assign_resource(2);
        assert_eq!(m.deviation(), 0);
        m.unassign_resource(2);
        m.delete_task(2, false);
        m.delete_task(3, true);
        assert_eq!(m.deviation(), 0);
    }

    #[test]
    #[should_panic(expected = "negative deviation")]
    fn test_unmatched_assign_panics() {
        let mut m = AssignResourceMonitor::new(ConstraintId(0), EventResourceId(0));
        m.assign_resource(1);
    }
}
