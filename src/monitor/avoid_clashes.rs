//! Avoid-clashes monitors.
//!
//! Deviation is the number of surplus tasks summed over the times of the
//! resource's timetable: a time with `n > 1` tasks contributes `n - 1`.

use crate::models::{ConstraintId, ResourceId};

/// Clashes of one resource.
#[derive(Debug, Clone)]
pub struct AvoidClashesMonitor {
    pub(crate) constraint: ConstraintId,
    pub(crate) resource: ResourceId,
    deviation: i32,
    new_deviation: i32,
}

impl AvoidClashesMonitor {
    pub(crate) fn new(constraint: ConstraintId, resource: ResourceId) -> Self {
        Self {
            constraint,
            resource,
            deviation: 0,
            new_deviation: 0,
        }
    }

    pub fn constraint(&self) -> ConstraintId {
        self.constraint
    }

    pub fn resource(&self) -> ResourceId {
        self.resource
    }

    pub fn deviation(&self) -> i32 {
        self.deviation
    }

    /// Stages the clash count of one time moving from `old` to `new`.
    pub(crate) fn change_clash_count(&mut self, old: i32, new: i32) {
        self.new_deviation += new - old;
    }

    pub(crate) fn flush(&mut self) -> i32 {
        assert!(self.new_deviation >= 0, "avoid clashes: negative deviation");
        self.deviation = self.new_deviation;
        self.deviation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clash_counts() {
        let mut m = AvoidClashesMonitor::new(ConstraintId(0), ResourceId(0));
        m.change_clash_count(0, 1);
        m.change_clash_count(1, 2);
        assert_eq!(m.deviation(), 0);
        assert_eq!(m.flush(), 2);
        m.change_clash_count(2, 0);
        assert_eq!(m.flush(), 0);
    }
}
