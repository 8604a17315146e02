//! Limit-busy-times monitors.
//!
//! Each time group of the constraint contributes `dev(busy)`: nothing when
//! the resource is not busy there at all or is busier than the ceiling,
//! otherwise the shortfall below the minimum or the excess above the
//! maximum. Each busy-and-idle event is staged in `new_deviation` and
//! committed by [`flush`](LimitBusyTimesMonitor::flush) before the cost is
//! refreshed. A timetable pass touching several time groups flushes each
//! one's monitor in turn, so it yields one cost change per time group.
//!
//! Defects are keyed by the constraint's own time group, even when a time
//! group with the same times supplies the busy count.

use crate::models::{ConstraintId, ResourceId, TimeGroupId};

/// Busy-time limits of one resource.
#[derive(Debug, Clone)]
pub struct LimitBusyTimesMonitor {
    pub(crate) constraint: ConstraintId,
    pub(crate) resource: ResourceId,
    minimum: i32,
    maximum: i32,
    pub(crate) ceiling: i32,
    deviation: i32,
    new_deviation: i32,
    defective: Vec<(TimeGroupId, i32)>,
}

impl LimitBusyTimesMonitor {
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
            deviation: 0,
            new_deviation: 0,
            defective: Vec::new(),
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

    /// Busy counts above this are not defective.
    pub fn ceiling(&self) -> i32 {
        self.ceiling
    }

    pub fn deviation(&self) -> i32 {
        self.deviation
    }

    /// Defective time groups with their busy counts.
    pub fn defective_time_groups(&self) -> &[(TimeGroupId, i32)] {
        &self.defective
    }

    /// Deviation contributed by one time group with `busy` busy times.
    pub fn dev(&self, busy: i32) -> i32 {
        if busy == 0 || busy > self.ceiling {
            0
        } else if busy < self.minimum {
            self.minimum - busy
        } else if busy > self.maximum {
            busy - self.maximum
        } else {
            0
        }
    }

    pub(crate) fn add_busy_and_idle(&mut self, tg: TimeGroupId, busy: i32) {
        let dev = self.dev(busy);
        if dev != 0 {
            self.new_deviation += dev;
            self.defective.push((tg, busy));
        }
    }

    pub(crate) fn delete_busy_and_idle(&mut self, tg: TimeGroupId, busy: i32) {
        let dev = self.dev(busy);
        if dev != 0 {
            self.new_deviation -= dev;
            self.remove_defective(tg, busy);
        }
    }

    pub(crate) fn change_busy_and_idle(&mut self, tg: TimeGroupId, old_busy: i32, new_busy: i32) {
        let old_dev = self.dev(old_busy);
        let new_dev = self.dev(new_busy);
        match (old_dev, new_dev) {
            (0, 0) => {}
            (0, _) => self.add_busy_and_idle(tg, new_busy),
            (_, 0) => self.delete_busy_and_idle(tg, old_busy),
            _ => {
                self.new_deviation += new_dev - old_dev;
                if let Some(entry) = self
                    .defective
                    .iter_mut()
                    .find(|(g, b)| *g == tg && *b == old_busy)
                {
                    entry.1 = new_busy;
                }
            }
        }
    }

    /// Commits the staged deviation and returns it.
    pub(crate) fn flush(&mut self) -> i32 {
        assert!(
            self.new_deviation >= 0,
            "limit busy times: negative deviation"
        );
        self.deviation = self.new_deviation;
        self.deviation
    }

    fn remove_defective(&mut self, tg: TimeGroupId, busy: i32) {
        match self
            .defective
            .iter()
            .position(|&(g, b)| g == tg && b == busy)
        {
            Some(i) => {
                self.defective.swap_remove(i);
            }
            None => panic!("limit busy times: time group {} not defective", tg.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_monitor() -> LimitBusyTimesMonitor {
        LimitBusyTimesMonitor::new(ConstraintId(0), ResourceId(0), 2, 4)
    }

    #[test]
    fn test_dev_window() {
        let m = sample_monitor();
        assert_eq!(m.dev(0), 0);
        assert_eq!(m.dev(1), 1);
        assert_eq!(m.dev(3), 0);
        assert_eq!(m.dev(6), 2);
    }

    #[test]
    fn test_ceiling_exempts() {
        let mut m = sample_monitor();
        m.ceiling = 5;
        assert_eq!(m.dev(5), 1);
        assert_eq!(m.dev(6), 0);
    }

    #[test]
    fn test_staged_flush() {
        let (tg0, tg1) = (TimeGroupId(0), TimeGroupId(1));
        let mut m = sample_monitor();
        m.add_busy_and_idle(tg0, 1);
        m.add_busy_and_idle(tg1, 6);
        assert_eq!(m.deviation(), 0);
        assert_eq!(m.flush(), 3);
        assert_eq!(m.defective_time_groups().len(), 2);

        m.change_busy_and_idle(tg1, 6, 7);
        m.change_busy_and_idle(tg0, 1, 2);
        assert_eq!(m.flush(), 3);
        assert_eq!(m.defective_time_groups(), &[(tg1, 7)]);

        m.delete_busy_and_idle(tg1, 7);
        assert_eq!(m.flush(), 0);
        assert!(m.defective_time_groups().is_empty());
    }
}
