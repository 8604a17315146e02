//! Resource hubs.
//!
//! Timetable and limit-workload monitors attach here directly and receive
//! every event of the resource's assigned tasks. The other resource
//! families attach through the resource's timetable, which turns the same
//! events into clash and busy/idle counts.

use super::remove_monitor;
use crate::models::{Cost, ResourceId};
use crate::monitor::{MonitorId, MonitorKind, MonitorTag};
use crate::task::TaskId;
use crate::Soln;

/// Tasks and monitors of one resource.
#[derive(Debug, Clone)]
pub struct ResourceInSoln {
    pub(crate) resource: ResourceId,
    pub(crate) tasks: Vec<TaskId>,
    pub(crate) timetable: MonitorId,
    pub(crate) all_monitors: Vec<MonitorId>,
    pub(crate) attached_monitors: Vec<MonitorId>,
}

impl ResourceInSoln {
    pub(crate) fn new(resource: ResourceId, timetable: MonitorId) -> Self {
        Self {
            resource,
            tasks: Vec::new(),
            timetable,
            all_monitors: Vec::new(),
            attached_monitors: Vec::new(),
        }
    }

    pub fn resource(&self) -> ResourceId {
        self.resource
    }

    /// Tasks currently assigned this resource, in no particular order.
    pub fn tasks(&self) -> &[TaskId] {
        &self.tasks
    }

    /// The resource's timetable monitor.
    pub fn timetable(&self) -> MonitorId {
        self.timetable
    }

    /// Constraint monitors registered against this resource.
    pub fn monitors(&self) -> &[MonitorId] {
        &self.all_monitors
    }

    /// Monitors attached directly to this hub.
    pub fn attached_monitors(&self) -> &[MonitorId] {
        &self.attached_monitors
    }
}

impl Soln {
    pub fn resource_in_soln(&self, r: ResourceId) -> &ResourceInSoln {
        &self.resources_in_soln[r.0]
    }

    fn rs_mut(&mut self, r: ResourceId) -> &mut ResourceInSoln {
        &mut self.resources_in_soln[r.0]
    }

    pub fn resource_timetable(&self, r: ResourceId) -> MonitorId {
        self.resource_in_soln(r).timetable
    }

    pub fn resource_assigned_tasks(&self, r: ResourceId) -> &[TaskId] {
        &self.resource_in_soln(r).tasks
    }

    /// Registered monitors of `r` with tag `tag`.
    pub fn resource_monitors(&self, r: ResourceId, tag: MonitorTag) -> Vec<MonitorId> {
        self.resource_in_soln(r)
            .all_monitors
            .iter()
            .copied()
            .filter(|&m| self.mon(m).tag() == tag)
            .collect()
    }

    /// Total cost of the constraint monitors registered against `r`.
    pub fn resource_cost(&self, r: ResourceId) -> Cost {
        self.resource_in_soln(r)
            .all_monitors
            .iter()
            .map(|&m| self.mon(m).cost)
            .sum()
    }

    /// Cost of the monitors of `r` with tag `tag`.
    pub fn resource_monitor_cost(&self, r: ResourceId, tag: MonitorTag) -> Cost {
        self.resource_monitors(r, tag)
            .into_iter()
            .map(|m| self.mon(m).cost)
            .sum()
    }

    pub(crate) fn rs_add_monitor(&mut self, r: ResourceId, m: MonitorId) {
        self.rs_mut(r).all_monitors.push(m);
    }

    pub(crate) fn rs_remove_monitor(&mut self, r: ResourceId, m: MonitorId) {
        remove_monitor(&mut self.rs_mut(r).all_monitors, m, "resource hub remove");
    }

    /// Attaches `m` directly or through the timetable, per its tag.
    pub(crate) fn rs_attach_monitor(&mut self, r: ResourceId, m: MonitorId) {
        match self.mon(m).tag() {
            MonitorTag::Timetable | MonitorTag::LimitWorkload => {
                self.rs_mut(r).attached_monitors.push(m);
                for i in 0..self.resource_in_soln(r).tasks.len() {
                    let task = self.resource_in_soln(r).tasks[i];
                    self.monitor_assign_resource(m, task, r);
                }
                if self.mon(m).tag() == MonitorTag::LimitWorkload {
                    self.monitor_refresh_cost(m);
                }
            }
            MonitorTag::AvoidClashes
            | MonitorTag::AvoidUnavailableTimes
            | MonitorTag::LimitIdleTimes
            | MonitorTag::LimitBusyTimes => {
                let tt = self.resource_in_soln(r).timetable;
                self.timetable_attach_monitor(tt, m);
            }
            tag => panic!("resource hub attach: {} cannot attach to a resource", tag.show()),
        }
    }

    /// Inverse of [`rs_attach_monitor`](Self::rs_attach_monitor).
    pub(crate) fn rs_detach_monitor(&mut self, r: ResourceId, m: MonitorId) {
        match self.mon(m).tag() {
            MonitorTag::Timetable | MonitorTag::LimitWorkload => {
                for i in 0..self.resource_in_soln(r).tasks.len() {
                    let task = self.resource_in_soln(r).tasks[i];
                    self.monitor_unassign_resource(m, task, r);
                }
                if self.mon(m).tag() == MonitorTag::LimitWorkload {
                    self.change_cost(m, 0);
                }
                remove_monitor(
                    &mut self.rs_mut(r).attached_monitors,
                    m,
                    "resource hub detach",
                );
            }
            MonitorTag::AvoidClashes
            | MonitorTag::AvoidUnavailableTimes
            | MonitorTag::LimitIdleTimes
            | MonitorTag::LimitBusyTimes => {
                let tt = self.resource_in_soln(r).timetable;
                self.timetable_detach_monitor(tt, m);
            }
            tag => panic!("resource hub detach: {} cannot attach to a resource", tag.show()),
        }
    }

    pub(crate) fn rs_assign_resource(&mut self, r: ResourceId, task: TaskId) {
        self.rs_mut(r).tasks.push(task);
        for i in 0..self.resource_in_soln(r).attached_monitors.len() {
            let m = self.resource_in_soln(r).attached_monitors[i];
            self.monitor_assign_resource(m, task, r);
        }
    }

    pub(crate) fn rs_unassign_resource(&mut self, r: ResourceId, task: TaskId) {
        for i in 0..self.resource_in_soln(r).attached_monitors.len() {
            let m = self.resource_in_soln(r).attached_monitors[i];
            self.monitor_unassign_resource(m, task, r);
        }
        self.rs_remove_task(r, task);
    }

    pub(crate) fn rs_split_task(&mut self, r: ResourceId, task1: TaskId, task2: TaskId) {
        self.rs_mut(r).tasks.push(task2);
        for i in 0..self.resource_in_soln(r).attached_monitors.len() {
            let m = self.resource_in_soln(r).attached_monitors[i];
            self.monitor_split_task(m, task1, task2);
        }
    }

    pub(crate) fn rs_merge_task(&mut self, r: ResourceId, task1: TaskId, task2: TaskId) {
        for i in 0..self.resource_in_soln(r).attached_monitors.len() {
            let m = self.resource_in_soln(r).attached_monitors[i];
            self.monitor_merge_task(m, task1, task2);
        }
        self.rs_remove_task(r, task2);
    }

    pub(crate) fn rs_assign_time(&mut self, r: ResourceId, task: TaskId, t: usize) {
        for i in 0..self.resource_in_soln(r).attached_monitors.len() {
            let m = self.resource_in_soln(r).attached_monitors[i];
            self.monitor_assign_time(m, task, t);
        }
    }

    pub(crate) fn rs_unassign_time(&mut self, r: ResourceId, task: TaskId, t: usize) {
        for i in 0..self.resource_in_soln(r).attached_monitors.len() {
            let m = self.resource_in_soln(r).attached_monitors[i];
            self.monitor_unassign_time(m, task, t);
        }
    }

    fn rs_remove_task(&mut self, r: ResourceId, task: TaskId) {
        let tasks = &mut self.rs_mut(r).tasks;
        match tasks.iter().rposition(|&x| x == task) {
            Some(pos) => {
                tasks.swap_remove(pos);
            }
            None => panic!("resource hub: {task} is not assigned {r}"),
        }
    }

    /// The limit-workload monitors of `r` whose workload exceeds the maximum.
    pub fn resource_overloaded_monitors(&self, r: ResourceId) -> Vec<MonitorId> {
        self.resource_in_soln(r)
            .all_monitors
            .iter()
            .copied()
            .filter(|&m| match &self.mon(m).kind {
                MonitorKind::LimitWorkload(x) => x.is_over(),
                _ => false,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::models::ResourceId;
    use crate::monitor::MonitorTag;
    use crate::task::NewTask;
    use crate::test_support::workload_soln;

    #[test]
    fn test_workload_follows_assignments() {
        // limits 2..4 on resource 0
        let mut soln = workload_soln(2, 4);
        let r = ResourceId(0);
        let a = soln.make_task(NewTask::new(3));
        let b = soln.make_task(NewTask::new(2));
        soln.task_assign_resource(a, r).unwrap();
        assert_eq!(soln.resource_monitor_cost(r, MonitorTag::LimitWorkload), 0);
        soln.task_assign_resource(b, r).unwrap();
        assert_eq!(soln.resource_monitor_cost(r, MonitorTag::LimitWorkload), 1);
        assert_eq!(soln.resource_overloaded_monitors(r).len(), 1);
        assert_eq!(soln.resource_assigned_tasks(r).len(), 2);

        soln.task_unassign(a).unwrap();
        assert_eq!(soln.resource_cost(r), 0);
        assert_eq!(soln.resource_assigned_tasks(r), &[b]);
    }

    #[test]
    fn test_idle_resource_falls_short_of_minimum() {
        let mut soln = workload_soln(2, 4);
        let r = ResourceId(0);
        let lw = soln.resource_monitors(r, MonitorTag::LimitWorkload)[0];
        assert_eq!(soln.monitor_deviation(lw), 2);
        assert_eq!(soln.cost(), 2);

        let a = soln.make_task(NewTask::new(1));
        soln.task_assign_resource(a, r).unwrap();
        assert_eq!(soln.cost(), 1);
        soln.task_unassign(a).unwrap();
        assert_eq!(soln.cost(), 2);

        soln.detach_monitor(lw);
        assert_eq!(soln.cost(), 0);
        soln.attach_monitor(lw);
        assert_eq!(soln.cost(), 2);

        let idle = soln.make_task(NewTask::new(3).with_workload(0.0));
        soln.task_assign_resource(idle, r).unwrap();
        assert_eq!(soln.cost(), 2);
    }

    #[test]
    fn test_detached_monitor_skips_events() {
        let mut soln = workload_soln(0, 1);
        let r = ResourceId(0);
        let lw = soln.resource_monitors(r, MonitorTag::LimitWorkload)[0];
        soln.detach_monitor(lw);
        let a = soln.make_task(NewTask::new(5));
        soln.task_assign_resource(a, r).unwrap();
        assert_eq!(soln.cost(), 0);

        soln.attach_monitor(lw);
        assert_eq!(soln.cost(), 4);
        assert_eq!(soln.resource_in_soln(r).attached_monitors().len(), 1);
    }
}
