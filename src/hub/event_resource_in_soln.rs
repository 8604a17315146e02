//! Event-resource hubs.
//!
//! Every task derived from an event resource is listed here for its whole
//! life, assigned or not. Assign-resource, prefer-resources and
//! avoid-split-assignments monitors attach here and see each task added,
//! deleted, split, merged, assigned and unassigned.
//!
//! The hub also drives zero-cost detachment: when a task's fixing or domain
//! changes it re-derives the cached predicate of each interested monitor,
//! detaching monitors that provably cannot produce cost and reattaching
//! ones it detached earlier once the proof fails.

use tracing::debug;

use super::remove_monitor;
use crate::models::{Cost, EventResourceId, ResourceId};
use crate::monitor::{
    AvoidSplitAssignmentsMonitor, MonitorId, MonitorKind, PreferResourcesMonitor, ZeroCostTrigger,
};
use crate::task::TaskId;
use crate::Soln;

/// Tasks and monitors of one event resource.
#[derive(Debug, Clone)]
pub struct EventResourceInSoln {
    pub(crate) event_resource: EventResourceId,
    pub(crate) tasks: Vec<TaskId>,
    pub(crate) all_monitors: Vec<MonitorId>,
    pub(crate) attached_monitors: Vec<MonitorId>,
}

impl EventResourceInSoln {
    pub(crate) fn new(event_resource: EventResourceId) -> Self {
        Self {
            event_resource,
            tasks: Vec::new(),
            all_monitors: Vec::new(),
            attached_monitors: Vec::new(),
        }
    }

    pub fn event_resource(&self) -> EventResourceId {
        self.event_resource
    }

    /// Tasks derived from this event resource.
    pub fn tasks(&self) -> &[TaskId] {
        &self.tasks
    }

    /// Monitors registered against this event resource.
    pub fn monitors(&self) -> &[MonitorId] {
        &self.all_monitors
    }

    pub fn attached_monitors(&self) -> &[MonitorId] {
        &self.attached_monitors
    }
}

impl Soln {
    pub fn event_resource_in_soln(&self, er: EventResourceId) -> &EventResourceInSoln {
        &self.event_resources_in_soln[er.0]
    }

    fn ers_mut(&mut self, er: EventResourceId) -> &mut EventResourceInSoln {
        &mut self.event_resources_in_soln[er.0]
    }

    /// Total cost of the monitors registered against `er`.
    pub fn event_resource_cost(&self, er: EventResourceId) -> Cost {
        self.event_resource_in_soln(er)
            .all_monitors
            .iter()
            .map(|&m| self.mon(m).cost)
            .sum()
    }

    pub(crate) fn ers_add_monitor(&mut self, er: EventResourceId, m: MonitorId) {
        self.ers_mut(er).all_monitors.push(m);
    }

    pub(crate) fn ers_remove_monitor(&mut self, er: EventResourceId, m: MonitorId) {
        remove_monitor(&mut self.ers_mut(er).all_monitors, m, "event resource hub remove");
    }

    /// Attaches `m` and replays the current tasks into it.
    pub(crate) fn ers_attach_monitor(&mut self, er: EventResourceId, m: MonitorId) {
        self.ers_mut(er).attached_monitors.push(m);
        for i in 0..self.event_resource_in_soln(er).tasks.len() {
            let task = self.event_resource_in_soln(er).tasks[i];
            self.monitor_add_task(m, task);
        }
    }

    /// Withdraws the current tasks from `m` and detaches it.
    pub(crate) fn ers_detach_monitor(&mut self, er: EventResourceId, m: MonitorId) {
        for i in 0..self.event_resource_in_soln(er).tasks.len() {
            let task = self.event_resource_in_soln(er).tasks[i];
            self.monitor_delete_task(m, task);
        }
        remove_monitor(
            &mut self.ers_mut(er).attached_monitors,
            m,
            "event resource hub detach",
        );
    }

    pub(crate) fn ers_add_task(&mut self, er: EventResourceId, task: TaskId) {
        self.ers_mut(er).tasks.push(task);
        for i in 0..self.event_resource_in_soln(er).attached_monitors.len() {
            let m = self.event_resource_in_soln(er).attached_monitors[i];
            self.monitor_add_task(m, task);
        }
        self.ers_zero_cost_event(er, ZeroCostTrigger::TaskAdded);
    }

    pub(crate) fn ers_delete_task(&mut self, er: EventResourceId, task: TaskId) {
        for i in 0..self.event_resource_in_soln(er).attached_monitors.len() {
            let m = self.event_resource_in_soln(er).attached_monitors[i];
            self.monitor_delete_task(m, task);
        }
        self.ers_remove_task(er, task);
        self.ers_zero_cost_event(er, ZeroCostTrigger::TaskDeleted);
    }

    pub(crate) fn ers_split_task(&mut self, er: EventResourceId, task1: TaskId, task2: TaskId) {
        self.ers_mut(er).tasks.push(task2);
        for i in 0..self.event_resource_in_soln(er).attached_monitors.len() {
            let m = self.event_resource_in_soln(er).attached_monitors[i];
            self.monitor_split_task(m, task1, task2);
        }
        self.ers_zero_cost_event(er, ZeroCostTrigger::TaskSplit);
    }

    pub(crate) fn ers_merge_task(&mut self, er: EventResourceId, task1: TaskId, task2: TaskId) {
        for i in 0..self.event_resource_in_soln(er).attached_monitors.len() {
            let m = self.event_resource_in_soln(er).attached_monitors[i];
            self.monitor_merge_task(m, task1, task2);
        }
        self.ers_remove_task(er, task2);
        self.ers_zero_cost_event(er, ZeroCostTrigger::TaskMerged);
    }

    pub(crate) fn ers_assign_resource(&mut self, er: EventResourceId, task: TaskId, r: ResourceId) {
        for i in 0..self.event_resource_in_soln(er).attached_monitors.len() {
            let m = self.event_resource_in_soln(er).attached_monitors[i];
            self.monitor_assign_resource(m, task, r);
        }
    }

    pub(crate) fn ers_unassign_resource(
        &mut self,
        er: EventResourceId,
        task: TaskId,
        r: ResourceId,
    ) {
        for i in 0..self.event_resource_in_soln(er).attached_monitors.len() {
            let m = self.event_resource_in_soln(er).attached_monitors[i];
            self.monitor_unassign_resource(m, task, r);
        }
    }

    fn ers_remove_task(&mut self, er: EventResourceId, task: TaskId) {
        let tasks = &mut self.ers_mut(er).tasks;
        match tasks.iter().rposition(|&x| x == task) {
            Some(pos) => {
                tasks.swap_remove(pos);
            }
            None => panic!("event resource hub: {task} not derived from {}", er.0),
        }
    }

    /// Re-derives the zero-cost predicate of every monitor of `er` that
    /// `trigger` concerns, detaching or reattaching as the result allows.
    pub(crate) fn ers_zero_cost_event(&mut self, er: EventResourceId, trigger: ZeroCostTrigger) {
        for i in 0..self.event_resource_in_soln(er).all_monitors.len() {
            let m = self.event_resource_in_soln(er).all_monitors[i];
            let detached_by_hub = match &mut self.mon_mut(m).kind {
                MonitorKind::AvoidSplitAssignments(x)
                    if AvoidSplitAssignmentsMonitor::ZERO_COST_TRIGGERS.contains(&trigger) =>
                {
                    x.zero_cost.invalidate();
                    x.zero_cost.detached_by_hub
                }
                MonitorKind::PreferResources(x)
                    if PreferResourcesMonitor::ZERO_COST_TRIGGERS.contains(&trigger) =>
                {
                    x.zero_cost.invalidate();
                    x.zero_cost.detached_by_hub
                }
                _ => continue,
            };

            let (attached, cost) = {
                let monitor = self.mon(m);
                (monitor.attached, monitor.cost)
            };
            if trigger.allows_detach() {
                if attached && cost == 0 && self.monitor_must_have_zero_cost(m) {
                    self.detach_monitor(m);
                    self.set_detached_by_hub(m);
                    debug!(monitor = %m, ?trigger, "zero-cost monitor detached");
                }
            } else if detached_by_hub && !self.monitor_must_have_zero_cost(m) {
                self.attach_monitor(m);
                debug!(monitor = %m, ?trigger, "zero-cost monitor reattached");
            }
        }
    }

    fn set_detached_by_hub(&mut self, m: MonitorId) {
        match &mut self.mon_mut(m).kind {
            MonitorKind::AvoidSplitAssignments(x) => x.zero_cost.detached_by_hub = true,
            MonitorKind::PreferResources(x) => x.zero_cost.detached_by_hub = true,
            _ => {}
        }
    }
}
