//! Solutions.
//!
//! A [`Soln`] owns every monitor, link, task and hub built for one
//! instance, in index-addressed arenas. Its root group monitor sums the
//! constraint monitors, so the root's cost is the solution cost.
//!
//! # Algorithm
//! Costs are maintained incrementally: a task mutation emits events to two
//! hubs, the hubs fan them out to attached monitors, each monitor adjusts
//! its deviation and reports a cost change to its parents, and the change
//! propagates up the group DAG. Nothing is ever recomputed from scratch
//! except by the caller detaching and reattaching a monitor.

use std::sync::Arc;

use tracing::info;

use crate::error::SolnError;
use crate::hub::{EventResourceInSoln, ResourceInSoln};
use crate::models::{Cost, EventResourceId, Instance, ResourceId};
use crate::monitor::{
    LinkId, Monitor, MonitorId, MonitorKind, MonitorLink, MonitorTag, TimetableMonitor, Trace,
};
use crate::task::{Task, TaskId};
use crate::validation::validate_instance;

/// A solution of one instance, with its monitors.
#[derive(Debug)]
pub struct Soln {
    pub(crate) instance: Arc<Instance>,
    pub(crate) monitors: Vec<Option<Monitor>>,
    pub(crate) free_monitors: Vec<MonitorId>,
    pub(crate) monitor_order: Vec<MonitorId>,
    pub(crate) links: Vec<Option<MonitorLink>>,
    pub(crate) free_links: Vec<LinkId>,
    pub(crate) tasks: Vec<Option<Task>>,
    pub(crate) free_tasks: Vec<TaskId>,
    pub(crate) resources_in_soln: Vec<ResourceInSoln>,
    pub(crate) event_resources_in_soln: Vec<EventResourceInSoln>,
    pub(crate) traces: Vec<Option<Trace>>,
    pub(crate) root: MonitorId,
}

impl Soln {
    /// Creates an empty solution: the root group, one cycle task and one
    /// detached timetable per resource, and one hub per event resource.
    ///
    /// No constraint monitors are made; see
    /// [`make_all_constraint_monitors`](Self::make_all_constraint_monitors).
    pub fn new(instance: impl Into<Arc<Instance>>) -> Result<Self, SolnError> {
        let instance = instance.into();
        validate_instance(&instance).map_err(SolnError::InvalidInstance)?;

        let mut soln = Self {
            instance: Arc::clone(&instance),
            monitors: Vec::new(),
            free_monitors: Vec::new(),
            monitor_order: Vec::new(),
            links: Vec::new(),
            free_links: Vec::new(),
            tasks: Vec::new(),
            free_tasks: Vec::new(),
            resources_in_soln: Vec::with_capacity(instance.resource_count()),
            event_resources_in_soln: Vec::with_capacity(instance.event_resource_count()),
            traces: Vec::new(),
            root: MonitorId(0),
        };
        soln.root = soln.make_group_monitor(0, "Soln");

        for i in 0..instance.resource_count() {
            let r = ResourceId(i);
            soln.tasks.push(Some(Task::cycle(r)));
            let kind = MonitorKind::Timetable(TimetableMonitor::new(r, instance.time_count()));
            let tt = soln.add_monitor(kind, 0);
            soln.resources_in_soln.push(ResourceInSoln::new(r, tt));
        }
        for i in 0..instance.event_resource_count() {
            soln.event_resources_in_soln
                .push(EventResourceInSoln::new(EventResourceId(i)));
        }
        info!(
            instance = %instance.name,
            resources = instance.resource_count(),
            event_resources = instance.event_resource_count(),
            "solution created"
        );
        Ok(soln)
    }

    pub fn instance(&self) -> &Instance {
        &self.instance
    }

    /// The root group monitor.
    pub fn root(&self) -> MonitorId {
        self.root
    }

    /// Solution cost: the root's cost.
    pub fn cost(&self) -> Cost {
        self.mon(self.root).cost
    }

    /// Sum of the lower bounds of the constraint monitors below the root.
    pub fn lower_bound(&self) -> Cost {
        self.mon(self.root).lower_bound
    }

    /// The monitor with id `m`.
    ///
    /// # Panics
    /// If `m` has been deleted.
    pub fn monitor(&self, m: MonitorId) -> &Monitor {
        self.mon(m)
    }

    pub(crate) fn mon(&self, m: MonitorId) -> &Monitor {
        match self.monitors.get(m.0).and_then(Option::as_ref) {
            Some(monitor) => monitor,
            None => panic!("monitor {m} has been deleted"),
        }
    }

    pub(crate) fn mon_mut(&mut self, m: MonitorId) -> &mut Monitor {
        match self.monitors.get_mut(m.0).and_then(Option::as_mut) {
            Some(monitor) => monitor,
            None => panic!("monitor {m} has been deleted"),
        }
    }

    /// Number of live monitors, of every kind.
    pub fn monitor_count(&self) -> usize {
        self.monitor_order.len()
    }

    /// The monitor at position `i` of the monitor table.
    pub fn monitor_at(&self, i: usize) -> MonitorId {
        self.monitor_order[i]
    }

    /// Live monitors in monitor-table order.
    pub fn monitor_ids(&self) -> impl Iterator<Item = MonitorId> + '_ {
        self.monitor_order.iter().copied()
    }

    pub fn resource_ids(&self) -> impl Iterator<Item = ResourceId> {
        (0..self.instance.resource_count()).map(ResourceId)
    }

    pub fn event_resource_ids(&self) -> impl Iterator<Item = EventResourceId> {
        (0..self.instance.event_resource_count()).map(EventResourceId)
    }

    /// Stores a new detached monitor at the end of the monitor table.
    pub(crate) fn add_monitor(&mut self, kind: MonitorKind, lower_bound: Cost) -> MonitorId {
        let monitor = Monitor::new(kind, lower_bound, self.monitor_order.len());
        let id = match self.free_monitors.pop() {
            Some(id) => {
                self.monitors[id.0] = Some(monitor);
                id
            }
            None => {
                self.monitors.push(Some(monitor));
                MonitorId(self.monitors.len() - 1)
            }
        };
        self.monitor_order.push(id);
        id
    }

    /// Drops a monitor with no links from the arena and the monitor table.
    pub(crate) fn forget_monitor(&mut self, m: MonitorId) {
        let index = self.mon(m).soln_index;
        self.monitor_order.swap_remove(index);
        if let Some(&moved) = self.monitor_order.get(index) {
            self.mon_mut(moved).soln_index = index;
        }
        self.monitors[m.0] = None;
        self.free_monitors.push(m);
    }

    /// Restores the official cost after ad hoc attach, detach and linking:
    /// every constraint monitor ends up attached, reachable from the root
    /// by exactly one path, with limit ceilings lifted.
    ///
    /// Timetable, time-group and group monitors are left as they are.
    pub fn ensure_official_cost(&mut self) {
        let mut repaired = 0usize;
        // attaching may append time-group monitors, so re-read the length
        let mut i = 0;
        while i < self.monitor_order.len() {
            let m = self.monitor_order[i];
            i += 1;
            let tag = self.mon(m).tag();
            if !tag.is_constraint() {
                continue;
            }
            let mut changed = false;
            if !self.mon(m).attached {
                self.attach_monitor(m);
                changed = true;
            }
            if self.path_count(m, self.root) != 1 {
                self.delete_parent_links(m);
                self.group_add_child(self.root, m);
                changed = true;
            }
            let ceiling = match &self.mon(m).kind {
                MonitorKind::LimitBusyTimes(x) => Some(x.ceiling),
                MonitorKind::LimitWorkload(x) => Some(x.ceiling),
                _ => None,
            };
            if let Some(ceiling) = ceiling {
                if ceiling != i32::MAX {
                    if tag == MonitorTag::LimitBusyTimes {
                        self.set_limit_busy_times_ceiling(m, i32::MAX);
                    } else {
                        self.set_limit_workload_ceiling(m, i32::MAX);
                    }
                    changed = true;
                }
            }
            if changed {
                repaired += 1;
            }
        }
        info!(repaired, cost = self.cost(), "official cost restored");
    }
}
