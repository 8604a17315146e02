//! Timetable monitors.
//!
//! One timetable per resource records, for every time, the tasks the
//! resource attends then and the time-group monitors covering it. It turns
//! task time and resource events into clash counts for avoid-clashes
//! monitors and busy/idle counts (via time-group monitors) for the other
//! time-based families. It has no cost of its own.
//!
//! The timetable attaches itself when its first dependent attaches and
//! detaches when its last dependent detaches.

use std::sync::Arc;

use tracing::debug;

use super::{unsupported, Monitor, MonitorId, MonitorKind, MonitorTag, TimeGroupMonitor};
use crate::models::{ConstraintKind, ResourceId, TimeGroupId};
use crate::task::TaskId;
use crate::Soln;

/// Tasks and time-group monitors at one time.
#[derive(Debug, Clone, Default)]
pub(crate) struct TimeCell {
    pub(crate) tasks: Vec<TaskId>,
    pub(crate) monitors: Vec<MonitorId>,
}

/// Per-time view of one resource's assignments.
#[derive(Debug, Clone)]
pub struct TimetableMonitor {
    pub(crate) resource: ResourceId,
    pub(crate) cells: Vec<TimeCell>,
    pub(crate) avoid_clashes_monitors: Vec<MonitorId>,
    pub(crate) time_group_monitors: Vec<MonitorId>,
    pub(crate) clashing_times: Vec<usize>,
    pub(crate) attached_monitor_count: usize,
}

impl TimetableMonitor {
    pub(crate) fn new(resource: ResourceId, time_count: usize) -> Self {
        Self {
            resource,
            cells: vec![TimeCell::default(); time_count],
            avoid_clashes_monitors: Vec::new(),
            time_group_monitors: Vec::new(),
            clashing_times: Vec::new(),
            attached_monitor_count: 0,
        }
    }

    pub fn resource(&self) -> ResourceId {
        self.resource
    }

    /// Number of tasks running at time `t`.
    pub fn time_task_count(&self, t: usize) -> usize {
        self.cells[t].tasks.len()
    }

    /// Tasks running at time `t`.
    pub fn time_tasks(&self, t: usize) -> &[TaskId] {
        &self.cells[t].tasks
    }

    /// Whether nothing runs at time `t`.
    pub fn time_available(&self, t: usize) -> bool {
        self.cells[t].tasks.is_empty()
    }

    /// Number of times with more than one task.
    pub fn clashing_time_count(&self) -> usize {
        self.clashing_times.len()
    }

    /// The `i`th clashing time, in no particular order.
    pub fn clashing_time(&self, i: usize) -> usize {
        self.clashing_times[i]
    }

    /// Time-group monitors built on this timetable.
    pub fn time_group_monitors(&self) -> &[MonitorId] {
        &self.time_group_monitors
    }

    /// Number of monitors currently attached through this timetable.
    pub fn attached_monitor_count(&self) -> usize {
        self.attached_monitor_count
    }

    fn remove_clashing_time(&mut self, t: usize) {
        if let Some(pos) = self.clashing_times.iter().position(|&x| x == t) {
            self.clashing_times.swap_remove(pos);
        }
    }
}

impl Soln {
    pub(crate) fn timetable(&self, tt: MonitorId) -> &TimetableMonitor {
        match &self.mon(tt).kind {
            MonitorKind::Timetable(t) => t,
            other => panic!("{tt} is a {}, not a timetable", other.tag().show()),
        }
    }

    pub(crate) fn timetable_mut(&mut self, tt: MonitorId) -> &mut TimetableMonitor {
        match &mut self.mon_mut(tt).kind {
            MonitorKind::Timetable(t) => t,
            other => panic!("{tt} is a {}, not a timetable", other.tag().show()),
        }
    }

    /// Attaches `m` through timetable `tt`, attaching `tt` first if needed.
    pub(crate) fn timetable_attach_monitor(&mut self, tt: MonitorId, m: MonitorId) {
        if !self.mon(tt).attached {
            self.attach_monitor(tt);
        }
        let instance = Arc::clone(&self.instance);
        let tag = self.mon(m).tag();
        match tag {
            MonitorTag::AvoidClashes => {
                self.timetable_mut(tt).avoid_clashes_monitors.push(m);
                let changes: Vec<(i32, i32)> = self
                    .timetable(tt)
                    .cells
                    .iter()
                    .filter(|cell| cell.tasks.len() >= 2)
                    .map(|cell| (0, cell.tasks.len() as i32 - 1))
                    .collect();
                self.avoid_clashes_apply(m, &changes);
            }
            MonitorTag::AvoidUnavailableTimes
            | MonitorTag::LimitIdleTimes
            | MonitorTag::LimitBusyTimes => {
                for tg in self.dependent_time_groups(m, &instance) {
                    let tgm = match self.timetable_find_time_group_monitor(tt, tg) {
                        Some(tgm) => tgm,
                        None => self.make_time_group_monitor(tt, tg),
                    };
                    if let MonitorKind::LimitIdleTimes(lit) = &mut self.mon_mut(m).kind {
                        lit.time_group_monitors.push(tgm);
                    }
                    self.time_group_attach_monitor(tgm, m);
                }
            }
            MonitorTag::TimeGroup => {
                self.timetable_mut(tt).time_group_monitors.insert(0, m);
                let tg = self.time_group_monitor(m).time_group;
                for &t in instance.time_group(tg).times() {
                    let busy = {
                        let cell = &mut self.timetable_mut(tt).cells[t];
                        cell.monitors.push(m);
                        !cell.tasks.is_empty()
                    };
                    if busy {
                        self.time_group_assign_non_clash(m, t);
                    }
                }
                self.time_group_flush(m);
            }
            MonitorTag::AssignResource
            | MonitorTag::PreferResources
            | MonitorTag::AvoidSplitAssignments
            | MonitorTag::LimitWorkload
            | MonitorTag::Timetable
            | MonitorTag::Group => unsupported("timetable attach", tag),
        }
        self.timetable_mut(tt).attached_monitor_count += 1;
        debug!(timetable = %tt, monitor = %m, tag = tag.show(), "attached through timetable");
    }

    /// Inverse of [`timetable_attach_monitor`](Self::timetable_attach_monitor).
    pub(crate) fn timetable_detach_monitor(&mut self, tt: MonitorId, m: MonitorId) {
        let instance = Arc::clone(&self.instance);
        let tag = self.mon(m).tag();
        match tag {
            MonitorTag::AvoidClashes => {
                let changes: Vec<(i32, i32)> = self
                    .timetable(tt)
                    .cells
                    .iter()
                    .filter(|cell| cell.tasks.len() >= 2)
                    .map(|cell| (cell.tasks.len() as i32 - 1, 0))
                    .collect();
                self.avoid_clashes_apply(m, &changes);
                let acms = &mut self.timetable_mut(tt).avoid_clashes_monitors;
                if let Some(pos) = acms.iter().position(|&x| x == m) {
                    acms.swap_remove(pos);
                }
            }
            MonitorTag::LimitIdleTimes => {
                let tgms = match &mut self.mon_mut(m).kind {
                    MonitorKind::LimitIdleTimes(lit) => std::mem::take(&mut lit.time_group_monitors),
                    other => unsupported("timetable detach", other.tag()),
                };
                for tgm in tgms {
                    self.time_group_detach_monitor(tgm, m);
                }
            }
            MonitorTag::AvoidUnavailableTimes | MonitorTag::LimitBusyTimes => {
                for tg in self.dependent_time_groups(m, &instance) {
                    match self.timetable_find_time_group_monitor(tt, tg) {
                        Some(tgm) => self.time_group_detach_monitor(tgm, m),
                        None => panic!("timetable detach: no time-group monitor for {}", tg.0),
                    }
                }
            }
            MonitorTag::TimeGroup => {
                assert!(
                    self.time_group_monitor(m).monitors.is_empty(),
                    "timetable detach: time-group monitor {m} still has dependents"
                );
                let tg = self.time_group_monitor(m).time_group;
                for &t in instance.time_group(tg).times() {
                    let busy = {
                        let cell = &mut self.timetable_mut(tt).cells[t];
                        if let Some(pos) = cell.monitors.iter().position(|&x| x == m) {
                            cell.monitors.swap_remove(pos);
                        }
                        !cell.tasks.is_empty()
                    };
                    if busy {
                        self.time_group_unassign_non_clash(m, t);
                    }
                }
                self.time_group_flush(m);
                let tgms = &mut self.timetable_mut(tt).time_group_monitors;
                if let Some(pos) = tgms.iter().position(|&x| x == m) {
                    tgms.remove(pos);
                }
            }
            MonitorTag::AssignResource
            | MonitorTag::PreferResources
            | MonitorTag::AvoidSplitAssignments
            | MonitorTag::LimitWorkload
            | MonitorTag::Timetable
            | MonitorTag::Group => unsupported("timetable detach", tag),
        }

        let count = {
            let timetable = self.timetable_mut(tt);
            timetable.attached_monitor_count -= 1;
            timetable.attached_monitor_count
        };
        debug!(timetable = %tt, monitor = %m, tag = tag.show(), "detached through timetable");
        if count == 0 && self.mon(tt).attached {
            self.detach_monitor(tt);
        }
    }

    /// Time groups a busy-and-idle dependent needs monitors for.
    fn dependent_time_groups(
        &self,
        m: MonitorId,
        instance: &crate::models::Instance,
    ) -> Vec<TimeGroupId> {
        let c = match &self.mon(m).kind {
            MonitorKind::AvoidUnavailableTimes(x) => return vec![x.times],
            MonitorKind::LimitIdleTimes(x) => x.constraint,
            MonitorKind::LimitBusyTimes(x) => x.constraint,
            other => unsupported("dependent time groups", other.tag()),
        };
        match &instance.constraint(c).kind {
            ConstraintKind::LimitIdleTimes { time_groups, .. }
            | ConstraintKind::LimitBusyTimes { time_groups, .. } => time_groups.clone(),
            _ => panic!("monitor {m} does not match its constraint"),
        }
    }

    /// The time-group monitor of `tt` watching the same times as `tg`.
    pub(crate) fn timetable_find_time_group_monitor(
        &self,
        tt: MonitorId,
        tg: TimeGroupId,
    ) -> Option<MonitorId> {
        let wanted = self.instance.time_group(tg);
        self.timetable(tt)
            .time_group_monitors
            .iter()
            .copied()
            .find(|&tgm| {
                let have = self.time_group_monitor(tgm).time_group;
                have == tg || self.instance.time_group(have).same_times(wanted)
            })
    }

    fn make_time_group_monitor(&mut self, tt: MonitorId, tg: TimeGroupId) -> MonitorId {
        let kind = MonitorKind::TimeGroup(TimeGroupMonitor::new(tt, tg));
        let tgm = self.add_monitor(kind, 0);
        self.attach_monitor(tgm);
        tgm
    }

    pub(crate) fn timetable_assign_resource(&mut self, tt: MonitorId, task: TaskId) {
        if let Some(t) = self.task(task).time {
            self.timetable_assign_time(tt, task, t);
        }
    }

    pub(crate) fn timetable_unassign_resource(&mut self, tt: MonitorId, task: TaskId) {
        if let Some(t) = self.task(task).time {
            self.timetable_unassign_time(tt, task, t);
        }
    }

    /// Adds `task` to the cells `t..t + duration`.
    pub(crate) fn timetable_assign_time(&mut self, tt: MonitorId, task: TaskId, t: usize) {
        let duration = self.task(task).duration as usize;
        let mut non_clash = Vec::new();
        let mut clash_changes = Vec::new();
        {
            let timetable = self.timetable_mut(tt);
            for time in t..t + duration {
                let cell = &mut timetable.cells[time];
                let n = cell.tasks.len();
                if n == 0 {
                    non_clash.extend(cell.monitors.iter().map(|&tgm| (tgm, time)));
                } else {
                    clash_changes.push((n as i32 - 1, n as i32));
                    if n == 1 {
                        timetable.clashing_times.push(time);
                    }
                }
                cell.tasks.push(task);
            }
        }
        self.timetable_propagate(tt, &non_clash, &clash_changes, true);
    }

    /// Removes `task` from the cells `t..t + duration`.
    pub(crate) fn timetable_unassign_time(&mut self, tt: MonitorId, task: TaskId, t: usize) {
        let duration = self.task(task).duration as usize;
        let mut non_clash = Vec::new();
        let mut clash_changes = Vec::new();
        {
            let timetable = self.timetable_mut(tt);
            for time in t..t + duration {
                let cell = &mut timetable.cells[time];
                match cell.tasks.iter().rposition(|&x| x == task) {
                    Some(pos) => {
                        cell.tasks.swap_remove(pos);
                    }
                    None => panic!("timetable unassign: {task} not at time {time}"),
                }
                let n = cell.tasks.len();
                if n == 0 {
                    non_clash.extend(cell.monitors.iter().map(|&tgm| (tgm, time)));
                } else {
                    clash_changes.push((n as i32, n as i32 - 1));
                    if n == 1 {
                        timetable.remove_clashing_time(time);
                    }
                }
            }
        }
        self.timetable_propagate(tt, &non_clash, &clash_changes, false);
    }

    /// Sends staged busy and clash changes on, then flushes every receiver.
    fn timetable_propagate(
        &mut self,
        tt: MonitorId,
        non_clash: &[(MonitorId, usize)],
        clash_changes: &[(i32, i32)],
        assign: bool,
    ) {
        for &(tgm, time) in non_clash {
            if assign {
                self.time_group_assign_non_clash(tgm, time);
            } else {
                self.time_group_unassign_non_clash(tgm, time);
            }
        }
        if !clash_changes.is_empty() {
            for i in 0..self.timetable(tt).avoid_clashes_monitors.len() {
                let acm = self.timetable(tt).avoid_clashes_monitors[i];
                self.avoid_clashes_apply(acm, clash_changes);
            }
        }
        let mut touched: Vec<MonitorId> = non_clash.iter().map(|&(tgm, _)| tgm).collect();
        touched.sort_unstable();
        touched.dedup();
        for tgm in touched {
            self.time_group_flush(tgm);
        }
    }

    /// `task2` takes over the second half of `task1`'s cells.
    pub(crate) fn timetable_split_task(&mut self, tt: MonitorId, task1: TaskId, task2: TaskId) {
        let (time, duration) = {
            let t2 = self.task(task2);
            (t2.time, t2.duration as usize)
        };
        if let Some(t) = time {
            self.timetable_replace(tt, t..t + duration, task1, task2);
        }
    }

    /// `task1` takes `task2`'s cells back.
    pub(crate) fn timetable_merge_task(&mut self, tt: MonitorId, task1: TaskId, task2: TaskId) {
        let (time, duration) = {
            let t2 = self.task(task2);
            (t2.time, t2.duration as usize)
        };
        if let Some(t) = time {
            self.timetable_replace(tt, t..t + duration, task2, task1);
        }
    }

    fn timetable_replace(
        &mut self,
        tt: MonitorId,
        times: std::ops::Range<usize>,
        old: TaskId,
        new: TaskId,
    ) {
        let timetable = self.timetable_mut(tt);
        for time in times {
            match timetable.cells[time].tasks.iter_mut().rev().find(|x| **x == old) {
                Some(slot) => *slot = new,
                None => panic!("timetable replace: {old} not at time {time}"),
            }
        }
    }
}

impl Monitor {
    /// Timetable state, if this is a timetable monitor.
    pub fn as_timetable(&self) -> Option<&TimetableMonitor> {
        match &self.kind {
            MonitorKind::Timetable(t) => Some(t),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::models::ResourceId;
    use crate::monitor::MonitorTag;
    use crate::task::NewTask;
    use crate::test_support::clash_soln;

    #[test]
    fn test_clashes_counted() {
        let mut soln = clash_soln();
        let r = ResourceId(0);
        let a = soln.make_task(NewTask::new(2));
        let b = soln.make_task(NewTask::new(2));
        soln.task_assign_time(a, 0).unwrap();
        soln.task_assign_time(b, 1).unwrap();
        soln.task_assign_resource(a, r).unwrap();
        soln.task_assign_resource(b, r).unwrap();

        let tt = soln.resource_timetable(r);
        let timetable = soln.monitor(tt).as_timetable().unwrap();
        assert_eq!(timetable.time_task_count(1), 2);
        assert_eq!(timetable.clashing_time_count(), 1);
        assert!(timetable.time_available(3));
        assert_eq!(soln.resource_monitor_cost(r, MonitorTag::AvoidClashes), 1);

        soln.task_unassign_time(b).unwrap();
        assert_eq!(soln.resource_monitor_cost(r, MonitorTag::AvoidClashes), 0);
        let timetable = soln.monitor(tt).as_timetable().unwrap();
        assert_eq!(timetable.clashing_time_count(), 0);
    }

    #[test]
    fn test_split_keeps_cells_consistent() {
        let mut soln = clash_soln();
        let r = ResourceId(0);
        let a = soln.make_task(NewTask::new(4));
        soln.task_assign_time(a, 2).unwrap();
        soln.task_assign_resource(a, r).unwrap();
        let b = soln.task_split(a, 1).unwrap();

        let tt = soln.resource_timetable(r);
        let timetable = soln.monitor(tt).as_timetable().unwrap();
        assert_eq!(timetable.time_tasks(2), &[a]);
        assert_eq!(timetable.time_tasks(3), &[b]);
        assert_eq!(timetable.time_tasks(5), &[b]);

        soln.task_merge(a, b).unwrap();
        let timetable = soln.monitor(tt).as_timetable().unwrap();
        assert_eq!(timetable.time_tasks(5), &[a]);
        assert_eq!(soln.cost(), 0);
    }
}
