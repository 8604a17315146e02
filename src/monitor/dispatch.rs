//! Event dispatch for every monitor variant.
//!
//! Hubs, timetables and time-group monitors call the `monitor_*` functions
//! here; each matches the variant exhaustively, updates its state, and for
//! constraint families recomputes the cost through
//! [`change_cost`](Soln::change_cost), the one place costs are written.

use tracing::debug;

use super::{unsupported, MonitorId, MonitorKind, MonitorTag};
use crate::models::{ConstraintId, ConstraintKind, Cost, ResourceId, TimeGroupId};
use crate::task::TaskId;
use crate::visit::VisitContext;
use crate::Soln;

impl Soln {
    /// Brings `m` into the cost computation.
    ///
    /// # Panics
    /// If `m` is a group monitor, is already attached, or has a cost.
    pub fn attach_monitor(&mut self, m: MonitorId) {
        let tag = self.mon(m).tag();
        assert!(
            tag != MonitorTag::Group,
            "attach_monitor: group monitor {m} is always attached"
        );
        assert!(!self.mon(m).attached, "attach_monitor: {m} already attached");
        assert_eq!(
            self.mon(m).cost,
            0,
            "attach_monitor: detached {} {m} has a cost",
            tag.show()
        );
        let monitor = self.mon_mut(m);
        monitor.attached = true;
        match &mut monitor.kind {
            MonitorKind::AvoidSplitAssignments(x) => x.zero_cost.detached_by_hub = false,
            MonitorKind::PreferResources(x) => x.zero_cost.detached_by_hub = false,
            _ => {}
        }

        match &self.mon(m).kind {
            MonitorKind::AssignResource(x) => {
                let er = x.event_resource;
                self.ers_attach_monitor(er, m);
            }
            MonitorKind::PreferResources(x) => {
                let er = x.event_resource;
                self.ers_attach_monitor(er, m);
            }
            MonitorKind::AvoidSplitAssignments(x) => {
                for er in x.event_resources.clone() {
                    self.ers_attach_monitor(er, m);
                }
            }
            MonitorKind::AvoidClashes(_)
            | MonitorKind::AvoidUnavailableTimes(_)
            | MonitorKind::LimitIdleTimes(_)
            | MonitorKind::LimitBusyTimes(_)
            | MonitorKind::LimitWorkload(_)
            | MonitorKind::Timetable(_) => {
                let r = self.monitor_resource(m);
                self.rs_attach_monitor(r, m);
            }
            MonitorKind::TimeGroup(x) => {
                let tt = x.timetable;
                self.timetable_attach_monitor(tt, m);
            }
            MonitorKind::Group(_) => unsupported("attach_monitor", tag),
        }
        debug!(monitor = %m, tag = tag.show(), cost = self.mon(m).cost, "monitor attached");
    }

    /// Takes `m` out of the cost computation; its cost drops to 0.
    ///
    /// # Panics
    /// If `m` is a group monitor or is not attached.
    pub fn detach_monitor(&mut self, m: MonitorId) {
        let tag = self.mon(m).tag();
        assert!(self.mon(m).attached, "detach_monitor: {m} not attached");
        match &self.mon(m).kind {
            MonitorKind::AssignResource(x) => {
                let er = x.event_resource;
                self.ers_detach_monitor(er, m);
            }
            MonitorKind::PreferResources(x) => {
                let er = x.event_resource;
                self.ers_detach_monitor(er, m);
            }
            MonitorKind::AvoidSplitAssignments(x) => {
                for er in x.event_resources.clone() {
                    self.ers_detach_monitor(er, m);
                }
            }
            MonitorKind::AvoidClashes(_)
            | MonitorKind::AvoidUnavailableTimes(_)
            | MonitorKind::LimitIdleTimes(_)
            | MonitorKind::LimitBusyTimes(_)
            | MonitorKind::LimitWorkload(_)
            | MonitorKind::Timetable(_) => {
                let r = self.monitor_resource(m);
                self.rs_detach_monitor(r, m);
            }
            MonitorKind::TimeGroup(x) => {
                let tt = x.timetable;
                self.timetable_detach_monitor(tt, m);
            }
            MonitorKind::Group(_) => unsupported("detach_monitor", tag),
        }
        self.mon_mut(m).attached = false;
        assert_eq!(
            self.mon(m).cost,
            0,
            "detach_monitor: {} {m} kept a cost after detaching",
            tag.show()
        );
        debug!(monitor = %m, tag = tag.show(), "monitor detached");
    }

    /// Sets the cost of `m`, reporting the transition to every parent first.
    pub(crate) fn change_cost(&mut self, m: MonitorId, new_cost: Cost) {
        assert!(new_cost >= 0, "change_cost: negative cost {new_cost} for {m}");
        let old_cost = self.mon(m).cost;
        if old_cost == new_cost {
            return;
        }
        for i in 0..self.mon(m).parent_links.len() {
            let link = self.mon(m).parent_links[i];
            let parent = self.link(link).parent;
            self.group_change_cost(parent, link, old_cost, new_cost);
        }
        self.mon_mut(m).cost = new_cost;
    }

    /// Deletes `m`, detaching it and unlinking it from every parent first.
    ///
    /// # Panics
    /// If `m` is the root, a traced group, a timetable, or a time-group
    /// monitor other monitors still depend on.
    pub fn delete_monitor(&mut self, m: MonitorId) {
        let tag = self.mon(m).tag();
        match tag {
            MonitorTag::Group => return self.delete_group_monitor(m),
            MonitorTag::Timetable => panic!("delete_monitor: timetable {m} belongs to its resource"),
            _ => {}
        }
        if self.mon(m).attached {
            self.detach_monitor(m);
        }
        self.delete_parent_links(m);
        match &self.mon(m).kind {
            MonitorKind::AssignResource(x) => {
                let er = x.event_resource;
                self.ers_remove_monitor(er, m);
            }
            MonitorKind::PreferResources(x) => {
                let er = x.event_resource;
                self.ers_remove_monitor(er, m);
            }
            MonitorKind::AvoidSplitAssignments(x) => {
                for er in x.event_resources.clone() {
                    self.ers_remove_monitor(er, m);
                }
            }
            MonitorKind::AvoidClashes(_)
            | MonitorKind::AvoidUnavailableTimes(_)
            | MonitorKind::LimitIdleTimes(_)
            | MonitorKind::LimitBusyTimes(_)
            | MonitorKind::LimitWorkload(_) => {
                let r = self.monitor_resource(m);
                self.rs_remove_monitor(r, m);
            }
            MonitorKind::TimeGroup(_) | MonitorKind::Timetable(_) | MonitorKind::Group(_) => {}
        }
        self.forget_monitor(m);
        debug!(monitor = %m, tag = tag.show(), "monitor deleted");
    }

    /// The resource a resource-based monitor watches.
    pub(crate) fn monitor_resource(&self, m: MonitorId) -> ResourceId {
        match &self.mon(m).kind {
            MonitorKind::AvoidClashes(x) => x.resource,
            MonitorKind::AvoidUnavailableTimes(x) => x.resource,
            MonitorKind::LimitIdleTimes(x) => x.resource,
            MonitorKind::LimitBusyTimes(x) => x.resource,
            MonitorKind::LimitWorkload(x) => x.resource,
            MonitorKind::Timetable(x) => x.resource,
            other => unsupported("monitor_resource", other.tag()),
        }
    }

    /// The constraint a constraint monitor measures.
    pub fn monitor_constraint(&self, m: MonitorId) -> Option<ConstraintId> {
        match &self.mon(m).kind {
            MonitorKind::AssignResource(x) => Some(x.constraint),
            MonitorKind::PreferResources(x) => Some(x.constraint),
            MonitorKind::AvoidSplitAssignments(x) => Some(x.constraint),
            MonitorKind::AvoidClashes(x) => Some(x.constraint),
            MonitorKind::AvoidUnavailableTimes(x) => Some(x.constraint),
            MonitorKind::LimitIdleTimes(x) => Some(x.constraint),
            MonitorKind::LimitBusyTimes(x) => Some(x.constraint),
            MonitorKind::LimitWorkload(x) => Some(x.constraint),
            MonitorKind::Timetable(_) | MonitorKind::TimeGroup(_) | MonitorKind::Group(_) => None,
        }
    }

    /// Current deviation of a constraint monitor.
    ///
    /// # Panics
    /// If `m` does not measure a constraint.
    pub fn monitor_deviation(&self, m: MonitorId) -> i32 {
        match &self.mon(m).kind {
            MonitorKind::AssignResource(x) => x.deviation(),
            MonitorKind::PreferResources(x) => x.deviation(),
            MonitorKind::AvoidSplitAssignments(x) => x.deviation(),
            MonitorKind::AvoidClashes(x) => x.deviation(),
            MonitorKind::AvoidUnavailableTimes(x) => x.deviation(),
            MonitorKind::LimitIdleTimes(x) => x.deviation(),
            MonitorKind::LimitBusyTimes(x) => x.deviation(),
            MonitorKind::LimitWorkload(x) => x.deviation(),
            other => unsupported("monitor_deviation", other.tag()),
        }
    }

    /// Recomputes the cost of a constraint monitor from its deviation.
    pub(crate) fn monitor_refresh_cost(&mut self, m: MonitorId) {
        let c = match self.monitor_constraint(m) {
            Some(c) => c,
            None => unsupported("monitor cost", self.mon(m).tag()),
        };
        let cost = self.instance.constraint(c).cost(self.monitor_deviation(m));
        self.change_cost(m, cost);
    }

    /// Sets the busy count above which limit-busy-times ignores a time group.
    pub fn set_limit_busy_times_ceiling(&mut self, m: MonitorId, ceiling: i32) {
        assert!(ceiling >= 0, "set_limit_busy_times_ceiling: negative ceiling");
        let current = match &self.mon(m).kind {
            MonitorKind::LimitBusyTimes(x) => x.ceiling,
            other => unsupported("set_limit_busy_times_ceiling", other.tag()),
        };
        if current == ceiling {
            return;
        }
        let attached = self.mon(m).attached;
        if attached {
            self.detach_monitor(m);
        }
        if let MonitorKind::LimitBusyTimes(x) = &mut self.mon_mut(m).kind {
            x.ceiling = ceiling;
        }
        if attached {
            self.attach_monitor(m);
        }
    }

    /// Sets the workload above which limit-workload reports nothing.
    pub fn set_limit_workload_ceiling(&mut self, m: MonitorId, ceiling: i32) {
        assert!(ceiling >= 0, "set_limit_workload_ceiling: negative ceiling");
        let current = match &self.mon(m).kind {
            MonitorKind::LimitWorkload(x) => x.ceiling,
            other => unsupported("set_limit_workload_ceiling", other.tag()),
        };
        if current == ceiling {
            return;
        }
        let attached = self.mon(m).attached;
        if attached {
            self.detach_monitor(m);
        }
        if let MonitorKind::LimitWorkload(x) = &mut self.mon_mut(m).kind {
            x.ceiling = ceiling;
        }
        if attached {
            self.attach_monitor(m);
        }
    }

    pub fn set_monitor_back(&mut self, m: MonitorId, back: Option<usize>) {
        self.mon_mut(m).back = back;
    }

    pub fn monitor_visit(&mut self, m: MonitorId, ctx: &VisitContext) {
        self.mon_mut(m).visit_num = ctx.visited_stamp();
    }

    pub fn monitor_unvisit(&mut self, m: MonitorId, ctx: &VisitContext) {
        self.mon_mut(m).visit_num = ctx.unvisited_stamp();
    }

    pub fn monitor_visited(&self, m: MonitorId, ctx: &VisitContext, slack: u64) -> bool {
        ctx.is_visited(self.mon(m).visit_num, slack)
    }

    pub(crate) fn monitor_add_task(&mut self, m: MonitorId, task: TaskId) {
        let (duration, r) = {
            let t = self.task(task);
            (t.duration, t.assigned_rs)
        };
        match &mut self.mon_mut(m).kind {
            MonitorKind::AssignResource(x) => x.add_task(duration, r.is_some()),
            MonitorKind::PreferResources(x) => x.add_task(duration, r),
            MonitorKind::AvoidSplitAssignments(x) => {
                if let Some(r) = r {
                    x.assign_resource(r);
                }
            }
            other => unsupported("add_task", other.tag()),
        }
        self.monitor_refresh_cost(m);
    }

    pub(crate) fn monitor_delete_task(&mut self, m: MonitorId, task: TaskId) {
        let (duration, r) = {
            let t = self.task(task);
            (t.duration, t.assigned_rs)
        };
        match &mut self.mon_mut(m).kind {
            MonitorKind::AssignResource(x) => x.delete_task(duration, r.is_some()),
            MonitorKind::PreferResources(x) => x.delete_task(duration, r),
            MonitorKind::AvoidSplitAssignments(x) => {
                if let Some(r) = r {
                    x.unassign_resource(r);
                }
            }
            other => unsupported("delete_task", other.tag()),
        }
        self.monitor_refresh_cost(m);
    }

    /// `task2` was split off `task1`; durations already reflect the split.
    pub(crate) fn monitor_split_task(&mut self, m: MonitorId, task1: TaskId, task2: TaskId) {
        let r = self.task(task2).assigned_rs;
        match &mut self.mon_mut(m).kind {
            MonitorKind::AssignResource(_)
            | MonitorKind::PreferResources(_)
            | MonitorKind::LimitWorkload(_) => {}
            MonitorKind::AvoidSplitAssignments(x) => {
                if let Some(r) = r {
                    x.assign_resource(r);
                }
                self.monitor_refresh_cost(m);
            }
            MonitorKind::Timetable(_) => self.timetable_split_task(m, task1, task2),
            other => unsupported("split_task", other.tag()),
        }
    }

    /// `task2` is about to be merged back into `task1`.
    pub(crate) fn monitor_merge_task(&mut self, m: MonitorId, task1: TaskId, task2: TaskId) {
        let r = self.task(task2).assigned_rs;
        match &mut self.mon_mut(m).kind {
            MonitorKind::AssignResource(_)
            | MonitorKind::PreferResources(_)
            | MonitorKind::LimitWorkload(_) => {}
            MonitorKind::AvoidSplitAssignments(x) => {
                if let Some(r) = r {
                    x.unassign_resource(r);
                }
                self.monitor_refresh_cost(m);
            }
            MonitorKind::Timetable(_) => self.timetable_merge_task(m, task1, task2),
            other => unsupported("merge_task", other.tag()),
        }
    }

    pub(crate) fn monitor_assign_resource(&mut self, m: MonitorId, task: TaskId, r: ResourceId) {
        let (duration, workload) = {
            let t = self.task(task);
            (t.duration, t.workload())
        };
        match &mut self.mon_mut(m).kind {
            MonitorKind::AssignResource(x) => x.assign_resource(duration),
            MonitorKind::PreferResources(x) => x.assign_resource(duration, r),
            MonitorKind::AvoidSplitAssignments(x) => x.assign_resource(r),
            MonitorKind::LimitWorkload(x) => x.assign_resource(workload),
            MonitorKind::Timetable(_) => return self.timetable_assign_resource(m, task),
            other => unsupported("assign_resource", other.tag()),
        }
        self.monitor_refresh_cost(m);
    }

    pub(crate) fn monitor_unassign_resource(
        &mut self,
        m: MonitorId,
        task: TaskId,
        r: ResourceId,
    ) {
        let (duration, workload) = {
            let t = self.task(task);
            (t.duration, t.workload())
        };
        match &mut self.mon_mut(m).kind {
            MonitorKind::AssignResource(x) => x.unassign_resource(duration),
            MonitorKind::PreferResources(x) => x.unassign_resource(duration, r),
            MonitorKind::AvoidSplitAssignments(x) => x.unassign_resource(r),
            MonitorKind::LimitWorkload(x) => x.unassign_resource(workload),
            MonitorKind::Timetable(_) => return self.timetable_unassign_resource(m, task),
            other => unsupported("unassign_resource", other.tag()),
        }
        self.monitor_refresh_cost(m);
    }

    pub(crate) fn monitor_assign_time(&mut self, m: MonitorId, task: TaskId, t: usize) {
        match &self.mon(m).kind {
            MonitorKind::Timetable(_) => self.timetable_assign_time(m, task, t),
            MonitorKind::LimitWorkload(_) => {}
            other => unsupported("assign_time", other.tag()),
        }
    }

    pub(crate) fn monitor_unassign_time(&mut self, m: MonitorId, task: TaskId, t: usize) {
        match &self.mon(m).kind {
            MonitorKind::Timetable(_) => self.timetable_unassign_time(m, task, t),
            MonitorKind::LimitWorkload(_) => {}
            other => unsupported("unassign_time", other.tag()),
        }
    }

    /// The time group of `m`'s own constraint that `tgm` reports on. Time
    /// groups with the same times share one time-group monitor, so this may
    /// differ from the group the monitor was made for.
    fn dependent_time_group(&self, m: MonitorId, tgm: MonitorId) -> TimeGroupId {
        let watched = self.time_group_monitor(tgm).time_group;
        let c = match &self.mon(m).kind {
            MonitorKind::LimitBusyTimes(x) => x.constraint,
            _ => return watched,
        };
        let time_groups = match &self.instance.constraint(c).kind {
            ConstraintKind::LimitBusyTimes { time_groups, .. } => time_groups,
            _ => return watched,
        };
        if time_groups.contains(&watched) {
            return watched;
        }
        let times = self.instance.time_group(watched);
        time_groups
            .iter()
            .copied()
            .find(|&tg| self.instance.time_group(tg).same_times(times))
            .unwrap_or(watched)
    }

    pub(crate) fn monitor_add_busy_and_idle(
        &mut self,
        m: MonitorId,
        tgm: MonitorId,
        busy: i32,
        idle: i32,
    ) {
        let tg = self.dependent_time_group(m, tgm);
        match &mut self.mon_mut(m).kind {
            MonitorKind::AvoidUnavailableTimes(x) => x.add_busy_and_idle(busy),
            MonitorKind::LimitIdleTimes(x) => {
                x.add_busy_and_idle(idle);
                x.flush();
            }
            MonitorKind::LimitBusyTimes(x) => {
                x.add_busy_and_idle(tg, busy);
                x.flush();
            }
            other => unsupported("add_busy_and_idle", other.tag()),
        }
        self.monitor_refresh_cost(m);
    }

    pub(crate) fn monitor_delete_busy_and_idle(
        &mut self,
        m: MonitorId,
        tgm: MonitorId,
        busy: i32,
        idle: i32,
    ) {
        let tg = self.dependent_time_group(m, tgm);
        match &mut self.mon_mut(m).kind {
            MonitorKind::AvoidUnavailableTimes(x) => x.delete_busy_and_idle(busy),
            MonitorKind::LimitIdleTimes(x) => {
                x.delete_busy_and_idle(idle);
                x.flush();
            }
            MonitorKind::LimitBusyTimes(x) => {
                x.delete_busy_and_idle(tg, busy);
                x.flush();
            }
            other => unsupported("delete_busy_and_idle", other.tag()),
        }
        self.monitor_refresh_cost(m);
    }

    pub(crate) fn monitor_change_busy_and_idle(
        &mut self,
        m: MonitorId,
        tgm: MonitorId,
        old_busy: i32,
        new_busy: i32,
        old_idle: i32,
        new_idle: i32,
    ) {
        let tg = self.dependent_time_group(m, tgm);
        match &mut self.mon_mut(m).kind {
            MonitorKind::AvoidUnavailableTimes(x) => x.change_busy_and_idle(old_busy, new_busy),
            MonitorKind::LimitIdleTimes(x) => {
                x.change_busy_and_idle(old_idle, new_idle);
                x.flush();
            }
            MonitorKind::LimitBusyTimes(x) => {
                x.change_busy_and_idle(tg, old_busy, new_busy);
                x.flush();
            }
            other => unsupported("change_busy_and_idle", other.tag()),
        }
        self.monitor_refresh_cost(m);
    }

    /// Stages per-time clash count changes on an avoid-clashes monitor,
    /// then flushes them as one cost change.
    pub(crate) fn avoid_clashes_apply(&mut self, m: MonitorId, changes: &[(i32, i32)]) {
        match &mut self.mon_mut(m).kind {
            MonitorKind::AvoidClashes(x) => {
                for &(old, new) in changes {
                    x.change_clash_count(old, new);
                }
                x.flush();
            }
            other => unsupported("change_clash_count", other.tag()),
        }
        self.monitor_refresh_cost(m);
    }

    /// Whether `m` provably cannot produce cost, consulting its cache.
    pub(crate) fn monitor_must_have_zero_cost(&mut self, m: MonitorId) -> bool {
        let cached = match &self.mon(m).kind {
            MonitorKind::AvoidSplitAssignments(x) => x.zero_cost.get(),
            MonitorKind::PreferResources(x) => x.zero_cost.get(),
            other => unsupported("must_have_zero_cost", other.tag()),
        };
        if let Some(value) = cached {
            return value;
        }
        let value = match &self.mon(m).kind {
            MonitorKind::AvoidSplitAssignments(x) => {
                let mut leaders = x
                    .event_resources
                    .iter()
                    .flat_map(|&er| self.event_resource_in_soln(er).tasks())
                    .map(|&task| self.task_first_unfixed(task));
                match leaders.next() {
                    None => true,
                    Some(first) => first.is_some() && leaders.all(|l| l == first),
                }
            }
            MonitorKind::PreferResources(x) => self
                .event_resource_in_soln(x.event_resource)
                .tasks()
                .iter()
                .map(|&task| self.task(task))
                .all(|t| t.domain_fixed && t.domain.is_subset(&x.domain)),
            other => unsupported("must_have_zero_cost", other.tag()),
        };
        match &mut self.mon_mut(m).kind {
            MonitorKind::AvoidSplitAssignments(x) => x.zero_cost.set(value),
            MonitorKind::PreferResources(x) => x.zero_cost.set(value),
            _ => {}
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use crate::models::ResourceId;
    use crate::monitor::MonitorTag;
    use crate::test_support::{assign_resource_soln, busy_soln, SampleSoln};

    #[test]
    fn test_detach_zeroes_cost_and_attach_restores() {
        let SampleSoln {
            mut soln, monitors, ..
        } = assign_resource_soln(&[Some(3), Some(5)]);
        assert_eq!(soln.cost(), 8);

        soln.detach_monitor(monitors[1]);
        assert_eq!(soln.monitor(monitors[1]).cost(), 0);
        assert_eq!(soln.cost(), 3);

        soln.attach_monitor(monitors[1]);
        assert_eq!(soln.monitor(monitors[1]).cost(), 5);
        assert_eq!(soln.cost(), 8);
    }

    #[test]
    fn test_deviation_matches_cost() {
        let SampleSoln {
            soln, monitors, ..
        } = assign_resource_soln(&[Some(2), None]);
        assert_eq!(soln.monitor_deviation(monitors[0]), 2);
        assert_eq!(soln.monitor_deviation(monitors[1]), 0);
        assert!(soln.monitor_constraint(monitors[0]).is_some());
        assert!(soln.monitor_constraint(soln.root()).is_none());
    }

    #[test]
    #[should_panic(expected = "already attached")]
    fn test_double_attach_panics() {
        let SampleSoln {
            mut soln, monitors, ..
        } = assign_resource_soln(&[Some(1)]);
        soln.attach_monitor(monitors[0]);
    }

    #[test]
    fn test_busy_times_window() {
        // minimum 2, maximum 4 busy times in a day of eight
        let mut soln = busy_soln(2, 4, 8);
        let r = ResourceId(0);
        let lbt = soln.resource_monitors(r, MonitorTag::LimitBusyTimes)[0];
        assert_eq!(soln.monitor_deviation(lbt), 0);

        let a = soln.make_task(crate::task::NewTask::new(1));
        soln.task_assign_time(a, 0).unwrap();
        soln.task_assign_resource(a, r).unwrap();
        assert_eq!(soln.monitor_deviation(lbt), 1);

        let b = soln.make_task(crate::task::NewTask::new(5));
        soln.task_assign_time(b, 1).unwrap();
        soln.task_assign_resource(b, r).unwrap();
        assert_eq!(soln.monitor_deviation(lbt), 2);
        assert_eq!(soln.cost(), 2);

        soln.set_limit_busy_times_ceiling(lbt, 5);
        assert_eq!(soln.monitor_deviation(lbt), 0);
        soln.ensure_official_cost();
        assert_eq!(soln.monitor_deviation(lbt), 2);
    }

    #[test]
    fn test_delete_monitor_removes_cost() {
        let SampleSoln {
            mut soln, monitors, ..
        } = assign_resource_soln(&[Some(4), Some(1)]);
        let count = soln.monitor_count();
        soln.delete_monitor(monitors[0]);
        assert_eq!(soln.cost(), 1);
        assert_eq!(soln.monitor_count(), count - 1);
    }

    #[test]
    fn test_shared_time_group_reports_own_group() {
        use crate::models::{
            Constraint, ConstraintKind, Instance, Resource, TimeGroup, TimeGroupId,
        };
        let busy = |id: &str, tg: usize| {
            Constraint::new(
                id,
                ConstraintKind::LimitBusyTimes {
                    resources: vec![ResourceId(0)],
                    time_groups: vec![TimeGroupId(tg)],
                    minimum: 2,
                    maximum: 3,
                },
            )
        };
        let instance = Instance::new("shared", 6)
            .with_resource(Resource::new("A"))
            .with_time_group(TimeGroup::new("Morning", 0..3))
            .with_time_group(TimeGroup::new("Early", 0..3))
            .with_constraint(busy("morning", 0))
            .with_constraint(busy("early", 1));
        let mut soln = crate::Soln::new(instance).unwrap();
        let monitors = soln.make_all_constraint_monitors();
        let tt = soln.resource_timetable(ResourceId(0));
        assert_eq!(soln.timetable(tt).time_group_monitors().len(), 1);

        let a = soln.make_task(crate::task::NewTask::new(1));
        soln.task_assign_time(a, 0).unwrap();
        soln.task_assign_resource(a, ResourceId(0)).unwrap();
        assert_eq!(
            soln.monitor_deviation_description(monitors[0]),
            "1 too few in Morning"
        );
        assert_eq!(
            soln.monitor_deviation_description(monitors[1]),
            "1 too few in Early"
        );

        soln.task_unassign(a).unwrap();
        assert_eq!(soln.cost(), 0);
    }
}
