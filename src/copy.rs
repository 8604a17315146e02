//! Deep copies of solutions.
//!
//! Copying runs in two phases around a [`CopyMemo`]. Phase one builds the
//! copy and fills the memo with the id each original entity received, so a
//! caller can translate handles it kept (monitors of interest, say) into the
//! copy. Phase two discards the memo.
//!
//! Monitors are numbered by a depth-first walk from the root, with the memo
//! making sure a monitor shared by several groups is copied once, then the
//! monitors no group reaches in table order. Tasks and links keep their
//! relative order. Traces are not copied.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::hub::{EventResourceInSoln, ResourceInSoln};
use crate::monitor::{LinkId, Monitor, MonitorId, MonitorKind, MonitorLink};
use crate::task::{Task, TaskId};
use crate::Soln;

/// Original-to-copy id maps filled by [`Soln::copy_phase1`].
#[derive(Debug, Default)]
pub struct CopyMemo {
    monitors: HashMap<MonitorId, MonitorId>,
    links: HashMap<LinkId, LinkId>,
    tasks: HashMap<TaskId, TaskId>,
}

impl CopyMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// The copy of original monitor `m`, if it was copied.
    pub fn monitor_copy(&self, m: MonitorId) -> Option<MonitorId> {
        self.monitors.get(&m).copied()
    }

    /// The copy of original task `t`, if it was copied.
    pub fn task_copy(&self, t: TaskId) -> Option<TaskId> {
        self.tasks.get(&t).copied()
    }

    fn monitor(&self, m: MonitorId) -> MonitorId {
        match self.monitors.get(&m) {
            Some(&copy) => copy,
            None => panic!("copy: monitor {m} was not copied"),
        }
    }

    fn link(&self, l: LinkId) -> LinkId {
        match self.links.get(&l) {
            Some(&copy) => copy,
            None => panic!("copy: link {} was not copied", l.0),
        }
    }

    fn task(&self, t: TaskId) -> TaskId {
        match self.tasks.get(&t) {
            Some(&copy) => copy,
            None => panic!("copy: {t} was not copied"),
        }
    }

    fn monitors(&self, ms: &mut [MonitorId]) {
        for m in ms {
            *m = self.monitor(*m);
        }
    }

    fn tasks(&self, ts: &mut [TaskId]) {
        for t in ts {
            *t = self.task(*t);
        }
    }
}

/// Rewrites the solution-local ids inside a cloned entity.
trait Remap {
    fn remap(&mut self, memo: &CopyMemo);
}

impl Remap for Monitor {
    fn remap(&mut self, memo: &CopyMemo) {
        for l in &mut self.parent_links {
            *l = memo.link(*l);
        }
        match &mut self.kind {
            MonitorKind::Group(g) => {
                for l in g.child_links.iter_mut().chain(g.defect_links.iter_mut()) {
                    *l = memo.link(*l);
                }
                g.traces.clear();
            }
            MonitorKind::Timetable(x) => {
                for cell in &mut x.cells {
                    memo.tasks(&mut cell.tasks);
                    memo.monitors(&mut cell.monitors);
                }
                memo.monitors(&mut x.avoid_clashes_monitors);
                memo.monitors(&mut x.time_group_monitors);
            }
            MonitorKind::TimeGroup(x) => {
                x.timetable = memo.monitor(x.timetable);
                memo.monitors(&mut x.monitors);
            }
            MonitorKind::LimitIdleTimes(x) => memo.monitors(&mut x.time_group_monitors),
            MonitorKind::AssignResource(_)
            | MonitorKind::PreferResources(_)
            | MonitorKind::AvoidSplitAssignments(_)
            | MonitorKind::AvoidClashes(_)
            | MonitorKind::AvoidUnavailableTimes(_)
            | MonitorKind::LimitBusyTimes(_)
            | MonitorKind::LimitWorkload(_) => {}
        }
    }
}

impl Remap for MonitorLink {
    fn remap(&mut self, memo: &CopyMemo) {
        self.parent = memo.monitor(self.parent);
        self.child = memo.monitor(self.child);
    }
}

impl Remap for Task {
    fn remap(&mut self, memo: &CopyMemo) {
        self.target = self.target.map(|t| memo.task(t));
        memo.tasks(&mut self.assigned_tasks);
    }
}

impl Remap for ResourceInSoln {
    fn remap(&mut self, memo: &CopyMemo) {
        memo.tasks(&mut self.tasks);
        self.timetable = memo.monitor(self.timetable);
        memo.monitors(&mut self.all_monitors);
        memo.monitors(&mut self.attached_monitors);
    }
}

impl Remap for EventResourceInSoln {
    fn remap(&mut self, memo: &CopyMemo) {
        memo.tasks(&mut self.tasks);
        memo.monitors(&mut self.all_monitors);
        memo.monitors(&mut self.attached_monitors);
    }
}

fn remapped<T: Clone + Remap>(original: &T, memo: &CopyMemo) -> T {
    let mut copy = original.clone();
    copy.remap(memo);
    copy
}

impl Soln {
    /// Builds a deep copy of this solution, recording in `memo` the id each
    /// monitor, link and task received.
    pub fn copy_phase1(&self, memo: &mut CopyMemo) -> Soln {
        for (i, _) in self.tasks.iter().enumerate().filter(|(_, t)| t.is_some()) {
            let copy = TaskId(memo.tasks.len());
            memo.tasks.insert(TaskId(i), copy);
        }
        for (i, _) in self.links.iter().enumerate().filter(|(_, l)| l.is_some()) {
            let copy = LinkId(memo.links.len());
            memo.links.insert(LinkId(i), copy);
        }
        let mut order = Vec::with_capacity(self.monitor_order.len());
        self.copy_number_monitors(self.root, memo, &mut order);
        for &m in &self.monitor_order {
            if !memo.monitors.contains_key(&m) {
                memo.monitors.insert(m, MonitorId(order.len()));
                order.push(m);
            }
        }

        let monitors: Vec<Option<Monitor>> = order
            .iter()
            .enumerate()
            .map(|(i, &m)| {
                let mut monitor = remapped(self.mon(m), memo);
                monitor.soln_index = i;
                Some(monitor)
            })
            .collect();
        let links = self
            .links
            .iter()
            .flatten()
            .map(|l| Some(remapped(l, memo)))
            .collect();
        let tasks = self
            .tasks
            .iter()
            .flatten()
            .map(|t| Some(remapped(t, memo)))
            .collect();

        let copy = Soln {
            instance: Arc::clone(&self.instance),
            monitor_order: (0..monitors.len()).map(MonitorId).collect(),
            monitors,
            free_monitors: Vec::new(),
            links,
            free_links: Vec::new(),
            tasks,
            free_tasks: Vec::new(),
            resources_in_soln: self
                .resources_in_soln
                .iter()
                .map(|rs| remapped(rs, memo))
                .collect(),
            event_resources_in_soln: self
                .event_resources_in_soln
                .iter()
                .map(|ers| remapped(ers, memo))
                .collect(),
            traces: Vec::new(),
            root: memo.monitor(self.root),
        };
        debug!(
            monitors = copy.monitor_count(),
            tasks = memo.tasks.len(),
            cost = copy.cost(),
            "solution copied"
        );
        copy
    }

    /// Numbers `m` and, for a group, everything below it, depth first.
    fn copy_number_monitors(&self, m: MonitorId, memo: &mut CopyMemo, order: &mut Vec<MonitorId>) {
        if memo.monitors.contains_key(&m) {
            return;
        }
        memo.monitors.insert(m, MonitorId(order.len()));
        order.push(m);
        if let MonitorKind::Group(g) = &self.mon(m).kind {
            for &l in &g.child_links {
                self.copy_number_monitors(self.link(l).child, memo, order);
            }
        }
    }

    /// Discards the id maps of a finished copy.
    pub fn copy_phase2(&self, memo: &mut CopyMemo) {
        memo.monitors.clear();
        memo.links.clear();
        memo.tasks.clear();
    }

    /// A deep copy of this solution.
    pub fn copy(&self) -> Soln {
        let mut memo = CopyMemo::new();
        let copy = self.copy_phase1(&mut memo);
        self.copy_phase2(&mut memo);
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ResourceId;
    use crate::test_support::{mixed_soln, SampleSoln};

    #[test]
    fn test_copy_is_independent() {
        let SampleSoln {
            soln,
            tasks,
            monitors,
        } = mixed_soln();
        let mut memo = CopyMemo::new();
        let mut copy = soln.copy_phase1(&mut memo);
        assert_eq!(copy.cost(), soln.cost());
        assert_eq!(copy.monitor_count(), soln.monitor_count());
        assert_eq!(copy.monitor_at(0), copy.root());
        for &m in &monitors {
            let c = memo.monitor_copy(m).unwrap();
            assert_eq!(copy.monitor(c).tag(), soln.monitor(m).tag());
            assert_eq!(copy.monitor(c).cost(), soln.monitor(m).cost());
            assert_eq!(copy.monitor(c).attached(), soln.monitor(m).attached());
        }

        let before = soln.cost();
        let t = memo.task_copy(tasks[0]).unwrap();
        copy.task_assign_resource(t, ResourceId(0)).unwrap();
        assert_eq!(soln.cost(), before);
        assert_eq!(soln.task_asst_resource(tasks[0]), None);
        assert_eq!(copy.task_asst_resource(t), Some(ResourceId(0)));
        assert_eq!(copy.resource_assigned_tasks(ResourceId(0)).last(), Some(&t));
    }

    #[test]
    fn test_shared_monitor_copied_once() {
        let SampleSoln {
            mut soln, monitors, ..
        } = mixed_soln();
        let shared = monitors[0];
        let g1 = soln.make_group_monitor(1, "First");
        let g2 = soln.make_group_monitor(2, "Second");
        soln.group_add_child(g1, shared);
        soln.group_add_child(g2, shared);
        soln.group_add_child(soln.root(), g1);
        soln.group_add_child(soln.root(), g2);

        let mut memo = CopyMemo::new();
        let copy = soln.copy_phase1(&mut memo);
        let shared_copy = memo.monitor_copy(shared).unwrap();
        let (c1, c2) = (
            memo.monitor_copy(g1).unwrap(),
            memo.monitor_copy(g2).unwrap(),
        );
        assert!(copy.group_has_child(c1, shared_copy));
        assert!(copy.group_has_child(c2, shared_copy));
        assert_eq!(copy.monitor(shared_copy).parent_count(), 3);
        assert_eq!(copy.path_count(shared_copy, copy.root()), 3);
        assert_eq!(copy.monitor_count(), soln.monitor_count());
        assert_eq!(copy.cost(), soln.cost());

        soln.copy_phase2(&mut memo);
        assert_eq!(memo.monitor_copy(shared), None);
    }
}
