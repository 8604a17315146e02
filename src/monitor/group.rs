//! Group monitors.
//!
//! A group monitor's cost is the sum of its children's costs. Children
//! with positive cost are also kept in a defect list, so a search can
//! inspect what is wrong in time proportional to the number of defects
//! rather than the number of children.

use tracing::debug;

use super::{LinkId, Monitor, MonitorId, MonitorKind, MonitorTag, TraceId};
use crate::models::Cost;
use crate::Soln;

/// Sum of child costs, with the positive-cost children listed.
#[derive(Debug, Clone)]
pub struct GroupMonitor {
    pub(crate) sub_tag: i32,
    pub(crate) sub_tag_label: String,
    pub(crate) child_links: Vec<LinkId>,
    pub(crate) defect_links: Vec<LinkId>,
    pub(crate) traces: Vec<TraceId>,
}

impl GroupMonitor {
    pub(crate) fn new(sub_tag: i32, sub_tag_label: impl Into<String>) -> Self {
        Self {
            sub_tag,
            sub_tag_label: sub_tag_label.into(),
            child_links: Vec::new(),
            defect_links: Vec::new(),
            traces: Vec::new(),
        }
    }

    /// Client-chosen classification of the group.
    pub fn sub_tag(&self) -> i32 {
        self.sub_tag
    }

    /// Label shown in debug output.
    pub fn sub_tag_label(&self) -> &str {
        &self.sub_tag_label
    }

    pub fn child_count(&self) -> usize {
        self.child_links.len()
    }

    pub fn defect_count(&self) -> usize {
        self.defect_links.len()
    }
}

impl Soln {
    pub(crate) fn group(&self, gm: MonitorId) -> &GroupMonitor {
        match &self.mon(gm).kind {
            MonitorKind::Group(g) => g,
            other => panic!("{gm} is a {}, not a group monitor", other.tag().show()),
        }
    }

    pub(crate) fn group_mut(&mut self, gm: MonitorId) -> &mut GroupMonitor {
        match &mut self.mon_mut(gm).kind {
            MonitorKind::Group(g) => g,
            other => panic!("{gm} is a {}, not a group monitor", other.tag().show()),
        }
    }

    /// Creates an empty group monitor with no parents.
    pub fn make_group_monitor(&mut self, sub_tag: i32, label: impl Into<String>) -> MonitorId {
        self.add_monitor(MonitorKind::Group(GroupMonitor::new(sub_tag, label)), 0)
    }

    /// Makes `m` a child of `gm`.
    ///
    /// # Panics
    /// If `gm` is not a group monitor, or if `m` is a group that `gm`
    /// already lies below (the DAG would gain a cycle).
    pub fn group_add_child(&mut self, gm: MonitorId, m: MonitorId) {
        if self.mon(m).tag() == MonitorTag::Group {
            assert!(
                self.path_count(gm, m) == 0,
                "group_add_child: adding {m} to {gm} would create a cycle"
            );
        }
        let link = self.make_link(gm, m);
        debug!(parent = %gm, child = %m, "group child added");

        let lb = self.mon(m).lower_bound;
        if lb != 0 {
            self.group_add_lower_bound(gm, lb);
        }
        let cost = self.mon(m).cost;
        if cost > 0 {
            self.group_change_cost(gm, link, 0, cost);
        }
    }

    /// Removes `m` from the children of `gm`.
    ///
    /// # Panics
    /// If `m` is not a child of `gm`.
    pub fn group_delete_child(&mut self, gm: MonitorId, m: MonitorId) {
        let link = match self.find_link(gm, m) {
            Some(link) => link,
            None => panic!("group_delete_child: {m} is not a child of {gm}"),
        };
        let cost = self.mon(m).cost;
        if cost > 0 {
            self.group_change_cost(gm, link, cost, 0);
        }
        let lb = self.mon(m).lower_bound;
        if lb != 0 {
            self.group_add_lower_bound(gm, -lb);
        }
        self.delete_link(link);
        debug!(parent = %gm, child = %m, "group child deleted");
    }

    /// Whether `m` is a child of `gm`.
    pub fn group_has_child(&self, gm: MonitorId, m: MonitorId) -> bool {
        self.group(gm);
        self.find_link(gm, m).is_some()
    }

    pub fn group_child_count(&self, gm: MonitorId) -> usize {
        self.group(gm).child_count()
    }

    /// The `i`th child of `gm`.
    pub fn group_child(&self, gm: MonitorId, i: usize) -> MonitorId {
        self.link(self.group(gm).child_links[i]).child
    }

    pub fn group_defect_count(&self, gm: MonitorId) -> usize {
        self.group(gm).defect_count()
    }

    /// The `i`th child of `gm` with positive cost.
    pub fn group_defect(&self, gm: MonitorId, i: usize) -> MonitorId {
        self.link(self.group(gm).defect_links[i]).child
    }

    /// Orders the defects of `gm` by decreasing cost.
    pub fn group_defect_sort(&mut self, gm: MonitorId) {
        let mut defects = self.group(gm).defect_links.clone();
        defects.sort_by_key(|&l| std::cmp::Reverse(self.mon(self.link(l).child).cost));
        for (i, &l) in defects.iter().enumerate() {
            self.link_mut(l).parent_defects_index = Some(i);
        }
        self.group_mut(gm).defect_links = defects;
    }

    /// Cost and defect count of the descendants of `gm` with tag `tag`,
    /// looking through nested groups.
    pub fn group_cost_by_type(&self, gm: MonitorId, tag: MonitorTag) -> (Cost, usize) {
        let mut cost = 0;
        let mut count = 0;
        if tag == MonitorTag::Group {
            return (cost, count);
        }
        for &l in &self.group(gm).defect_links {
            let child = self.link(l).child;
            let child_tag = self.mon(child).tag();
            if child_tag == tag {
                cost += self.mon(child).cost;
                count += 1;
            } else if child_tag == MonitorTag::Group {
                let (c, n) = self.group_cost_by_type(child, tag);
                cost += c;
                count += n;
            }
        }
        (cost, count)
    }

    /// Links every child of `gm` to every parent of `gm`, then deletes `gm`.
    ///
    /// The cost reaching each parent is unchanged.
    pub fn group_bypass_and_delete(&mut self, gm: MonitorId) {
        let parents: Vec<MonitorId> = self
            .mon(gm)
            .parent_links
            .iter()
            .map(|&l| self.link(l).parent)
            .collect();
        let children: Vec<MonitorId> = self
            .group(gm)
            .child_links
            .iter()
            .map(|&l| self.link(l).child)
            .collect();
        for &parent in &parents {
            for &child in &children {
                self.group_add_child(parent, child);
            }
        }
        self.delete_monitor(gm);
    }

    /// Number of distinct upward paths from `lower` to `higher`; 1 when
    /// they are the same monitor.
    pub fn path_count(&self, lower: MonitorId, higher: MonitorId) -> usize {
        if lower == higher {
            return 1;
        }
        self.mon(lower)
            .parent_links
            .iter()
            .map(|&l| self.path_count(self.link(l).parent, higher))
            .sum()
    }

    /// The `i`th parent of `m`.
    pub fn monitor_parent(&self, m: MonitorId, i: usize) -> MonitorId {
        self.link(self.mon(m).parent_links[i]).parent
    }

    /// Whether `gm` is a parent of `m`.
    pub fn monitor_has_parent(&self, m: MonitorId, gm: MonitorId) -> bool {
        self.find_link(gm, m).is_some()
    }

    /// Removes `m` from every group it belongs to.
    pub(crate) fn delete_parent_links(&mut self, m: MonitorId) {
        while let Some(&l) = self.mon(m).parent_links.last() {
            let parent = self.link(l).parent;
            self.group_delete_child(parent, m);
        }
    }

    /// Removes every child of `gm`.
    pub(crate) fn delete_child_links(&mut self, gm: MonitorId) {
        while let Some(&l) = self.group(gm).child_links.last() {
            let child = self.link(l).child;
            self.group_delete_child(gm, child);
        }
    }

    /// Receives the cost transition of the child at the end of `link`.
    pub(crate) fn group_change_cost(
        &mut self,
        gm: MonitorId,
        link: LinkId,
        old_cost: Cost,
        new_cost: Cost,
    ) {
        assert_ne!(old_cost, new_cost, "group_change_cost: no change");
        let child = self.link(link).child;
        for i in 0..self.group(gm).traces.len() {
            let t = self.group(gm).traces[i];
            self.trace_record(t, child, old_cost);
        }

        if old_cost == 0 {
            let g = self.group_mut(gm);
            let index = g.defect_links.len();
            g.defect_links.push(link);
            self.link_mut(link).parent_defects_index = Some(index);
        } else if new_cost == 0 {
            let index = match self.link_mut(link).parent_defects_index.take() {
                Some(index) => index,
                None => panic!("group_change_cost: {child} is not a defect of {gm}"),
            };
            let moved = {
                let defects = &mut self.group_mut(gm).defect_links;
                defects.swap_remove(index);
                defects.get(index).copied()
            };
            if let Some(moved) = moved {
                self.link_mut(moved).parent_defects_index = Some(index);
            }
        }

        let gm_cost = self.mon(gm).cost + (new_cost - old_cost);
        self.change_cost(gm, gm_cost);
    }

    fn group_add_lower_bound(&mut self, gm: MonitorId, delta: Cost) {
        self.mon_mut(gm).lower_bound += delta;
        for i in 0..self.mon(gm).parent_links.len() {
            let parent = self.link(self.mon(gm).parent_links[i]).parent;
            self.group_add_lower_bound(parent, delta);
        }
    }

    /// Deletes a group that is not the root and has no active traces.
    pub(crate) fn delete_group_monitor(&mut self, gm: MonitorId) {
        assert!(gm != self.root, "delete_monitor: cannot delete the solution root");
        assert!(
            self.group(gm).traces.is_empty(),
            "delete_monitor: group {gm} is being traced"
        );
        self.delete_child_links(gm);
        self.delete_parent_links(gm);
        self.forget_monitor(gm);
    }
}

impl Monitor {
    /// Group state, if this is a group monitor.
    pub fn as_group(&self) -> Option<&GroupMonitor> {
        match &self.kind {
            MonitorKind::Group(g) => Some(g),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::monitor::MonitorTag;
    use crate::test_support::{assign_resource_soln, SampleSoln};

    #[test]
    fn test_aggregation_and_defects() {
        // three assign-resource monitors with costs 3, 0 and 5
        let SampleSoln {
            mut soln, monitors, ..
        } = assign_resource_soln(&[Some(3), None, Some(5)]);
        let gm = soln.make_group_monitor(7, "Sample");
        for &m in &monitors {
            soln.group_add_child(gm, m);
        }

        assert_eq!(soln.monitor(gm).cost(), 8);
        assert_eq!(soln.group_defect_count(gm), 2);

        soln.group_delete_child(gm, monitors[2]);
        assert_eq!(soln.monitor(gm).cost(), 3);
        assert_eq!(soln.group_defect_count(gm), 1);
        assert_eq!(soln.group_defect(gm, 0), monitors[0]);
        assert_eq!(soln.group_child_count(gm), 2);
        assert!(!soln.group_has_child(gm, monitors[2]));
    }

    #[test]
    fn test_nested_groups_propagate() {
        let SampleSoln {
            mut soln, monitors, ..
        } = assign_resource_soln(&[Some(2), Some(4)]);
        let outer = soln.make_group_monitor(1, "Outer");
        let inner = soln.make_group_monitor(2, "Inner");
        soln.group_add_child(outer, inner);
        soln.group_add_child(inner, monitors[0]);
        soln.group_add_child(outer, monitors[1]);

        assert_eq!(soln.monitor(outer).cost(), 6);
        assert_eq!(soln.path_count(monitors[0], outer), 1);
        assert_eq!(
            soln.group_cost_by_type(outer, MonitorTag::AssignResource),
            (6, 2)
        );
        assert_eq!(soln.group_cost_by_type(outer, MonitorTag::Group), (0, 0));

        soln.group_bypass_and_delete(inner);
        assert_eq!(soln.monitor(outer).cost(), 6);
        assert!(soln.group_has_child(outer, monitors[0]));
    }

    #[test]
    fn test_defect_sort() {
        let SampleSoln {
            mut soln, monitors, ..
        } = assign_resource_soln(&[Some(1), Some(9), Some(4)]);
        let gm = soln.make_group_monitor(0, "Sorted");
        for &m in &monitors {
            soln.group_add_child(gm, m);
        }
        soln.group_defect_sort(gm);
        let costs: Vec<_> = (0..3)
            .map(|i| soln.monitor(soln.group_defect(gm, i)).cost())
            .collect();
        assert_eq!(costs, vec![9, 4, 1]);

        // removal after sorting still finds the right slot
        soln.group_delete_child(gm, monitors[1]);
        assert_eq!(soln.monitor(gm).cost(), 5);
        assert_eq!(soln.group_defect_count(gm), 2);
    }

    #[test]
    #[should_panic(expected = "cycle")]
    fn test_cycle_rejected() {
        let SampleSoln { mut soln, .. } = assign_resource_soln(&[]);
        let a = soln.make_group_monitor(0, "A");
        let b = soln.make_group_monitor(0, "B");
        soln.group_add_child(a, b);
        soln.group_add_child(b, a);
    }
}
