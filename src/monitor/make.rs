//! Constraint monitor construction.
//!
//! One monitor per point of application of each constraint: per event
//! resource, per group of event resources, or per resource. A new monitor
//! is registered with its hubs, linked under the root and attached, so the
//! solution cost accounts for it immediately.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::debug;

use super::{
    AssignResourceMonitor, AvoidClashesMonitor, AvoidSplitAssignmentsMonitor,
    AvoidUnavailableTimesMonitor, LimitBusyTimesMonitor, LimitIdleTimesMonitor,
    LimitWorkloadMonitor, MonitorId, MonitorKind, PreferResourcesMonitor,
};
use crate::models::{Constraint, ConstraintId, ConstraintKind, Cost, Instance, ResourceId};
use crate::Soln;

impl Soln {
    /// Makes, links and attaches the monitors of constraint `c`.
    pub fn make_constraint_monitors(&mut self, c: ConstraintId) -> Vec<MonitorId> {
        let instance = Arc::clone(&self.instance);
        let constraint = instance.constraint(c);
        let mut made = Vec::with_capacity(constraint.point_of_application_count());

        match &constraint.kind {
            ConstraintKind::AssignResource { event_resources } => {
                for &er in event_resources {
                    let kind = MonitorKind::AssignResource(AssignResourceMonitor::new(c, er));
                    let m = self.add_monitor(kind, 0);
                    self.ers_add_monitor(er, m);
                    made.push(m);
                }
            }
            ConstraintKind::PreferResources {
                event_resources,
                domain,
            } => {
                for &er in event_resources {
                    let kind = MonitorKind::PreferResources(PreferResourcesMonitor::new(
                        c,
                        er,
                        domain.clone(),
                    ));
                    let m = self.add_monitor(kind, 0);
                    self.ers_add_monitor(er, m);
                    made.push(m);
                }
            }
            ConstraintKind::AvoidSplitAssignments { event_groups } => {
                for group in event_groups {
                    let kind = MonitorKind::AvoidSplitAssignments(
                        AvoidSplitAssignmentsMonitor::new(c, group.clone()),
                    );
                    let m = self.add_monitor(kind, 0);
                    for &er in group {
                        self.ers_add_monitor(er, m);
                    }
                    made.push(m);
                }
            }
            ConstraintKind::AvoidClashes { resources } => {
                for &r in resources {
                    let lb = avoid_clashes_lower_bound(&instance, constraint, r);
                    let kind = MonitorKind::AvoidClashes(AvoidClashesMonitor::new(c, r));
                    made.push(self.add_resource_monitor(r, kind, lb));
                }
            }
            ConstraintKind::AvoidUnavailableTimes { resources, times } => {
                for &r in resources {
                    let kind = MonitorKind::AvoidUnavailableTimes(
                        AvoidUnavailableTimesMonitor::new(c, r, *times),
                    );
                    made.push(self.add_resource_monitor(r, kind, 0));
                }
            }
            ConstraintKind::LimitIdleTimes {
                resources,
                minimum,
                maximum,
                ..
            } => {
                for &r in resources {
                    let kind = MonitorKind::LimitIdleTimes(LimitIdleTimesMonitor::new(
                        c, r, *minimum, *maximum,
                    ));
                    made.push(self.add_resource_monitor(r, kind, 0));
                }
            }
            ConstraintKind::LimitBusyTimes {
                resources,
                minimum,
                maximum,
                ..
            } => {
                for &r in resources {
                    let lb = limit_busy_times_lower_bound(&instance, constraint, r);
                    let kind = MonitorKind::LimitBusyTimes(LimitBusyTimesMonitor::new(
                        c, r, *minimum, *maximum,
                    ));
                    made.push(self.add_resource_monitor(r, kind, lb));
                }
            }
            ConstraintKind::LimitWorkload {
                resources,
                minimum,
                maximum,
            } => {
                for &r in resources {
                    let lb = limit_workload_lower_bound(&instance, constraint, r);
                    let kind = MonitorKind::LimitWorkload(LimitWorkloadMonitor::new(
                        c, r, *minimum, *maximum,
                    ));
                    made.push(self.add_resource_monitor(r, kind, lb));
                }
            }
        }

        for &m in &made {
            self.group_add_child(self.root, m);
            self.attach_monitor(m);
        }
        debug!(
            constraint = %constraint.id,
            monitors = made.len(),
            cost = self.cost(),
            "constraint monitors made"
        );
        made
    }

    /// Makes the monitors of every constraint of the instance, in
    /// declaration order.
    pub fn make_all_constraint_monitors(&mut self) -> Vec<MonitorId> {
        let ids: Vec<ConstraintId> = self.instance.constraint_ids().collect();
        ids.into_iter()
            .flat_map(|c| self.make_constraint_monitors(c))
            .collect()
    }

    fn add_resource_monitor(&mut self, r: ResourceId, kind: MonitorKind, lb: Cost) -> MonitorId {
        let m = self.add_monitor(kind, lb);
        self.rs_add_monitor(r, m);
        m
    }
}

/// A resource preassigned more time than the instance has must clash.
fn avoid_clashes_lower_bound(instance: &Instance, constraint: &Constraint, r: ResourceId) -> Cost {
    let excess = instance.resource(r).preassigned_duration - instance.time_count() as i32;
    if excess > 0 {
        constraint.cost(excess)
    } else {
        0
    }
}

/// When clashes cost at least as much as busy-time excess, the preassigned
/// duration that cannot fall outside the time groups must fall inside them.
fn limit_busy_times_lower_bound(
    instance: &Instance,
    constraint: &Constraint,
    r: ResourceId,
) -> Cost {
    let (time_groups, maximum) = match &constraint.kind {
        ConstraintKind::LimitBusyTimes {
            time_groups,
            maximum,
            ..
        } => (time_groups, *maximum),
        _ => return 0,
    };
    if instance.avoid_clashes_weight(r) >= Some(constraint.combined_weight()) {
        let covered: BTreeSet<usize> = time_groups
            .iter()
            .flat_map(|&tg| instance.time_group(tg).times().iter().copied())
            .collect();
        let outside = (instance.time_count() - covered.len()) as i32;
        let min_inside = instance.resource(r).preassigned_duration - outside;
        let max_inside = maximum.saturating_mul(time_groups.len() as i32);
        if min_inside > max_inside {
            return constraint.cost(min_inside - max_inside);
        }
    }
    0
}

fn limit_workload_lower_bound(instance: &Instance, constraint: &Constraint, r: ResourceId) -> Cost {
    let maximum = match &constraint.kind {
        ConstraintKind::LimitWorkload { maximum, .. } => *maximum,
        _ => return 0,
    };
    let workload = instance.resource(r).preassigned_workload;
    if workload > maximum as f64 {
        constraint.cost((workload - maximum as f64).ceil() as i32)
    } else {
        0
    }
}
