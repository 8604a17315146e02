//! Debug printing of monitors.
//!
//! One line per monitor:
//!
//! ```text
//! [ A1 00004 busy A                               0.00002 (lb 0.00001): 2 too many in Mon ]
//! ```
//!
//! The flag is `G` for a group, `A` for an attached monitor and `D` for a
//! detached one, followed by the number of paths to the root. At verbosity
//! 2 and above constraint monitors explain their deviation, and groups list
//! their children indented below them.

use std::fmt::{self, Write};

use super::{MonitorId, MonitorKind, MonitorTag};
use crate::models::cost::cost_show;
use crate::Soln;

impl Soln {
    /// Writes the debug form of `m` to `w`.
    pub fn write_monitor_debug<W: Write>(
        &self,
        w: &mut W,
        m: MonitorId,
        verbosity: u32,
        indent: usize,
    ) -> fmt::Result {
        let monitor = self.mon(m);
        let flag = match (monitor.tag(), monitor.attached) {
            (MonitorTag::Group, _) => 'G',
            (_, true) => 'A',
            (_, false) => 'D',
        };
        write!(
            w,
            "{:indent$}[ {flag}{} {:05} {:<35} {:11.5}",
            "",
            self.path_count(m, self.root),
            monitor.soln_index,
            self.monitor_label(m),
            cost_show(monitor.cost),
        )?;
        if monitor.lower_bound != 0 {
            write!(w, " (lb {:.5})", cost_show(monitor.lower_bound))?;
        }

        if let MonitorKind::Group(g) = &monitor.kind {
            if verbosity >= 2 {
                writeln!(w)?;
                for &link in &g.child_links {
                    self.write_monitor_debug(w, self.link(link).child, verbosity, indent + 2)?;
                }
                return writeln!(w, "{:indent$}]", "");
            }
        } else if verbosity >= 2 && monitor.tag().is_constraint() {
            write!(w, ": {}", self.monitor_deviation_description(m))?;
        }
        writeln!(w, " ]")
    }

    /// The debug form of `m` as a string.
    pub fn monitor_debug(&self, m: MonitorId, verbosity: u32, indent: usize) -> String {
        let mut s = String::new();
        self.write_monitor_debug(&mut s, m, verbosity, indent)
            .map(|()| s)
            .unwrap_or_default()
    }

    /// Short name of what `m` watches.
    pub fn monitor_label(&self, m: MonitorId) -> String {
        let instance = &self.instance;
        let on_constraint = |c: crate::models::ConstraintId, point: &str| {
            format!("{} {point}", instance.constraint(c).id)
        };
        match &self.mon(m).kind {
            MonitorKind::Group(g) => g.sub_tag_label.clone(),
            MonitorKind::AssignResource(x) => {
                on_constraint(x.constraint, &instance.event_resource(x.event_resource).id)
            }
            MonitorKind::PreferResources(x) => {
                on_constraint(x.constraint, &instance.event_resource(x.event_resource).id)
            }
            MonitorKind::AvoidSplitAssignments(x) => {
                let first = x
                    .event_resources
                    .first()
                    .map(|&er| instance.event_resource(er).event.as_str())
                    .unwrap_or("-");
                on_constraint(x.constraint, first)
            }
            MonitorKind::AvoidClashes(x) => {
                on_constraint(x.constraint, &instance.resource(x.resource).id)
            }
            MonitorKind::AvoidUnavailableTimes(x) => {
                on_constraint(x.constraint, &instance.resource(x.resource).id)
            }
            MonitorKind::LimitIdleTimes(x) => {
                on_constraint(x.constraint, &instance.resource(x.resource).id)
            }
            MonitorKind::LimitBusyTimes(x) => {
                on_constraint(x.constraint, &instance.resource(x.resource).id)
            }
            MonitorKind::LimitWorkload(x) => {
                on_constraint(x.constraint, &instance.resource(x.resource).id)
            }
            MonitorKind::Timetable(x) => {
                format!("Timetable {}", instance.resource(x.resource).id)
            }
            MonitorKind::TimeGroup(x) => {
                format!("TimeGroup {}", instance.time_group(x.time_group).id)
            }
        }
    }

    /// Explains the deviation of a constraint monitor; `"0"` when there is
    /// none.
    ///
    /// # Panics
    /// If `m` does not measure a constraint.
    pub fn monitor_deviation_description(&self, m: MonitorId) -> String {
        let dev = self.monitor_deviation(m);
        if dev == 0 {
            return "0".to_string();
        }
        let instance = &self.instance;
        match &self.mon(m).kind {
            MonitorKind::AssignResource(x) => {
                let durations: Vec<i32> = self
                    .event_resource_in_soln(x.event_resource)
                    .tasks()
                    .iter()
                    .map(|&t| self.task(t))
                    .filter(|task| task.asst_resource().is_none())
                    .map(|task| task.duration())
                    .collect();
                parts_description(dev, &durations)
            }
            MonitorKind::PreferResources(x) => {
                let durations: Vec<i32> = self
                    .event_resource_in_soln(x.event_resource)
                    .tasks()
                    .iter()
                    .map(|&t| self.task(t))
                    .filter(|task| x.is_wrong(task.asst_resource()))
                    .map(|task| task.duration())
                    .collect();
                parts_description(dev, &durations)
            }
            MonitorKind::AvoidSplitAssignments(x) => {
                let names: Vec<&str> = x
                    .resources()
                    .iter()
                    .map(|&r| instance.resource(r).id.as_str())
                    .collect();
                format!("{dev} too many of {}", names.join(", "))
            }
            MonitorKind::AvoidClashes(x) => {
                let tt = self.resource_timetable(x.resource);
                let timetable = self.timetable(tt);
                let mut times: Vec<usize> = (0..timetable.clashing_time_count())
                    .map(|i| timetable.clashing_time(i))
                    .collect();
                times.sort_unstable();
                let parts: Vec<String> = times
                    .into_iter()
                    .map(|t| {
                        let extra = timetable.time_task_count(t) - 1;
                        if extra > 1 {
                            format!("{extra} {}", instance.time_name(t))
                        } else {
                            instance.time_name(t).to_string()
                        }
                    })
                    .collect();
                format!("{dev}: {}", parts.join("; "))
            }
            MonitorKind::AvoidUnavailableTimes(_) => dev.to_string(),
            MonitorKind::LimitIdleTimes(x) => {
                let direction = if x.total_idle() < x.minimum() {
                    "too few"
                } else {
                    "too many"
                };
                let names: Vec<&str> = x
                    .time_group_monitors()
                    .iter()
                    .map(|&tgm| {
                        let tg = self.time_group_monitor(tgm).time_group;
                        instance.time_group(tg).id.as_str()
                    })
                    .collect();
                format!("{dev} {direction} in {}", names.join(", "))
            }
            MonitorKind::LimitBusyTimes(x) => {
                let parts: Vec<String> = x
                    .defective_time_groups()
                    .iter()
                    .map(|&(tg, busy)| {
                        let direction = if busy < x.minimum() {
                            "too few"
                        } else {
                            "too many"
                        };
                        format!(
                            "{} {direction} in {}",
                            x.dev(busy),
                            instance.time_group(tg).id
                        )
                    })
                    .collect();
                parts.join("; ")
            }
            MonitorKind::LimitWorkload(x) => {
                let direction = if x.is_over() { "too much" } else { "too little" };
                format!("{dev} {direction}")
            }
            other => super::unsupported("monitor_deviation_description", other.tag()),
        }
    }
}

/// `dev` alone when one part makes it up, otherwise `dev: p1; p2`.
fn parts_description(dev: i32, parts: &[i32]) -> String {
    if parts.len() == 1 {
        return dev.to_string();
    }
    let parts: Vec<String> = parts.iter().map(i32::to_string).collect();
    format!("{dev}: {}", parts.join("; "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventResourceId, ResourceId};
    use crate::task::NewTask;
    use crate::test_support::{assign_resource_soln, busy_soln, clash_soln, SampleSoln};

    #[test]
    fn test_assign_resource_description() {
        let SampleSoln {
            mut soln, monitors, ..
        } = assign_resource_soln(&[Some(2), None]);
        assert_eq!(soln.monitor_deviation_description(monitors[0]), "2");
        assert_eq!(soln.monitor_deviation_description(monitors[1]), "0");

        let extra = NewTask::new(1).with_event_resource(EventResourceId(0));
        soln.make_task(extra);
        assert_eq!(soln.monitor_deviation_description(monitors[0]), "3: 2; 1");
    }

    #[test]
    fn test_clash_description() {
        let mut soln = clash_soln();
        let r = ResourceId(0);
        let m = soln.resource_in_soln(r).monitors()[0];
        for _ in 0..3 {
            let t = soln.make_task(NewTask::new(1));
            soln.task_assign_time(t, 1).unwrap();
            soln.task_assign_resource(t, r).unwrap();
        }
        let t = soln.make_task(NewTask::new(1));
        soln.task_assign_time(t, 4).unwrap();
        soln.task_assign_resource(t, r).unwrap();
        assert_eq!(soln.monitor_deviation_description(m), "2: 2 T1");

        let t = soln.make_task(NewTask::new(1));
        soln.task_assign_time(t, 4).unwrap();
        soln.task_assign_resource(t, r).unwrap();
        assert_eq!(soln.monitor_deviation_description(m), "3: 2 T1; T4");
    }

    #[test]
    fn test_busy_description() {
        let mut soln = busy_soln(2, 3, 6);
        let r = ResourceId(0);
        let m = soln.resource_in_soln(r).monitors()[0];
        let t = soln.make_task(NewTask::new(1));
        soln.task_assign_time(t, 0).unwrap();
        soln.task_assign_resource(t, r).unwrap();
        assert_eq!(soln.monitor_deviation_description(m), "1 too few in all");
    }

    #[test]
    fn test_debug_lines() {
        let SampleSoln { soln, monitors, .. } = assign_resource_soln(&[Some(3)]);
        let line = soln.monitor_debug(monitors[0], 2, 0);
        assert!(line.starts_with("[ A1 "));
        assert!(line.trim_end().ends_with(": 3 ]"));

        let tree = soln.monitor_debug(soln.root(), 2, 0);
        let lines: Vec<&str> = tree.lines().collect();
        assert!(lines[0].starts_with("[ G1 00000 Soln"));
        assert!(lines[1].starts_with("  [ A1 "));
        assert_eq!(*lines.last().unwrap(), "]");

        let brief = soln.monitor_debug(soln.root(), 1, 4);
        assert_eq!(brief.lines().count(), 1);
        assert!(brief.starts_with("    [ G1"));
    }
}
