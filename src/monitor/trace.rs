//! Traces of group-monitor cost changes.
//!
//! A trace watches one group between `begin` and `end`. It records each
//! child whose cost changed, once, with the cost that child had before
//! its first change, so a search can see which monitors an operation
//! touched without diffing the whole solution.

use super::MonitorId;
use crate::models::Cost;
use crate::Soln;

/// Index of a trace in its solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(pub(crate) usize);

#[derive(Debug, Clone)]
pub(crate) struct Trace {
    group: MonitorId,
    active: bool,
    gm_init_cost: Cost,
    monitors: Vec<MonitorId>,
    init_costs: Vec<Cost>,
}

impl Soln {
    fn trace_ref(&self, t: TraceId) -> &Trace {
        match self.traces.get(t.0).and_then(Option::as_ref) {
            Some(trace) => trace,
            None => panic!("trace {} has been deleted", t.0),
        }
    }

    fn trace_mut(&mut self, t: TraceId) -> &mut Trace {
        match self.traces.get_mut(t.0).and_then(Option::as_mut) {
            Some(trace) => trace,
            None => panic!("trace {} has been deleted", t.0),
        }
    }

    /// Creates an idle trace of group monitor `gm`.
    pub fn trace_make(&mut self, gm: MonitorId) -> TraceId {
        self.group(gm);
        let trace = Trace {
            group: gm,
            active: false,
            gm_init_cost: 0,
            monitors: Vec::new(),
            init_costs: Vec::new(),
        };
        match self.traces.iter().position(Option::is_none) {
            Some(i) => {
                self.traces[i] = Some(trace);
                TraceId(i)
            }
            None => {
                self.traces.push(Some(trace));
                TraceId(self.traces.len() - 1)
            }
        }
    }

    /// Deletes a trace, ending it first if it is active.
    pub fn trace_delete(&mut self, t: TraceId) {
        if self.trace_ref(t).active {
            self.trace_end(t);
        }
        self.traces[t.0] = None;
    }

    /// Starts recording, discarding anything recorded before.
    pub fn trace_begin(&mut self, t: TraceId) {
        let gm = self.trace_ref(t).group;
        let cost = self.mon(gm).cost;
        let trace = self.trace_mut(t);
        assert!(!trace.active, "trace_begin: trace already active");
        trace.active = true;
        trace.gm_init_cost = cost;
        trace.monitors.clear();
        trace.init_costs.clear();
        self.group_mut(gm).traces.push(t);
    }

    /// Stops recording; the recorded changes stay readable.
    pub fn trace_end(&mut self, t: TraceId) {
        let gm = self.trace_ref(t).group;
        let trace = self.trace_mut(t);
        assert!(trace.active, "trace_end: trace not active");
        trace.active = false;
        let traces = &mut self.group_mut(gm).traces;
        if let Some(pos) = traces.iter().position(|&x| x == t) {
            traces.swap_remove(pos);
        }
    }

    /// The traced group.
    pub fn trace_group(&self, t: TraceId) -> MonitorId {
        self.trace_ref(t).group
    }

    /// Cost of the traced group when recording began.
    pub fn trace_gm_init_cost(&self, t: TraceId) -> Cost {
        self.trace_ref(t).gm_init_cost
    }

    /// Number of children whose cost changed.
    pub fn trace_monitor_count(&self, t: TraceId) -> usize {
        self.trace_ref(t).monitors.len()
    }

    /// The `i`th changed child.
    pub fn trace_monitor(&self, t: TraceId, i: usize) -> MonitorId {
        self.trace_ref(t).monitors[i]
    }

    /// Cost of the `i`th changed child before its first change.
    pub fn trace_monitor_init_cost(&self, t: TraceId, i: usize) -> Cost {
        self.trace_ref(t).init_costs[i]
    }

    pub(crate) fn trace_record(&mut self, t: TraceId, m: MonitorId, old_cost: Cost) {
        let trace = self.trace_mut(t);
        if !trace.monitors.contains(&m) {
            trace.monitors.push(m);
            trace.init_costs.push(old_cost);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{assign_resource_soln, SampleSoln};

    #[test]
    fn test_trace_records_first_cost() {
        let SampleSoln {
            mut soln,
            monitors,
            tasks,
        } = assign_resource_soln(&[Some(3), Some(2)]);
        let root = soln.root();
        let r0 = soln.resource_ids().next().unwrap();

        let t = soln.trace_make(root);
        soln.trace_begin(t);
        soln.task_assign_resource(tasks[0], r0).unwrap();
        soln.task_unassign(tasks[0]).unwrap();
        soln.task_assign_resource(tasks[0], r0).unwrap();
        soln.trace_end(t);

        assert_eq!(soln.trace_gm_init_cost(t), 5);
        assert_eq!(soln.trace_monitor_count(t), 1);
        assert_eq!(soln.trace_monitor(t, 0), monitors[0]);
        assert_eq!(soln.trace_monitor_init_cost(t, 0), 3);

        // changes after the end are not recorded
        soln.task_assign_resource(tasks[1], r0).unwrap();
        assert_eq!(soln.trace_monitor_count(t), 1);
        soln.trace_delete(t);
    }
}
