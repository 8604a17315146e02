//! Time-group monitors.
//!
//! A time-group monitor counts how many times of one time group are busy in
//! its timetable and, while some limit-idle-times monitor depends on it,
//! how many times are idle: free times lying between the first and last
//! busy time of the group. Changes are staged by the timetable and
//! committed by [`time_group_flush`](crate::Soln::time_group_flush), which
//! passes the old and new counts to every dependent.

use std::collections::BTreeSet;

use super::{Monitor, MonitorId, MonitorKind, MonitorTag};
use crate::models::TimeGroupId;
use crate::Soln;

/// Busy and idle counts of one time group in one timetable.
#[derive(Debug, Clone)]
pub struct TimeGroupMonitor {
    pub(crate) timetable: MonitorId,
    pub(crate) time_group: TimeGroupId,
    pub(crate) monitors: Vec<MonitorId>,
    old_busy: i32,
    new_busy: i32,
    old_idle: i32,
    busy_positions: Option<BTreeSet<usize>>,
}

impl TimeGroupMonitor {
    pub(crate) fn new(timetable: MonitorId, time_group: TimeGroupId) -> Self {
        Self {
            timetable,
            time_group,
            monitors: Vec::new(),
            old_busy: 0,
            new_busy: 0,
            old_idle: 0,
            busy_positions: None,
        }
    }

    /// The timetable this monitor reads.
    pub fn timetable(&self) -> MonitorId {
        self.timetable
    }

    pub fn time_group(&self) -> TimeGroupId {
        self.time_group
    }

    /// Monitors fed by this one.
    pub fn monitors(&self) -> &[MonitorId] {
        &self.monitors
    }

    /// Committed busy count.
    pub fn busy_count(&self) -> i32 {
        self.old_busy
    }

    /// Committed idle count; 0 unless idle times are being tracked.
    pub fn idle_count(&self) -> i32 {
        self.old_idle
    }

    /// Whether idle times are being tracked.
    pub fn tracks_idle(&self) -> bool {
        self.busy_positions.is_some()
    }

    fn staged_idle(&self) -> i32 {
        match &self.busy_positions {
            Some(set) if set.len() > 1 => match (set.first(), set.last()) {
                (Some(&lo), Some(&hi)) => (hi - lo + 1 - set.len()) as i32,
                _ => 0,
            },
            _ => 0,
        }
    }
}

impl Soln {
    pub(crate) fn time_group_monitor(&self, tgm: MonitorId) -> &TimeGroupMonitor {
        match &self.mon(tgm).kind {
            MonitorKind::TimeGroup(t) => t,
            other => panic!("{tgm} is a {}, not a time-group monitor", other.tag().show()),
        }
    }

    fn time_group_monitor_mut(&mut self, tgm: MonitorId) -> &mut TimeGroupMonitor {
        match &mut self.mon_mut(tgm).kind {
            MonitorKind::TimeGroup(t) => t,
            other => panic!("{tgm} is a {}, not a time-group monitor", other.tag().show()),
        }
    }

    /// Makes `m` a dependent of `tgm` and reports the current counts to it.
    pub(crate) fn time_group_attach_monitor(&mut self, tgm: MonitorId, m: MonitorId) {
        if self.mon(m).tag() == MonitorTag::LimitIdleTimes
            && !self.time_group_monitor(tgm).tracks_idle()
        {
            self.time_group_track_idle(tgm);
        }
        let (busy, idle) = {
            let t = self.time_group_monitor_mut(tgm);
            t.monitors.push(m);
            (t.old_busy, t.old_idle)
        };
        self.monitor_add_busy_and_idle(m, tgm, busy, idle);
    }

    /// Removes dependent `m` from `tgm`, withdrawing the counts it was given.
    pub(crate) fn time_group_detach_monitor(&mut self, tgm: MonitorId, m: MonitorId) {
        let (busy, idle) = {
            let t = self.time_group_monitor_mut(tgm);
            match t.monitors.iter().position(|&x| x == m) {
                Some(pos) => {
                    t.monitors.swap_remove(pos);
                }
                None => panic!("time group detach: {m} does not depend on {tgm}"),
            }
            (t.old_busy, t.old_idle)
        };
        self.monitor_delete_busy_and_idle(m, tgm, busy, idle);

        let idle_needed = self
            .time_group_monitor(tgm)
            .monitors
            .iter()
            .any(|&x| self.mon(x).tag() == MonitorTag::LimitIdleTimes);
        if !idle_needed {
            let t = self.time_group_monitor_mut(tgm);
            t.busy_positions = None;
            t.old_idle = 0;
        }
    }

    /// Builds the busy position set from the timetable's current cells.
    fn time_group_track_idle(&mut self, tgm: MonitorId) {
        let (tt, tg) = {
            let t = self.time_group_monitor(tgm);
            (t.timetable, t.time_group)
        };
        let positions: BTreeSet<usize> = {
            let timetable = self.timetable(tt);
            self.instance
                .time_group(tg)
                .times()
                .iter()
                .enumerate()
                .filter(|&(_, &time)| !timetable.time_available(time))
                .map(|(pos, _)| pos)
                .collect()
        };
        let t = self.time_group_monitor_mut(tgm);
        t.busy_positions = Some(positions);
        t.old_idle = t.staged_idle();
    }

    /// Stages time `t` becoming busy.
    pub(crate) fn time_group_assign_non_clash(&mut self, tgm: MonitorId, t: usize) {
        let pos = self.time_group_position(tgm, t);
        let m = self.time_group_monitor_mut(tgm);
        m.new_busy += 1;
        if let Some(set) = &mut m.busy_positions {
            set.insert(pos);
        }
    }

    /// Stages time `t` becoming free.
    pub(crate) fn time_group_unassign_non_clash(&mut self, tgm: MonitorId, t: usize) {
        let pos = self.time_group_position(tgm, t);
        let m = self.time_group_monitor_mut(tgm);
        m.new_busy -= 1;
        assert!(m.new_busy >= 0, "time group monitor: negative busy count");
        if let Some(set) = &mut m.busy_positions {
            set.remove(&pos);
        }
    }

    fn time_group_position(&self, tgm: MonitorId, t: usize) -> usize {
        let tg = self.time_group_monitor(tgm).time_group;
        match self.instance.time_group(tg).position(t) {
            Some(pos) => pos,
            None => panic!("time group monitor {tgm}: time {t} outside its time group"),
        }
    }

    /// Commits staged counts, telling each dependent if they changed.
    pub(crate) fn time_group_flush(&mut self, tgm: MonitorId) {
        let (old_busy, new_busy, old_idle, new_idle) = {
            let t = self.time_group_monitor(tgm);
            (t.old_busy, t.new_busy, t.old_idle, t.staged_idle())
        };
        if old_busy == new_busy && old_idle == new_idle {
            return;
        }
        for i in 0..self.time_group_monitor(tgm).monitors.len() {
            let m = self.time_group_monitor(tgm).monitors[i];
            self.monitor_change_busy_and_idle(m, tgm, old_busy, new_busy, old_idle, new_idle);
        }
        let t = self.time_group_monitor_mut(tgm);
        t.old_busy = new_busy;
        t.old_idle = new_idle;
    }
}

impl Monitor {
    /// Time-group state, if this is a time-group monitor.
    pub fn as_time_group(&self) -> Option<&TimeGroupMonitor> {
        match &self.kind {
            MonitorKind::TimeGroup(t) => Some(t),
            _ => None,
        }
    }
}
