//! Tasks and the task assignment state machine.
//!
//! A task is a unit of demand for one resource over `duration` consecutive
//! times. Tasks are assigned to other tasks, forming trees; the root of a
//! tree is either unassigned or a *cycle task*, the permanent stand-in for
//! one resource. Every task below a cycle task is assigned that resource,
//! so assigning a resource means assigning the task to its cycle task.
//!
//! Each mutation has a `*_check` counterpart returning the same
//! [`TaskError`]; a rejected mutation changes nothing. Accepted mutations
//! emit events to the resource hub of the assigned resource and to the
//! event-resource hub the task was derived from, which in turn update the
//! monitors.
//!
//! # Reference
//! Kingston (2012), "A software library for school timetabling research"

use std::fmt;

use tracing::{debug, instrument};

use crate::error::TaskError;
use crate::models::{EventResourceId, ResourceGroup, ResourceId};
use crate::monitor::ZeroCostTrigger;
use crate::visit::VisitContext;
use crate::Soln;

/// Index of a task in its solution's arena.
///
/// Task `i` for `i < resource count` is the cycle task of resource `i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub(crate) usize);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// Options for a new task.
#[derive(Debug, Clone)]
pub struct NewTask {
    duration: i32,
    workload_per_time: f64,
    domain: Option<ResourceGroup>,
    event_resource: Option<EventResourceId>,
    tasking: Option<String>,
}

impl NewTask {
    /// A task of `duration` times with workload 1 per time, any resource
    /// allowed, not derived from an event resource.
    pub fn new(duration: i32) -> Self {
        Self {
            duration,
            workload_per_time: 1.0,
            domain: None,
            event_resource: None,
            tasking: None,
        }
    }

    /// Sets the workload carried per time.
    pub fn with_workload(mut self, per_time: f64) -> Self {
        self.workload_per_time = per_time;
        self
    }

    /// Restricts the resources the task may be assigned.
    pub fn with_domain(mut self, domain: ResourceGroup) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Marks the task as derived from `er`.
    pub fn with_event_resource(mut self, er: EventResourceId) -> Self {
        self.event_resource = Some(er);
        self
    }

    /// Labels the task with the tasking it belongs to.
    pub fn with_tasking(mut self, tasking: impl Into<String>) -> Self {
        self.tasking = Some(tasking.into());
        self
    }
}

/// Assignment state of one task.
#[derive(Debug, Clone)]
pub struct Task {
    pub(crate) duration: i32,
    pub(crate) workload_per_time: f64,
    pub(crate) time: Option<usize>,
    pub(crate) domain: ResourceGroup,
    pub(crate) domain_fixed: bool,
    pub(crate) tasking: Option<String>,
    pub(crate) target: Option<TaskId>,
    pub(crate) target_fixed: bool,
    pub(crate) assigned_tasks: Vec<TaskId>,
    pub(crate) assigned_rs: Option<ResourceId>,
    pub(crate) event_resource: Option<EventResourceId>,
    pub(crate) cycle_resource: Option<ResourceId>,
    pub(crate) visit_num: u64,
    pub(crate) back: Option<usize>,
}

impl Task {
    pub(crate) fn from_new(new: NewTask, resource_count: usize) -> Self {
        Self {
            duration: new.duration,
            workload_per_time: new.workload_per_time,
            time: None,
            domain: new
                .domain
                .unwrap_or_else(|| ResourceGroup::full(resource_count)),
            domain_fixed: false,
            tasking: new.tasking,
            target: None,
            target_fixed: false,
            assigned_tasks: Vec::new(),
            assigned_rs: None,
            event_resource: new.event_resource,
            cycle_resource: None,
            visit_num: 0,
            back: None,
        }
    }

    /// The cycle task standing for resource `r`.
    pub(crate) fn cycle(r: ResourceId) -> Self {
        Self {
            duration: 0,
            workload_per_time: 0.0,
            time: None,
            domain: ResourceGroup::singleton(r),
            domain_fixed: true,
            tasking: None,
            target: None,
            target_fixed: false,
            assigned_tasks: Vec::new(),
            assigned_rs: Some(r),
            event_resource: None,
            cycle_resource: Some(r),
            visit_num: 0,
            back: None,
        }
    }

    pub fn duration(&self) -> i32 {
        self.duration
    }

    /// Workload of the whole task.
    pub fn workload(&self) -> f64 {
        self.duration as f64 * self.workload_per_time
    }

    /// Starting time, if one is assigned.
    pub fn time(&self) -> Option<usize> {
        self.time
    }

    pub fn domain(&self) -> &ResourceGroup {
        &self.domain
    }

    pub fn domain_fixed(&self) -> bool {
        self.domain_fixed
    }

    pub fn tasking(&self) -> Option<&str> {
        self.tasking.as_deref()
    }

    /// The task this one is assigned to.
    pub fn asst(&self) -> Option<TaskId> {
        self.target
    }

    /// Whether the assignment is fixed.
    pub fn is_fixed(&self) -> bool {
        self.target_fixed
    }

    /// The resource at the root of this task's assignment tree.
    pub fn asst_resource(&self) -> Option<ResourceId> {
        self.assigned_rs
    }

    pub fn event_resource(&self) -> Option<EventResourceId> {
        self.event_resource
    }

    pub fn is_cycle_task(&self) -> bool {
        self.cycle_resource.is_some()
    }

    /// Client bookkeeping slot.
    pub fn back(&self) -> Option<usize> {
        self.back
    }
}

impl Soln {
    /// The task with id `t`.
    ///
    /// # Panics
    /// If `t` has been deleted.
    pub fn task(&self, t: TaskId) -> &Task {
        match self.tasks.get(t.0).and_then(Option::as_ref) {
            Some(task) => task,
            None => panic!("task {t} has been deleted"),
        }
    }

    pub(crate) fn task_mut(&mut self, t: TaskId) -> &mut Task {
        match self.tasks.get_mut(t.0).and_then(Option::as_mut) {
            Some(task) => task,
            None => panic!("task {t} has been deleted"),
        }
    }

    /// Ids of the live tasks, cycle tasks first.
    pub fn task_ids(&self) -> impl Iterator<Item = TaskId> + '_ {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.is_some())
            .map(|(i, _)| TaskId(i))
    }

    /// The cycle task of resource `r`.
    pub fn cycle_task(&self, r: ResourceId) -> TaskId {
        TaskId(r.0)
    }

    /// Creates a task, unassigned and untimed.
    ///
    /// # Panics
    /// If the duration is not positive.
    #[instrument(level = "debug", skip(self))]
    pub fn make_task(&mut self, new: NewTask) -> TaskId {
        assert!(new.duration > 0, "make_task: duration must be positive");
        let task = Task::from_new(new, self.instance.resource_count());
        let er = task.event_resource;
        let id = match self.free_tasks.pop() {
            Some(id) => {
                self.tasks[id.0] = Some(task);
                id
            }
            None => {
                self.tasks.push(Some(task));
                TaskId(self.tasks.len() - 1)
            }
        };
        if let Some(er) = er {
            self.ers_add_task(er, id);
        }
        id
    }

    /// Deletes a task, first removing its time, its children and its own
    /// assignment.
    #[instrument(level = "debug", skip(self))]
    pub fn delete_task(&mut self, t: TaskId) -> Result<(), TaskError> {
        if self.task(t).is_cycle_task() {
            return Err(TaskError::CycleTask);
        }
        if self.task(t).time.is_some() {
            self.task_unassign_time(t)?;
        }
        while let Some(&child) = self.task(t).assigned_tasks.last() {
            let was_fixed = std::mem::replace(&mut self.task_mut(child).target_fixed, false);
            self.task_do_unassign(child);
            if was_fixed {
                self.task_fix_notify(child, ZeroCostTrigger::AssignUnfixed);
            }
        }
        if self.task(t).target.is_some() {
            self.task_mut(t).target_fixed = false;
            self.task_do_unassign(t);
        }
        if let Some(er) = self.task(t).event_resource {
            self.ers_delete_task(er, t);
        }
        self.tasks[t.0] = None;
        self.free_tasks.push(t);
        Ok(())
    }

    pub fn task_asst(&self, t: TaskId) -> Option<TaskId> {
        self.task(t).target
    }

    pub fn task_asst_resource(&self, t: TaskId) -> Option<ResourceId> {
        self.task(t).assigned_rs
    }

    /// Tasks assigned directly to `t`.
    pub fn task_assigned_to(&self, t: TaskId) -> &[TaskId] {
        &self.task(t).assigned_tasks
    }

    /// The root of `t`'s assignment tree.
    pub fn task_root(&self, t: TaskId) -> TaskId {
        let mut t = t;
        while let Some(target) = self.task(t).target {
            t = target;
        }
        t
    }

    /// Duration of `t` plus everything assigned to it, recursively.
    pub fn task_total_duration(&self, t: TaskId) -> i32 {
        let task = self.task(t);
        task.duration
            + task
                .assigned_tasks
                .iter()
                .map(|&c| self.task_total_duration(c))
                .sum::<i32>()
    }

    /// The first task, starting at `t` and following fixed assignments
    /// upward, whose own assignment is not fixed; `None` when the chain is
    /// fixed all the way to an unassigned root.
    pub fn task_first_unfixed(&self, t: TaskId) -> Option<TaskId> {
        let mut t = t;
        loop {
            let task = self.task(t);
            if !task.target_fixed {
                return Some(t);
            }
            t = task.target?;
        }
    }

    /// Whether `lower` lies in the assignment tree below `upper` (or is it).
    fn task_is_below(&self, lower: TaskId, upper: TaskId) -> bool {
        let mut t = Some(lower);
        while let Some(x) = t {
            if x == upper {
                return true;
            }
            t = self.task(x).target;
        }
        false
    }

    /// Whether `t` may be moved to `target` (`None` meaning unassigned).
    pub fn task_move_check(&self, t: TaskId, target: Option<TaskId>) -> Result<(), TaskError> {
        let task = self.task(t);
        if task.is_cycle_task() {
            return Err(TaskError::CycleTask);
        }
        if task.target_fixed {
            return Err(TaskError::Fixed);
        }
        if task.target == target {
            return Err(TaskError::NoChange);
        }
        if let Some(target) = target {
            if self.task_is_below(target, t) {
                return Err(TaskError::CyclicAssignment);
            }
            if !self.task(target).domain.is_subset(&task.domain) {
                return Err(TaskError::DomainMismatch);
            }
        }
        Ok(())
    }

    /// Moves `t` to `target`, unassigning it first if needed.
    #[instrument(level = "debug", skip(self))]
    pub fn task_move(&mut self, t: TaskId, target: Option<TaskId>) -> Result<(), TaskError> {
        self.task_move_check(t, target)?;
        if self.task(t).target.is_some() {
            self.task_do_unassign(t);
        }
        if let Some(target) = target {
            self.task_do_assign(t, target);
        }
        Ok(())
    }

    pub fn task_assign_check(&self, t: TaskId, target: TaskId) -> Result<(), TaskError> {
        if self.task(t).target.is_some() {
            return Err(TaskError::AlreadyAssigned);
        }
        self.task_move_check(t, Some(target))
    }

    /// Assigns the unassigned task `t` to `target`.
    #[instrument(level = "debug", skip(self))]
    pub fn task_assign(&mut self, t: TaskId, target: TaskId) -> Result<(), TaskError> {
        self.task_assign_check(t, target)?;
        self.task_do_assign(t, target);
        Ok(())
    }

    /// Assigns `t` to the cycle task of `r`.
    pub fn task_assign_resource(&mut self, t: TaskId, r: ResourceId) -> Result<(), TaskError> {
        self.task_assign(t, self.cycle_task(r))
    }

    pub fn task_unassign_check(&self, t: TaskId) -> Result<(), TaskError> {
        if self.task(t).target.is_none() {
            return Err(TaskError::NotAssigned);
        }
        self.task_move_check(t, None)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn task_unassign(&mut self, t: TaskId) -> Result<(), TaskError> {
        self.task_unassign_check(t)?;
        self.task_do_unassign(t);
        Ok(())
    }

    /// Whether `t1` and `t2` may exchange targets.
    pub fn task_swap_check(&self, t1: TaskId, t2: TaskId) -> Result<(), TaskError> {
        let target1 = self.task(t1).target;
        let target2 = self.task(t2).target;
        self.task_move_check(t1, target2)?;
        self.task_move_check(t2, target1)
    }

    /// Exchanges the targets of `t1` and `t2`.
    #[instrument(level = "debug", skip(self))]
    pub fn task_swap(&mut self, t1: TaskId, t2: TaskId) -> Result<(), TaskError> {
        self.task_swap_check(t1, t2)?;
        let target1 = self.task(t1).target;
        let target2 = self.task(t2).target;
        if target1.is_some() {
            self.task_do_unassign(t1);
        }
        if target2.is_some() {
            self.task_do_unassign(t2);
        }
        if let Some(target) = target2 {
            self.task_do_assign(t1, target);
        }
        if let Some(target) = target1 {
            self.task_do_assign(t2, target);
        }
        Ok(())
    }

    fn task_do_assign(&mut self, t: TaskId, target: TaskId) {
        self.task_mut(t).target = Some(target);
        self.task_mut(target).assigned_tasks.push(t);
        if let Some(r) = self.task(target).assigned_rs {
            self.task_do_assign_resource(t, r);
        }
    }

    fn task_do_assign_resource(&mut self, t: TaskId, r: ResourceId) {
        self.task_mut(t).assigned_rs = Some(r);
        self.rs_assign_resource(r, t);
        if let Some(er) = self.task(t).event_resource {
            self.ers_assign_resource(er, t, r);
        }
        for i in 0..self.task(t).assigned_tasks.len() {
            let child = self.task(t).assigned_tasks[i];
            self.task_do_assign_resource(child, r);
        }
    }

    fn task_do_unassign(&mut self, t: TaskId) {
        let target = match self.task(t).target {
            Some(target) => target,
            None => panic!("task_do_unassign: {t} is not assigned"),
        };
        if let Some(r) = self.task(t).assigned_rs {
            self.task_do_unassign_resource(t, r);
        }
        let siblings = &mut self.task_mut(target).assigned_tasks;
        match siblings.iter().rposition(|&x| x == t) {
            Some(pos) => {
                siblings.swap_remove(pos);
            }
            None => panic!("task_do_unassign: {t} missing from {target}"),
        }
        self.task_mut(t).target = None;
    }

    fn task_do_unassign_resource(&mut self, t: TaskId, r: ResourceId) {
        for i in 0..self.task(t).assigned_tasks.len() {
            let child = self.task(t).assigned_tasks[i];
            self.task_do_unassign_resource(child, r);
        }
        self.rs_unassign_resource(r, t);
        if let Some(er) = self.task(t).event_resource {
            self.ers_unassign_resource(er, t, r);
        }
        self.task_mut(t).assigned_rs = None;
    }

    /// Fixes the current assignment of `t`.
    #[instrument(level = "debug", skip(self))]
    pub fn task_assign_fix(&mut self, t: TaskId) -> Result<(), TaskError> {
        if self.task(t).is_cycle_task() {
            return Err(TaskError::CycleTask);
        }
        if !self.task(t).target_fixed {
            self.task_mut(t).target_fixed = true;
            self.task_fix_notify(t, ZeroCostTrigger::AssignFixed);
        }
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn task_assign_unfix(&mut self, t: TaskId) -> Result<(), TaskError> {
        if self.task(t).is_cycle_task() {
            return Err(TaskError::CycleTask);
        }
        if self.task(t).target_fixed {
            self.task_mut(t).target_fixed = false;
            self.task_fix_notify(t, ZeroCostTrigger::AssignUnfixed);
        }
        Ok(())
    }

    /// Tells the hubs of `t` and of every task fixed beneath it that the
    /// first unfixed ancestor may have moved.
    fn task_fix_notify(&mut self, t: TaskId, trigger: ZeroCostTrigger) {
        if let Some(er) = self.task(t).event_resource {
            self.ers_zero_cost_event(er, trigger);
        }
        for i in 0..self.task(t).assigned_tasks.len() {
            let child = self.task(t).assigned_tasks[i];
            if self.task(child).target_fixed {
                self.task_fix_notify(child, trigger);
            }
        }
    }

    pub fn task_split_check(&self, t: TaskId, durn1: i32) -> Result<(), TaskError> {
        let task = self.task(t);
        if task.is_cycle_task() {
            return Err(TaskError::CycleTask);
        }
        if durn1 <= 0 || durn1 >= task.duration {
            return Err(TaskError::BadSplit {
                durn1,
                duration: task.duration,
            });
        }
        Ok(())
    }

    /// Splits `t` after `durn1` times, returning the second half.
    ///
    /// The second half inherits everything `t` has; if `t` has a time it
    /// starts `durn1` times later.
    #[instrument(level = "debug", skip(self))]
    pub fn task_split(&mut self, t: TaskId, durn1: i32) -> Result<TaskId, TaskError> {
        self.task_split_check(t, durn1)?;
        let task2 = {
            let task1 = self.task_mut(t);
            let task2 = Task {
                duration: task1.duration - durn1,
                workload_per_time: task1.workload_per_time,
                time: task1.time.map(|time| time + durn1 as usize),
                domain: task1.domain.clone(),
                domain_fixed: task1.domain_fixed,
                tasking: task1.tasking.clone(),
                target: task1.target,
                target_fixed: task1.target_fixed,
                assigned_tasks: Vec::new(),
                assigned_rs: task1.assigned_rs,
                event_resource: task1.event_resource,
                cycle_resource: None,
                visit_num: 0,
                back: None,
            };
            task1.duration = durn1;
            task2
        };
        let (target, r, er) = (task2.target, task2.assigned_rs, task2.event_resource);
        let t2 = match self.free_tasks.pop() {
            Some(id) => {
                self.tasks[id.0] = Some(task2);
                id
            }
            None => {
                self.tasks.push(Some(task2));
                TaskId(self.tasks.len() - 1)
            }
        };
        if let Some(target) = target {
            self.task_mut(target).assigned_tasks.push(t2);
        }
        if let Some(r) = r {
            self.rs_split_task(r, t, t2);
        }
        if let Some(er) = er {
            self.ers_split_task(er, t, t2);
        }
        debug!(task = %t, split = %t2, durn1, "task split");
        Ok(t2)
    }

    /// Whether `t2` can be merged back into `t1`.
    pub fn task_merge_check(&self, t1: TaskId, t2: TaskId) -> Result<(), TaskError> {
        if t1 == t2 {
            return Err(TaskError::MergeMismatch("a task cannot merge with itself"));
        }
        let (a, b) = (self.task(t1), self.task(t2));
        if a.is_cycle_task() || b.is_cycle_task() {
            return Err(TaskError::CycleTask);
        }
        if a.tasking != b.tasking {
            return Err(TaskError::MergeMismatch("different taskings"));
        }
        if a.target != b.target {
            return Err(TaskError::MergeMismatch("different assignments"));
        }
        if a.assigned_rs != b.assigned_rs {
            return Err(TaskError::MergeMismatch("different resources"));
        }
        if a.event_resource != b.event_resource {
            return Err(TaskError::MergeMismatch("different event resources"));
        }
        if a.domain != b.domain {
            return Err(TaskError::MergeMismatch("different domains"));
        }
        if a.target_fixed != b.target_fixed {
            return Err(TaskError::MergeMismatch("different assignment fixing"));
        }
        if a.domain_fixed != b.domain_fixed {
            return Err(TaskError::MergeMismatch("different domain fixing"));
        }
        match (a.time, b.time) {
            (None, None) => {}
            (Some(ta), Some(tb)) if ta + a.duration as usize == tb => {}
            _ => return Err(TaskError::MergeMismatch("not adjacent in time")),
        }
        Ok(())
    }

    /// Merges `t2` into `t1`; `t2` is deleted and its children move to `t1`.
    #[instrument(level = "debug", skip(self))]
    pub fn task_merge(&mut self, t1: TaskId, t2: TaskId) -> Result<(), TaskError> {
        self.task_merge_check(t1, t2)?;
        let (target, r, er) = {
            let task2 = self.task(t2);
            (task2.target, task2.assigned_rs, task2.event_resource)
        };
        if let Some(r) = r {
            self.rs_merge_task(r, t1, t2);
        }
        if let Some(er) = er {
            self.ers_merge_task(er, t1, t2);
        }

        let children = std::mem::take(&mut self.task_mut(t2).assigned_tasks);
        for &child in &children {
            self.task_mut(child).target = Some(t1);
        }
        self.task_mut(t1).assigned_tasks.extend(children);
        if let Some(target) = target {
            let siblings = &mut self.task_mut(target).assigned_tasks;
            if let Some(pos) = siblings.iter().rposition(|&x| x == t2) {
                siblings.swap_remove(pos);
            }
        }
        let durn2 = self.task(t2).duration;
        self.task_mut(t1).duration += durn2;
        self.tasks[t2.0] = None;
        self.free_tasks.push(t2);
        debug!(task = %t1, merged = %t2, "tasks merged");
        Ok(())
    }

    pub fn task_assign_time_check(&self, t: TaskId, time: usize) -> Result<(), TaskError> {
        let task = self.task(t);
        if task.is_cycle_task() {
            return Err(TaskError::CycleTask);
        }
        if task.time.is_some() {
            return Err(TaskError::TimeAssigned);
        }
        let time_count = self.instance.time_count();
        if time + task.duration as usize > time_count {
            return Err(TaskError::TimeOutOfRange {
                time,
                duration: task.duration,
                time_count,
            });
        }
        Ok(())
    }

    /// Starts `t` at `time`.
    #[instrument(level = "debug", skip(self))]
    pub fn task_assign_time(&mut self, t: TaskId, time: usize) -> Result<(), TaskError> {
        self.task_assign_time_check(t, time)?;
        self.task_mut(t).time = Some(time);
        if let Some(r) = self.task(t).assigned_rs {
            self.rs_assign_time(r, t, time);
        }
        Ok(())
    }

    pub fn task_unassign_time_check(&self, t: TaskId) -> Result<(), TaskError> {
        let task = self.task(t);
        if task.is_cycle_task() {
            return Err(TaskError::CycleTask);
        }
        if task.time.is_none() {
            return Err(TaskError::TimeUnassigned);
        }
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn task_unassign_time(&mut self, t: TaskId) -> Result<(), TaskError> {
        self.task_unassign_time_check(t)?;
        let (time, r) = {
            let task = self.task(t);
            (task.time, task.assigned_rs)
        };
        if let (Some(time), Some(r)) = (time, r) {
            self.rs_unassign_time(r, t, time);
        }
        self.task_mut(t).time = None;
        Ok(())
    }

    pub fn task_set_domain_check(&self, t: TaskId, domain: &ResourceGroup) -> Result<(), TaskError> {
        let task = self.task(t);
        if task.is_cycle_task() {
            return Err(TaskError::CycleTask);
        }
        if task.domain_fixed {
            return Err(TaskError::DomainFixed);
        }
        if let Some(target) = task.target {
            if !self.task(target).domain.is_subset(domain) {
                return Err(TaskError::DomainMismatch);
            }
        }
        if task
            .assigned_tasks
            .iter()
            .any(|&c| !domain.is_subset(&self.task(c).domain))
        {
            return Err(TaskError::DomainMismatch);
        }
        Ok(())
    }

    /// Replaces the domain of `t`.
    #[instrument(level = "debug", skip(self, domain))]
    pub fn task_set_domain(&mut self, t: TaskId, domain: ResourceGroup) -> Result<(), TaskError> {
        self.task_set_domain_check(t, &domain)?;
        self.task_mut(t).domain = domain;
        if let Some(er) = self.task(t).event_resource {
            self.ers_zero_cost_event(er, ZeroCostTrigger::DomainChanged);
        }
        Ok(())
    }

    /// Forbids further domain changes to `t`.
    #[instrument(level = "debug", skip(self))]
    pub fn task_domain_fix(&mut self, t: TaskId) -> Result<(), TaskError> {
        if self.task(t).is_cycle_task() {
            return Err(TaskError::CycleTask);
        }
        if !self.task(t).domain_fixed {
            self.task_mut(t).domain_fixed = true;
            if let Some(er) = self.task(t).event_resource {
                self.ers_zero_cost_event(er, ZeroCostTrigger::DomainFixed);
            }
        }
        Ok(())
    }

    #[instrument(level = "debug", skip(self))]
    pub fn task_domain_unfix(&mut self, t: TaskId) -> Result<(), TaskError> {
        if self.task(t).is_cycle_task() {
            return Err(TaskError::CycleTask);
        }
        if self.task(t).domain_fixed {
            self.task_mut(t).domain_fixed = false;
            if let Some(er) = self.task(t).event_resource {
                self.ers_zero_cost_event(er, ZeroCostTrigger::DomainUnfixed);
            }
        }
        Ok(())
    }

    pub fn set_task_back(&mut self, t: TaskId, back: Option<usize>) {
        self.task_mut(t).back = back;
    }

    pub fn task_visit(&mut self, t: TaskId, ctx: &VisitContext) {
        self.task_mut(t).visit_num = ctx.visited_stamp();
    }

    pub fn task_unvisit(&mut self, t: TaskId, ctx: &VisitContext) {
        self.task_mut(t).visit_num = ctx.unvisited_stamp();
    }

    pub fn task_visited(&self, t: TaskId, ctx: &VisitContext, slack: u64) -> bool {
        ctx.is_visited(self.task(t).visit_num, slack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{assign_resource_soln, mixed_soln, prefer_soln, SampleSoln};
    use proptest::prelude::*;

    fn monitor_costs(soln: &Soln) -> Vec<i64> {
        soln.monitor_ids().map(|m| soln.monitor(m).cost()).collect()
    }

    #[test]
    fn test_assign_and_unassign() {
        let SampleSoln {
            mut soln, tasks, ..
        } = assign_resource_soln(&[Some(2)]);
        let r = ResourceId(0);
        assert_eq!(soln.cost(), 2);
        soln.task_assign_resource(tasks[0], r).unwrap();
        assert_eq!(soln.task_asst_resource(tasks[0]), Some(r));
        assert_eq!(soln.task_root(tasks[0]), soln.cycle_task(r));
        assert_eq!(soln.cost(), 0);
        assert_eq!(
            soln.task_assign_resource(tasks[0], r),
            Err(TaskError::AlreadyAssigned)
        );
        soln.task_unassign(tasks[0]).unwrap();
        assert_eq!(soln.task_unassign(tasks[0]), Err(TaskError::NotAssigned));
        assert_eq!(soln.cost(), 2);
    }

    #[test]
    fn test_move_checks() {
        let SampleSoln {
            mut soln, tasks, ..
        } = assign_resource_soln(&[Some(1), Some(1)]);
        let (a, b) = (tasks[0], tasks[1]);
        let cycle = soln.cycle_task(ResourceId(0));
        assert_eq!(soln.task_move_check(cycle, None), Err(TaskError::CycleTask));
        assert_eq!(soln.task_move_check(a, None), Err(TaskError::NoChange));
        assert_eq!(soln.task_move_check(a, Some(a)), Err(TaskError::CyclicAssignment));

        soln.task_assign(b, a).unwrap();
        assert_eq!(soln.task_assign(a, b), Err(TaskError::CyclicAssignment));
        assert_eq!(soln.task_total_duration(a), 2);

        soln.task_assign_fix(b).unwrap();
        assert_eq!(soln.task_unassign(b), Err(TaskError::Fixed));
        assert_eq!(soln.task_first_unfixed(b), Some(a));
        soln.task_assign_unfix(b).unwrap();
        assert_eq!(soln.task_first_unfixed(b), Some(b));
    }

    #[test]
    fn test_children_follow_resource() {
        let SampleSoln {
            mut soln, tasks, ..
        } = assign_resource_soln(&[Some(2), Some(3)]);
        let (a, b) = (tasks[0], tasks[1]);
        soln.task_assign(b, a).unwrap();
        assert_eq!(soln.cost(), 5);
        soln.task_assign_resource(a, ResourceId(1)).unwrap();
        assert_eq!(soln.task_asst_resource(b), Some(ResourceId(1)));
        assert_eq!(soln.cost(), 0);

        soln.task_move(a, Some(soln.cycle_task(ResourceId(0)))).unwrap();
        assert_eq!(soln.task_asst_resource(b), Some(ResourceId(0)));
        assert_eq!(soln.resource_assigned_tasks(ResourceId(1)).len(), 0);
        soln.task_unassign(a).unwrap();
        assert_eq!(soln.task_asst_resource(b), None);
        assert_eq!(soln.cost(), 5);
    }

    #[test]
    fn test_swap() {
        let SampleSoln {
            mut soln, tasks, ..
        } = assign_resource_soln(&[Some(1), Some(1)]);
        let (r0, r1) = (ResourceId(0), ResourceId(1));
        soln.task_assign_resource(tasks[0], r0).unwrap();
        soln.task_assign_resource(tasks[1], r1).unwrap();
        soln.task_swap(tasks[0], tasks[1]).unwrap();
        assert_eq!(soln.task_asst_resource(tasks[0]), Some(r1));
        assert_eq!(soln.task_asst_resource(tasks[1]), Some(r0));
    }

    #[test]
    fn test_domain_mismatch() {
        let mut soln = prefer_soln();
        let t = soln.make_task(NewTask::new(1).with_domain(ResourceGroup::singleton(ResourceId(0))));
        assert_eq!(
            soln.task_assign_resource(t, ResourceId(1)),
            Err(TaskError::DomainMismatch)
        );
        soln.task_domain_fix(t).unwrap();
        assert_eq!(
            soln.task_set_domain(t, ResourceGroup::full(2)),
            Err(TaskError::DomainFixed)
        );
    }

    #[test]
    fn test_time_checks() {
        let SampleSoln {
            mut soln, tasks, ..
        } = assign_resource_soln(&[Some(3)]);
        let time_count = soln.instance().time_count();
        assert_eq!(
            soln.task_assign_time(tasks[0], time_count - 2),
            Err(TaskError::TimeOutOfRange {
                time: time_count - 2,
                duration: 3,
                time_count,
            })
        );
        soln.task_assign_time(tasks[0], 0).unwrap();
        assert_eq!(soln.task_assign_time(tasks[0], 1), Err(TaskError::TimeAssigned));
        soln.task_unassign_time(tasks[0]).unwrap();
        assert_eq!(soln.task_unassign_time(tasks[0]), Err(TaskError::TimeUnassigned));
    }

    #[test]
    fn test_split_and_merge_checks() {
        let SampleSoln {
            mut soln, tasks, ..
        } = assign_resource_soln(&[Some(4)]);
        let t = tasks[0];
        assert_eq!(
            soln.task_split(t, 4),
            Err(TaskError::BadSplit {
                durn1: 4,
                duration: 4
            })
        );
        soln.task_assign_time(t, 0).unwrap();
        let t2 = soln.task_split(t, 1).unwrap();
        assert_eq!(soln.task(t2).time(), Some(1));
        assert_eq!(soln.task(t2).duration(), 3);
        assert_eq!(soln.cost(), 4);

        soln.task_unassign_time(t2).unwrap();
        assert_eq!(
            soln.task_merge(t, t2),
            Err(TaskError::MergeMismatch("not adjacent in time"))
        );
        soln.task_assign_time(t2, 1).unwrap();
        soln.task_domain_fix(t2).unwrap();
        assert_eq!(
            soln.task_merge(t, t2),
            Err(TaskError::MergeMismatch("different domain fixing"))
        );
        soln.task_domain_unfix(t2).unwrap();

        soln.task_assign_resource(t, ResourceId(0)).unwrap();
        soln.task_assign_resource(t2, ResourceId(0)).unwrap();
        soln.task_assign_fix(t2).unwrap();
        assert_eq!(
            soln.task_merge(t, t2),
            Err(TaskError::MergeMismatch("different assignment fixing"))
        );
        soln.task_assign_fix(t).unwrap();
        soln.task_merge(t, t2).unwrap();
        assert!(soln.task(t).is_fixed());
        assert_eq!(soln.task(t).duration(), 4);
        assert_eq!(soln.cost(), 0);
    }

    #[test]
    fn test_visit_stamps() {
        let SampleSoln {
            mut soln, tasks, ..
        } = assign_resource_soln(&[Some(1)]);
        let mut ctx = VisitContext::new();
        assert!(!soln.task_visited(tasks[0], &ctx, 0));
        soln.task_visit(tasks[0], &ctx);
        assert!(soln.task_visited(tasks[0], &ctx, 0));
        ctx.next_pass();
        assert!(!soln.task_visited(tasks[0], &ctx, 0));
        assert!(soln.task_visited(tasks[0], &ctx, 1));
    }

    #[test]
    fn test_delete_task() {
        let SampleSoln {
            mut soln, tasks, ..
        } = assign_resource_soln(&[Some(2), Some(3)]);
        soln.task_assign(tasks[1], tasks[0]).unwrap();
        soln.delete_task(tasks[0]).unwrap();
        assert_eq!(soln.cost(), 3);
        assert_eq!(soln.task_asst(tasks[1]), None);
    }

    proptest! {
        #[test]
        fn prop_assign_unassign_restores_costs(
            task_index in 0usize..6,
            resource_index in 0usize..3,
        ) {
            let SampleSoln { mut soln, tasks, .. } = mixed_soln();
            let t = tasks[task_index];
            let before = monitor_costs(&soln);
            let cost = soln.cost();
            if soln.task_assign_resource(t, ResourceId(resource_index)).is_ok() {
                soln.task_unassign(t).unwrap();
            }
            prop_assert_eq!(soln.task_asst(t), None);
            prop_assert_eq!(monitor_costs(&soln), before);
            prop_assert_eq!(soln.cost(), cost);
        }

        #[test]
        fn prop_split_merge_restores_costs(task_index in 0usize..6, durn1 in 1i32..4) {
            let SampleSoln { mut soln, tasks, .. } = mixed_soln();
            let t = tasks[task_index];
            let before = monitor_costs(&soln);
            let cost = soln.cost();
            let duration = soln.task(t).duration();
            if let Ok(t2) = soln.task_split(t, durn1) {
                soln.task_merge(t, t2).unwrap();
            }
            prop_assert_eq!(soln.task(t).duration(), duration);
            prop_assert_eq!(monitor_costs(&soln), before);
            prop_assert_eq!(soln.cost(), cost);
        }

        #[test]
        fn prop_detach_attach_restores_cost(monitor_index in 0usize..64) {
            let SampleSoln { mut soln, monitors, .. } = mixed_soln();
            let m = monitors[monitor_index % monitors.len()];
            let cost = soln.cost();
            let own = soln.monitor(m).cost();
            soln.detach_monitor(m);
            prop_assert_eq!(soln.monitor(m).cost(), 0);
            prop_assert_eq!(soln.cost(), cost - own);
            soln.attach_monitor(m);
            prop_assert_eq!(soln.monitor(m).cost(), own);
            prop_assert_eq!(soln.cost(), cost);
        }
    }
}
