//! Timetabling instance.
//!
//! The instance is the read-only input a solution is built for: the times,
//! resources, time groups, event resources and constraints. Monitors consult
//! it for durations, domains and constraint weights but never modify it.

use serde::{Deserialize, Serialize};

use super::cost::Cost;
use super::{
    Constraint, ConstraintId, ConstraintKind, EventResource, EventResourceId, Resource,
    ResourceId, TimeGroup, TimeGroupId,
};

/// A timetabling problem instance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Instance {
    /// Instance name.
    pub name: String,
    /// Names of the times, indexed by time.
    pub times: Vec<String>,
    /// Resources, indexed by [`ResourceId`].
    pub resources: Vec<Resource>,
    /// Time groups, indexed by [`TimeGroupId`].
    pub time_groups: Vec<TimeGroup>,
    /// Event resources, indexed by [`EventResourceId`].
    pub event_resources: Vec<EventResource>,
    /// Constraints, indexed by [`ConstraintId`].
    pub constraints: Vec<Constraint>,
}

impl Instance {
    /// Creates an instance with `time_count` times named `T0`, `T1`, ...
    pub fn new(name: impl Into<String>, time_count: usize) -> Self {
        Self {
            name: name.into(),
            times: (0..time_count).map(|t| format!("T{t}")).collect(),
            ..Self::default()
        }
    }

    /// Replaces the time names (and therefore the time count).
    pub fn with_times(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.times = names.into_iter().map(Into::into).collect();
        self
    }

    /// Adds a resource.
    pub fn with_resource(mut self, resource: Resource) -> Self {
        self.resources.push(resource);
        self
    }

    /// Adds a time group.
    pub fn with_time_group(mut self, time_group: TimeGroup) -> Self {
        self.time_groups.push(time_group);
        self
    }

    /// Adds an event resource.
    pub fn with_event_resource(mut self, event_resource: EventResource) -> Self {
        self.event_resources.push(event_resource);
        self
    }

    /// Adds a constraint.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Number of times.
    pub fn time_count(&self) -> usize {
        self.times.len()
    }

    /// Name of time `t`.
    pub fn time_name(&self, t: usize) -> &str {
        &self.times[t]
    }

    /// Number of resources.
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    /// The resource with index `r`.
    pub fn resource(&self, r: ResourceId) -> &Resource {
        &self.resources[r.0]
    }

    /// Looks a resource up by its identifier.
    pub fn resource_id(&self, id: &str) -> Option<ResourceId> {
        self.resources.iter().position(|r| r.id == id).map(ResourceId)
    }

    /// Number of event resources.
    pub fn event_resource_count(&self) -> usize {
        self.event_resources.len()
    }

    /// The event resource with index `er`.
    pub fn event_resource(&self, er: EventResourceId) -> &EventResource {
        &self.event_resources[er.0]
    }

    /// The time group with index `tg`.
    pub fn time_group(&self, tg: TimeGroupId) -> &TimeGroup {
        &self.time_groups[tg.0]
    }

    /// The constraint with index `c`.
    pub fn constraint(&self, c: ConstraintId) -> &Constraint {
        &self.constraints[c.0]
    }

    /// Constraint ids in declaration order.
    pub fn constraint_ids(&self) -> impl Iterator<Item = ConstraintId> {
        (0..self.constraints.len()).map(ConstraintId)
    }

    /// Largest combined weight of an avoid-clashes constraint applying to `r`.
    pub fn avoid_clashes_weight(&self, r: ResourceId) -> Option<Cost> {
        self.constraints
            .iter()
            .filter(|c| matches!(c.kind, ConstraintKind::AvoidClashes { .. }))
            .filter(|c| c.resources().contains(&r))
            .map(Constraint::combined_weight)
            .max()
    }
}
