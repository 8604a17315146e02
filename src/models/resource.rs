//! Resource model.
//!
//! Resources are the entities tasks are assigned to: teachers, rooms,
//! classes, equipment. A resource group is an ordered set of resources
//! used as a task domain or as the allowed set of a prefer-resources
//! constraint.
//!
//! # Reference
//! Kingston (2012), "A software library for school timetabling research"

use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a resource within its instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceId(pub usize);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// A resource that tasks can be assigned to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    /// Unique resource identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Total duration of events this resource is preassigned to.
    pub preassigned_duration: i32,
    /// Total workload of events this resource is preassigned to.
    pub preassigned_workload: f64,
}

impl Resource {
    /// Creates a new resource with no preassignments.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            preassigned_duration: 0,
            preassigned_workload: 0.0,
        }
    }

    /// Sets the resource name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the preassigned duration and workload.
    pub fn with_preassigned(mut self, duration: i32, workload: f64) -> Self {
        self.preassigned_duration = duration;
        self.preassigned_workload = workload;
        self
    }
}

/// A set of resources, kept sorted and free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceGroup {
    resources: Vec<ResourceId>,
}

impl ResourceGroup {
    /// Creates a group from any collection of resources.
    pub fn new(resources: impl IntoIterator<Item = ResourceId>) -> Self {
        let mut resources: Vec<ResourceId> = resources.into_iter().collect();
        resources.sort_unstable();
        resources.dedup();
        Self { resources }
    }

    /// The group holding exactly one resource.
    pub fn singleton(r: ResourceId) -> Self {
        Self { resources: vec![r] }
    }

    /// The group holding resources `0..count`.
    pub fn full(count: usize) -> Self {
        Self {
            resources: (0..count).map(ResourceId).collect(),
        }
    }

    /// Whether `r` is in this group.
    pub fn contains(&self, r: ResourceId) -> bool {
        self.resources.binary_search(&r).is_ok()
    }

    /// Whether every resource of `self` is also in `other`.
    pub fn is_subset(&self, other: &ResourceGroup) -> bool {
        let mut theirs = other.resources.iter().peekable();
        for r in &self.resources {
            loop {
                match theirs.peek() {
                    Some(o) if *o < r => {
                        theirs.next();
                    }
                    Some(o) if *o == r => break,
                    _ => return false,
                }
            }
        }
        true
    }

    /// Number of resources.
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether the group is empty.
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Resources in increasing index order.
    pub fn iter(&self) -> impl Iterator<Item = ResourceId> + '_ {
        self.resources.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_builder() {
        let r = Resource::new("T1")
            .with_name("Teacher 1")
            .with_preassigned(12, 3.5);

        assert_eq!(r.id, "T1");
        assert_eq!(r.name, "Teacher 1");
        assert_eq!(r.preassigned_duration, 12);
        assert!((r.preassigned_workload - 3.5).abs() < 1e-10);
    }

    #[test]
    fn test_group_normalizes() {
        let g = ResourceGroup::new([ResourceId(3), ResourceId(1), ResourceId(3)]);
        assert_eq!(g.len(), 2);
        assert_eq!(g.iter().collect::<Vec<_>>(), vec![ResourceId(1), ResourceId(3)]);
        assert!(g.contains(ResourceId(3)));
        assert!(!g.contains(ResourceId(2)));
    }

    #[test]
    fn test_group_subset() {
        let small = ResourceGroup::new([ResourceId(1), ResourceId(4)]);
        let big = ResourceGroup::full(5);
        assert!(small.is_subset(&big));
        assert!(!big.is_subset(&small));
        assert!(ResourceGroup::default().is_subset(&small));
        assert!(!ResourceGroup::singleton(ResourceId(2)).is_subset(&small));
    }
}
