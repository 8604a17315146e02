//! Timetabling constraints and cost functions.
//!
//! Each constraint names its points of application (event resources,
//! groups of event resources, or resources); the solution builds one
//! monitor per point. A constraint turns an integer deviation into a cost
//! through its weight and cost function.
//!
//! # Reference
//! Post et al. (2014), "XHSTT: an XML archive for high school timetabling
//! problems in different countries", Annals of Operations Research 218

use serde::{Deserialize, Serialize};

use super::cost::{cost, Cost};
use super::{EventResourceId, ResourceGroup, ResourceId, TimeGroupId};

/// Index of a constraint within its instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ConstraintId(pub usize);

/// Shape of the mapping from deviation to cost.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostFunction {
    /// Weight if there is any deviation at all.
    Step,
    /// Weight times deviation.
    #[default]
    Linear,
    /// Weight times deviation squared.
    Quadratic,
}

impl CostFunction {
    /// Applies the function to a non-negative deviation.
    pub fn apply(self, combined_weight: Cost, deviation: i32) -> Cost {
        let dev = deviation as Cost;
        match self {
            CostFunction::Step => {
                if dev > 0 {
                    combined_weight
                } else {
                    0
                }
            }
            CostFunction::Linear => combined_weight * dev,
            CostFunction::Quadratic => combined_weight * dev * dev,
        }
    }
}

/// A weighted constraint with its points of application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constraint {
    /// Unique constraint identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Hard constraints weigh in the hard part of the cost.
    pub required: bool,
    /// Weight per unit of cost function output.
    pub weight: i32,
    /// Deviation to cost shape.
    pub cost_function: CostFunction,
    /// Family and points of application.
    pub kind: ConstraintKind,
}

/// Constraint families, each carrying its points of application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ConstraintKind {
    /// Every task of each event resource should be assigned a resource.
    AssignResource {
        event_resources: Vec<EventResourceId>,
    },

    /// Tasks of each event resource should be assigned resources from `domain`.
    PreferResources {
        event_resources: Vec<EventResourceId>,
        domain: ResourceGroup,
    },

    /// All tasks of each group of event resources should share one resource.
    AvoidSplitAssignments {
        event_groups: Vec<Vec<EventResourceId>>,
    },

    /// Each resource should attend at most one task at any time.
    AvoidClashes { resources: Vec<ResourceId> },

    /// Each resource should be free during `times`.
    AvoidUnavailableTimes {
        resources: Vec<ResourceId>,
        times: TimeGroupId,
    },

    /// Total idle times over `time_groups` should lie in `[minimum, maximum]`.
    LimitIdleTimes {
        resources: Vec<ResourceId>,
        time_groups: Vec<TimeGroupId>,
        minimum: i32,
        maximum: i32,
    },

    /// Busy times in each of `time_groups` should lie in `[minimum, maximum]`.
    ///
    /// A time group with no busy times is never defective.
    LimitBusyTimes {
        resources: Vec<ResourceId>,
        time_groups: Vec<TimeGroupId>,
        minimum: i32,
        maximum: i32,
    },

    /// Total workload should lie in `[minimum, maximum]`.
    LimitWorkload {
        resources: Vec<ResourceId>,
        minimum: i32,
        maximum: i32,
    },
}

impl Constraint {
    /// Creates a soft, linear, weight-1 constraint.
    pub fn new(id: impl Into<String>, kind: ConstraintKind) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            required: false,
            weight: 1,
            cost_function: CostFunction::Linear,
            kind,
        }
    }

    /// Sets the constraint name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Makes the constraint hard.
    pub fn hard(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the weight.
    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    /// Sets the cost function.
    pub fn with_cost_function(mut self, cost_function: CostFunction) -> Self {
        self.cost_function = cost_function;
        self
    }

    /// Weight placed in the hard or soft part of a cost.
    pub fn combined_weight(&self) -> Cost {
        if self.required {
            cost(self.weight, 0)
        } else {
            cost(0, self.weight)
        }
    }

    /// Cost of a deviation under this constraint.
    pub fn cost(&self, deviation: i32) -> Cost {
        debug_assert!(deviation >= 0, "negative deviation {deviation}");
        self.cost_function.apply(self.combined_weight(), deviation)
    }

    /// Number of monitors this constraint gives rise to.
    pub fn point_of_application_count(&self) -> usize {
        match &self.kind {
            ConstraintKind::AssignResource { event_resources }
            | ConstraintKind::PreferResources {
                event_resources, ..
            } => event_resources.len(),
            ConstraintKind::AvoidSplitAssignments { event_groups } => event_groups.len(),
            ConstraintKind::AvoidClashes { resources }
            | ConstraintKind::AvoidUnavailableTimes { resources, .. }
            | ConstraintKind::LimitIdleTimes { resources, .. }
            | ConstraintKind::LimitBusyTimes { resources, .. }
            | ConstraintKind::LimitWorkload { resources, .. } => resources.len(),
        }
    }

    /// Resources this constraint applies to; empty for event-resource families.
    pub fn resources(&self) -> &[ResourceId] {
        match &self.kind {
            ConstraintKind::AvoidClashes { resources }
            | ConstraintKind::AvoidUnavailableTimes { resources, .. }
            | ConstraintKind::LimitIdleTimes { resources, .. }
            | ConstraintKind::LimitBusyTimes { resources, .. }
            | ConstraintKind::LimitWorkload { resources, .. } => resources,
            ConstraintKind::AssignResource { .. }
            | ConstraintKind::PreferResources { .. }
            | ConstraintKind::AvoidSplitAssignments { .. } => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cost::{hard_cost, soft_cost};

    #[test]
    fn test_cost_functions() {
        assert_eq!(CostFunction::Step.apply(10, 0), 0);
        assert_eq!(CostFunction::Step.apply(10, 7), 10);
        assert_eq!(CostFunction::Linear.apply(10, 3), 30);
        assert_eq!(CostFunction::Quadratic.apply(10, 3), 90);
    }

    #[test]
    fn test_combined_weight() {
        let soft = Constraint::new("c1", ConstraintKind::AvoidClashes { resources: vec![] })
            .with_weight(5);
        assert_eq!(soft.combined_weight(), 5);
        assert_eq!(soft.cost(2), 10);

        let hard = soft.clone().hard();
        assert_eq!(hard_cost(hard.cost(2)), 10);
        assert_eq!(soft_cost(hard.cost(2)), 0);
    }

    #[test]
    fn test_points_of_application() {
        let c = Constraint::new(
            "split",
            ConstraintKind::AvoidSplitAssignments {
                event_groups: vec![
                    vec![EventResourceId(0), EventResourceId(1)],
                    vec![EventResourceId(2)],
                ],
            },
        );
        assert_eq!(c.point_of_application_count(), 2);
        assert!(c.resources().is_empty());
    }
}
