//! Input validation for timetabling instances.
//!
//! Checks structural integrity of an instance before a solution is built
//! on it. Detects:
//! - Duplicate IDs
//! - Dangling resource, time group and event resource references
//! - Times outside the instance
//! - Inverted limits
//!
//! Monitors index straight into the instance, so these checks are what
//! keeps a bad input from surfacing later as an out-of-bounds panic deep
//! inside an assignment.

use std::collections::HashSet;

use thiserror::Error;

use crate::models::{ConstraintKind, EventResourceId, Instance, ResourceId, TimeGroupId};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A constraint references a resource that doesn't exist.
    InvalidResourceReference,
    /// A constraint references a time group that doesn't exist.
    InvalidTimeGroupReference,
    /// A constraint references an event resource that doesn't exist.
    InvalidEventResourceReference,
    /// A time group holds a time the instance does not have.
    TimeOutOfRange,
    /// A limit constraint has `minimum > maximum` or a negative bound.
    InvalidLimits,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates a timetabling instance.
///
/// Checks:
/// 1. No duplicate resource, time group, event resource or constraint IDs
/// 2. Every time group lies inside `0..time_count`
/// 3. Every constraint reference points to an existing entity
/// 4. Every limit constraint has `0 <= minimum <= maximum`
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_instance(instance: &Instance) -> ValidationResult {
    let mut errors = Vec::new();

    check_unique(
        "resource",
        instance.resources.iter().map(|r| r.id.as_str()),
        &mut errors,
    );
    check_unique(
        "time group",
        instance.time_groups.iter().map(|tg| tg.id.as_str()),
        &mut errors,
    );
    check_unique(
        "event resource",
        instance.event_resources.iter().map(|er| er.id.as_str()),
        &mut errors,
    );
    check_unique(
        "constraint",
        instance.constraints.iter().map(|c| c.id.as_str()),
        &mut errors,
    );

    for tg in &instance.time_groups {
        if let Some(&t) = tg.times().last() {
            if t >= instance.time_count() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::TimeOutOfRange,
                    format!(
                        "Time group '{}' holds time {} but the instance has {} times",
                        tg.id,
                        t,
                        instance.time_count()
                    ),
                ));
            }
        }
    }

    for c in &instance.constraints {
        let refs = References::of(&c.kind);
        for r in refs.resources {
            if r.0 >= instance.resource_count() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidResourceReference,
                    format!("Constraint '{}' references unknown resource {}", c.id, r),
                ));
            }
        }
        for r in refs.domain {
            if r.0 >= instance.resource_count() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidResourceReference,
                    format!(
                        "Constraint '{}' prefers unknown resource {}",
                        c.id, r
                    ),
                ));
            }
        }
        for tg in refs.time_groups {
            if tg.0 >= instance.time_groups.len() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidTimeGroupReference,
                    format!(
                        "Constraint '{}' references unknown time group {}",
                        c.id, tg.0
                    ),
                ));
            }
        }
        for er in refs.event_resources {
            if er.0 >= instance.event_resource_count() {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidEventResourceReference,
                    format!(
                        "Constraint '{}' references unknown event resource {}",
                        c.id, er.0
                    ),
                ));
            }
        }
        if let Some((minimum, maximum)) = refs.limits {
            if minimum < 0 || minimum > maximum {
                errors.push(ValidationError::new(
                    ValidationErrorKind::InvalidLimits,
                    format!(
                        "Constraint '{}' has limits [{}, {}]",
                        c.id, minimum, maximum
                    ),
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_unique<'a>(
    what: &str,
    ids: impl Iterator<Item = &'a str>,
    errors: &mut Vec<ValidationError>,
) {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate {what} ID: {id}"),
            ));
        }
    }
}

/// Everything a constraint points at, flattened for checking.
struct References<'a> {
    resources: &'a [ResourceId],
    domain: Vec<ResourceId>,
    time_groups: Vec<TimeGroupId>,
    event_resources: Vec<EventResourceId>,
    limits: Option<(i32, i32)>,
}

impl<'a> References<'a> {
    fn of(kind: &'a ConstraintKind) -> Self {
        let mut refs = References {
            resources: &[],
            domain: Vec::new(),
            time_groups: Vec::new(),
            event_resources: Vec::new(),
            limits: None,
        };
        match kind {
            ConstraintKind::AssignResource { event_resources } => {
                refs.event_resources = event_resources.clone();
            }
            ConstraintKind::PreferResources {
                event_resources,
                domain,
            } => {
                refs.event_resources = event_resources.clone();
                refs.domain = domain.iter().collect();
            }
            ConstraintKind::AvoidSplitAssignments { event_groups } => {
                refs.event_resources = event_groups.iter().flatten().copied().collect();
            }
            ConstraintKind::AvoidClashes { resources } => {
                refs.resources = resources;
            }
            ConstraintKind::AvoidUnavailableTimes { resources, times } => {
                refs.resources = resources;
                refs.time_groups = vec![*times];
            }
            ConstraintKind::LimitIdleTimes {
                resources,
                time_groups,
                minimum,
                maximum,
            }
            | ConstraintKind::LimitBusyTimes {
                resources,
                time_groups,
                minimum,
                maximum,
            } => {
                refs.resources = resources;
                refs.time_groups = time_groups.clone();
                refs.limits = Some((*minimum, *maximum));
            }
            ConstraintKind::LimitWorkload {
                resources,
                minimum,
                maximum,
            } => {
                refs.resources = resources;
                refs.limits = Some((*minimum, *maximum));
            }
        }
        refs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Constraint, EventResource, Resource, ResourceGroup, TimeGroup};

    fn sample_instance() -> Instance {
        Instance::new("school", 10)
            .with_resource(Resource::new("T1").with_name("Teacher 1"))
            .with_resource(Resource::new("T2").with_name("Teacher 2"))
            .with_time_group(TimeGroup::new("Mon", 0..5))
            .with_time_group(TimeGroup::new("Tue", 5..10))
            .with_event_resource(EventResource::new("Maths-T", "Maths").with_role("Teacher"))
            .with_constraint(Constraint::new(
                "assign",
                ConstraintKind::AssignResource {
                    event_resources: vec![EventResourceId(0)],
                },
            ))
            .with_constraint(Constraint::new(
                "busy",
                ConstraintKind::LimitBusyTimes {
                    resources: vec![ResourceId(0), ResourceId(1)],
                    time_groups: vec![TimeGroupId(0), TimeGroupId(1)],
                    minimum: 2,
                    maximum: 4,
                },
            ))
    }

    #[test]
    fn test_valid_instance() {
        assert!(validate_instance(&sample_instance()).is_ok());
    }

    #[test]
    fn test_duplicate_resource_id() {
        let ins = sample_instance().with_resource(Resource::new("T1"));

        let errors = validate_instance(&ins).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::DuplicateId && e.message.contains("resource")));
    }

    #[test]
    fn test_time_out_of_range() {
        let ins = sample_instance().with_time_group(TimeGroup::new("Late", [9, 10]));

        let errors = validate_instance(&ins).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::TimeOutOfRange));
    }

    #[test]
    fn test_invalid_references() {
        let ins = sample_instance()
            .with_constraint(Constraint::new(
                "clash",
                ConstraintKind::AvoidClashes {
                    resources: vec![ResourceId(7)],
                },
            ))
            .with_constraint(Constraint::new(
                "prefer",
                ConstraintKind::PreferResources {
                    event_resources: vec![EventResourceId(3)],
                    domain: ResourceGroup::singleton(ResourceId(0)),
                },
            ))
            .with_constraint(Constraint::new(
                "unavailable",
                ConstraintKind::AvoidUnavailableTimes {
                    resources: vec![ResourceId(0)],
                    times: TimeGroupId(9),
                },
            ));

        let errors = validate_instance(&ins).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidResourceReference));
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidEventResourceReference));
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::InvalidTimeGroupReference));
    }

    #[test]
    fn test_inverted_limits() {
        let ins = sample_instance().with_constraint(Constraint::new(
            "workload",
            ConstraintKind::LimitWorkload {
                resources: vec![ResourceId(0)],
                minimum: 8,
                maximum: 3,
            },
        ));

        let errors = validate_instance(&ins).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::InvalidLimits);
    }
}
