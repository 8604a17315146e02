//! Sample solutions shared by the unit tests.

use crate::models::{
    Constraint, ConstraintKind, EventResource, EventResourceId, Instance, Resource, ResourceGroup,
    ResourceId, TimeGroup, TimeGroupId,
};
use crate::monitor::MonitorId;
use crate::task::{NewTask, TaskId};
use crate::Soln;

/// A solution with the monitors and tasks a test works on.
pub struct SampleSoln {
    pub soln: Soln,
    pub monitors: Vec<MonitorId>,
    pub tasks: Vec<TaskId>,
}

fn built(instance: Instance) -> Soln {
    let mut soln = Soln::new(instance).unwrap();
    soln.make_all_constraint_monitors();
    soln
}

fn event_resources(instance: Instance, count: usize) -> Instance {
    (0..count).fold(instance, |ins, i| {
        ins.with_event_resource(EventResource::new(format!("e{i}"), format!("Event{i}")))
    })
}

/// Ten times, resources `r0` and `r1`, one event resource per entry under
/// one assign-resource constraint, and an unassigned task of the given
/// duration for every `Some` entry.
pub fn assign_resource_soln(durations: &[Option<i32>]) -> SampleSoln {
    let ers: Vec<EventResourceId> = (0..durations.len()).map(EventResourceId).collect();
    let instance = event_resources(
        Instance::new("assign", 10)
            .with_resource(Resource::new("r0"))
            .with_resource(Resource::new("r1")),
        durations.len(),
    )
    .with_constraint(Constraint::new(
        "assign",
        ConstraintKind::AssignResource {
            event_resources: ers.clone(),
        },
    ));
    let mut soln = Soln::new(instance).unwrap();
    let monitors = soln.make_all_constraint_monitors();
    let tasks = durations
        .iter()
        .zip(&ers)
        .filter_map(|(&d, &er)| d.map(|d| soln.make_task(NewTask::new(d).with_event_resource(er))))
        .collect();
    SampleSoln {
        soln,
        monitors,
        tasks,
    }
}

/// One resource over eight times with an avoid-clashes constraint.
pub fn clash_soln() -> Soln {
    built(
        Instance::new("clash", 8)
            .with_resource(Resource::new("A"))
            .with_constraint(Constraint::new(
                "clashes",
                ConstraintKind::AvoidClashes {
                    resources: vec![ResourceId(0)],
                },
            )),
    )
}

/// One resource, one day of six times, idle times limited to
/// `minimum..=maximum`.
pub fn idle_soln(minimum: i32, maximum: i32) -> Soln {
    built(
        Instance::new("idle", 6)
            .with_resource(Resource::new("A"))
            .with_time_group(TimeGroup::new("day", 0..6))
            .with_constraint(Constraint::new(
                "idle",
                ConstraintKind::LimitIdleTimes {
                    resources: vec![ResourceId(0)],
                    time_groups: vec![TimeGroupId(0)],
                    minimum,
                    maximum,
                },
            )),
    )
}

/// One resource, `times` times forming the time group `all`, busy times
/// limited to `minimum..=maximum`.
pub fn busy_soln(minimum: i32, maximum: i32, times: usize) -> Soln {
    built(
        Instance::new("busy", times)
            .with_resource(Resource::new("A"))
            .with_time_group(TimeGroup::new("all", 0..times))
            .with_constraint(Constraint::new(
                "busy",
                ConstraintKind::LimitBusyTimes {
                    resources: vec![ResourceId(0)],
                    time_groups: vec![TimeGroupId(0)],
                    minimum,
                    maximum,
                },
            )),
    )
}

/// One resource with its workload limited to `minimum..=maximum`.
pub fn workload_soln(minimum: i32, maximum: i32) -> Soln {
    built(
        Instance::new("workload", 10)
            .with_resource(Resource::new("A"))
            .with_constraint(Constraint::new(
                "workload",
                ConstraintKind::LimitWorkload {
                    resources: vec![ResourceId(0)],
                    minimum,
                    maximum,
                },
            )),
    )
}

/// Two resources and `n` event resources that should share one resource,
/// each with one unassigned task of duration 1.
pub fn split_soln(n: usize) -> SampleSoln {
    let ers: Vec<EventResourceId> = (0..n).map(EventResourceId).collect();
    let instance = event_resources(
        Instance::new("split", 10)
            .with_resource(Resource::new("A"))
            .with_resource(Resource::new("B")),
        n,
    )
    .with_constraint(Constraint::new(
        "split",
        ConstraintKind::AvoidSplitAssignments {
            event_groups: vec![ers.clone()],
        },
    ));
    let mut soln = Soln::new(instance).unwrap();
    let monitors = soln.make_all_constraint_monitors();
    let tasks = ers
        .iter()
        .map(|&er| soln.make_task(NewTask::new(1).with_event_resource(er)))
        .collect();
    SampleSoln {
        soln,
        monitors,
        tasks,
    }
}

/// Two resources and one event resource preferring the first.
pub fn prefer_soln() -> Soln {
    built(event_resources(
        Instance::new("prefer", 10)
            .with_resource(Resource::new("A"))
            .with_resource(Resource::new("B")),
        1,
    )
    .with_constraint(Constraint::new(
        "prefer",
        ConstraintKind::PreferResources {
            event_resources: vec![EventResourceId(0)],
            domain: ResourceGroup::singleton(ResourceId(0)),
        },
    )))
}

/// Three resources over two days of five times under every constraint
/// family. `tasks` are six unassigned tasks with times; a few background
/// tasks already assigned keep the resource monitors busy. `monitors` are
/// all constraint monitors.
pub fn mixed_soln() -> SampleSoln {
    let (r0, r1, r2) = (ResourceId(0), ResourceId(1), ResourceId(2));
    let er = EventResourceId;
    let instance = event_resources(
        Instance::new("mixed", 10)
            .with_resource(Resource::new("R0"))
            .with_resource(Resource::new("R1"))
            .with_resource(Resource::new("R2"))
            .with_time_group(TimeGroup::new("Mon", 0..5))
            .with_time_group(TimeGroup::new("Tue", 5..10))
            .with_time_group(TimeGroup::new("Unavailable", [0, 9])),
        6,
    )
    .with_constraint(
        Constraint::new(
            "assign",
            ConstraintKind::AssignResource {
                event_resources: (0..6).map(er).collect(),
            },
        )
        .hard(),
    )
    .with_constraint(
        Constraint::new(
            "prefer",
            ConstraintKind::PreferResources {
                event_resources: vec![er(0), er(1)],
                domain: ResourceGroup::new([r0, r1]),
            },
        )
        .with_weight(2),
    )
    .with_constraint(Constraint::new(
        "split",
        ConstraintKind::AvoidSplitAssignments {
            event_groups: vec![vec![er(2), er(3)], vec![er(4), er(5)]],
        },
    ))
    .with_constraint(
        Constraint::new(
            "clashes",
            ConstraintKind::AvoidClashes {
                resources: vec![r0, r1, r2],
            },
        )
        .hard(),
    )
    .with_constraint(Constraint::new(
        "busy",
        ConstraintKind::LimitBusyTimes {
            resources: vec![r0, r1],
            time_groups: vec![TimeGroupId(0), TimeGroupId(1)],
            minimum: 1,
            maximum: 3,
        },
    ))
    .with_constraint(Constraint::new(
        "idle",
        ConstraintKind::LimitIdleTimes {
            resources: vec![r1, r2],
            time_groups: vec![TimeGroupId(0), TimeGroupId(1)],
            minimum: 0,
            maximum: 1,
        },
    ))
    .with_constraint(
        Constraint::new(
            "unavailable",
            ConstraintKind::AvoidUnavailableTimes {
                resources: vec![r2],
                times: TimeGroupId(2),
            },
        )
        .with_weight(3),
    )
    .with_constraint(
        Constraint::new(
            "workload",
            ConstraintKind::LimitWorkload {
                resources: vec![r0, r1, r2],
                minimum: 2,
                maximum: 6,
            },
        )
        .with_cost_function(crate::models::CostFunction::Quadratic),
    );

    let mut soln = Soln::new(instance).unwrap();
    let monitors = soln.make_all_constraint_monitors();

    // (duration, event resource, time)
    let timed = [
        (2, Some(0), 0),
        (1, Some(1), 3),
        (3, Some(2), 5),
        (2, Some(3), 1),
        (4, Some(4), 6),
        (1, None, 8),
    ];
    let tasks = timed
        .iter()
        .map(|&(duration, e, time)| {
            let mut new = NewTask::new(duration);
            if let Some(e) = e {
                new = new.with_event_resource(er(e));
            }
            let t = soln.make_task(new);
            soln.task_assign_time(t, time).unwrap();
            t
        })
        .collect();

    // (duration, time, resource)
    let background = [
        (2, Some(2), r0),
        (1, None, r0),
        (1, Some(0), r1),
        (1, Some(4), r1),
        (3, Some(7), r2),
    ];
    for (duration, time, r) in background {
        let t = soln.make_task(NewTask::new(duration));
        if let Some(time) = time {
            soln.task_assign_time(t, time).unwrap();
        }
        soln.task_assign_resource(t, r).unwrap();
    }

    SampleSoln {
        soln,
        monitors,
        tasks,
    }
}
