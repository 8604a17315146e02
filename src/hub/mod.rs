//! Assignment-routing hubs.
//!
//! Every resource and every event resource of the instance has a hub in the
//! solution. A hub lists the tasks currently touching it and the monitors
//! registered against it, split into all registered monitors and the
//! attached ones. Assignment events fan out to the attached monitors only,
//! so a detached monitor costs nothing to keep.
//!
//! | Hub | Tasks | Direct monitors | Through the timetable |
//! |-----|-------|-----------------|-----------------------|
//! | [`ResourceInSoln`] | assigned this resource | Timetable, LimitWorkload | AvoidClashes, AvoidUnavailableTimes, LimitIdleTimes, LimitBusyTimes |
//! | [`EventResourceInSoln`] | derived from this event resource | AssignResource, PreferResources, AvoidSplitAssignments | none |

mod event_resource_in_soln;
mod resource_in_soln;

pub use event_resource_in_soln::EventResourceInSoln;
pub use resource_in_soln::ResourceInSoln;

use crate::monitor::MonitorId;

/// Removes one occurrence of `m` from `list`, keeping the order of the rest.
fn remove_monitor(list: &mut Vec<MonitorId>, m: MonitorId, what: &str) {
    match list.iter().rposition(|&x| x == m) {
        Some(pos) => {
            list.remove(pos);
        }
        None => panic!("{what}: monitor {m} not registered"),
    }
}
