//! Event resources.
//!
//! An event resource is one resource slot of one event ("the teacher of
//! Maths 7A", "the room of Maths 7A"). Tasks created for the slot are
//! watched by the event-resource monitors of that slot.

use serde::{Deserialize, Serialize};

/// Index of an event resource within its instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventResourceId(pub usize);

/// One resource slot of an event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventResource {
    /// Unique identifier of the slot.
    pub id: String,
    /// Name of the event the slot belongs to.
    pub event: String,
    /// Role of the slot within the event (e.g. "Teacher").
    pub role: Option<String>,
}

impl EventResource {
    /// Creates a slot of the given event.
    pub fn new(id: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            event: event.into(),
            role: None,
        }
    }

    /// Sets the role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}
