//! Time groups.
//!
//! Times are the indices `0..time_count` of an instance. A time group is a
//! named, sorted set of them (a day, a morning, the unavailable times of a
//! teacher).

use serde::{Deserialize, Serialize};

/// Index of a time group within its instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimeGroupId(pub usize);

/// A named set of times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeGroup {
    /// Unique time group identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    times: Vec<usize>,
}

impl TimeGroup {
    /// Creates a time group from any collection of times.
    pub fn new(id: impl Into<String>, times: impl IntoIterator<Item = usize>) -> Self {
        let id = id.into();
        let mut times: Vec<usize> = times.into_iter().collect();
        times.sort_unstable();
        times.dedup();
        Self {
            name: id.clone(),
            id,
            times,
        }
    }

    /// Sets the time group name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Times in increasing order.
    pub fn times(&self) -> &[usize] {
        &self.times
    }

    /// Number of times.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether the group has no times.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Whether `t` is in the group.
    pub fn contains(&self, t: usize) -> bool {
        self.times.binary_search(&t).is_ok()
    }

    /// Position of `t` within the group, used for idle-time spans.
    pub fn position(&self, t: usize) -> Option<usize> {
        self.times.binary_search(&t).ok()
    }

    /// Whether both groups hold exactly the same times.
    pub fn same_times(&self, other: &TimeGroup) -> bool {
        self.times == other.times
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_group_positions() {
        let tg = TimeGroup::new("Mon", [4, 0, 2, 2]).with_name("Monday");
        assert_eq!(tg.times(), &[0, 2, 4]);
        assert_eq!(tg.position(4), Some(2));
        assert_eq!(tg.position(3), None);
        assert!(tg.contains(2));
        assert_eq!(tg.name, "Monday");
    }

    #[test]
    fn test_same_times() {
        let a = TimeGroup::new("a", [1, 2]);
        let b = TimeGroup::new("b", [2, 1]);
        assert!(a.same_times(&b));
        assert!(!a.same_times(&TimeGroup::new("c", [1])));
    }
}
