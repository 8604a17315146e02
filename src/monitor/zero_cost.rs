//! Cached "must have zero cost" predicates.
//!
//! Some monitors can be proven unable to produce cost given the current
//! fixed assignments or fixed domains. Such a monitor may be detached
//! while the proof holds, so assignment events stop reaching it. The proof
//! is cached per monitor and only re-derived after one of the hub events
//! its family lists in [`ZeroCostTrigger`].

/// Event-resource hub events that can change a zero-cost predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZeroCostTrigger {
    TaskAdded,
    TaskDeleted,
    TaskSplit,
    TaskMerged,
    AssignFixed,
    AssignUnfixed,
    DomainChanged,
    DomainFixed,
    DomainUnfixed,
}

impl ZeroCostTrigger {
    /// Triggers after which a monitor proven zero-cost may be detached.
    pub fn allows_detach(self) -> bool {
        matches!(self, ZeroCostTrigger::AssignFixed | ZeroCostTrigger::DomainFixed)
    }
}

/// Cached predicate plus whether the hub detached the monitor because of it.
#[derive(Debug, Clone, Default)]
pub(crate) struct ZeroCostCache {
    value: Option<bool>,
    pub(crate) detached_by_hub: bool,
}

impl ZeroCostCache {
    pub(crate) fn get(&self) -> Option<bool> {
        self.value
    }

    pub(crate) fn set(&mut self, value: bool) {
        self.value = Some(value);
    }

    pub(crate) fn invalidate(&mut self) {
        self.value = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_invalidation() {
        let mut cache = ZeroCostCache::default();
        assert_eq!(cache.get(), None);
        cache.set(true);
        assert_eq!(cache.get(), Some(true));
        cache.invalidate();
        assert_eq!(cache.get(), None);
        assert!(ZeroCostTrigger::AssignFixed.allows_detach());
        assert!(!ZeroCostTrigger::TaskAdded.allows_detach());
    }
}
