//! Traversal marks.
//!
//! Monitors and tasks carry a visit stamp. A traversal owns a
//! [`VisitContext`] whose number only grows; an object counts as visited in
//! the current pass when its stamp has caught up with that number, so no
//! stamps ever need clearing between passes.

/// Visit numbering for one traversal algorithm.
#[derive(Debug, Clone)]
pub struct VisitContext {
    num: u64,
}

impl Default for VisitContext {
    fn default() -> Self {
        Self::new()
    }
}

impl VisitContext {
    /// Starts at 1, so fresh objects (stamp 0) are unvisited.
    pub fn new() -> Self {
        Self { num: 1 }
    }

    /// Current visit number.
    pub fn num(&self) -> u64 {
        self.num
    }

    /// Starts a new pass; everything visited so far becomes unvisited.
    pub fn next_pass(&mut self) {
        self.num += 1;
    }

    /// Whether `stamp` was set within the last `slack` passes.
    pub fn is_visited(&self, stamp: u64, slack: u64) -> bool {
        stamp + slack >= self.num
    }

    /// Stamp meaning "visited in this pass".
    pub(crate) fn visited_stamp(&self) -> u64 {
        self.num
    }

    /// Stamp meaning "not visited in this pass".
    pub(crate) fn unvisited_stamp(&self) -> u64 {
        self.num - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visit_passes() {
        let mut ctx = VisitContext::new();
        assert!(!ctx.is_visited(0, 0));

        let stamp = ctx.visited_stamp();
        assert!(ctx.is_visited(stamp, 0));

        ctx.next_pass();
        assert!(!ctx.is_visited(stamp, 0));
        assert!(ctx.is_visited(stamp, 1));
        assert!(!ctx.is_visited(ctx.unvisited_stamp(), 0));
    }
}
