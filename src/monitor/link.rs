//! Parent/child edges of the monitor DAG.
//!
//! A link records its position in both endpoint arrays so either side can
//! drop it with a swap-remove, patching the one link that moved.

use super::MonitorId;
use crate::Soln;

/// Index of a link in its solution's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(pub(crate) usize);

/// One edge from a group monitor to a child monitor.
#[derive(Debug, Clone)]
pub struct MonitorLink {
    pub(crate) parent: MonitorId,
    pub(crate) child: MonitorId,
    /// Position in the parent's `child_links`.
    pub(crate) parent_index: usize,
    /// Position in the child's `parent_links`.
    pub(crate) child_index: usize,
    /// Position in the parent's `defect_links` while the child has cost.
    pub(crate) parent_defects_index: Option<usize>,
}

impl Soln {
    pub(crate) fn link(&self, l: LinkId) -> &MonitorLink {
        match self.links.get(l.0).and_then(Option::as_ref) {
            Some(link) => link,
            None => panic!("link {} has been deleted", l.0),
        }
    }

    pub(crate) fn link_mut(&mut self, l: LinkId) -> &mut MonitorLink {
        match self.links.get_mut(l.0).and_then(Option::as_mut) {
            Some(link) => link,
            None => panic!("link {} has been deleted", l.0),
        }
    }

    /// Creates the link `parent -> child` and records it at both ends.
    pub(crate) fn make_link(&mut self, parent: MonitorId, child: MonitorId) -> LinkId {
        let parent_index = self.group(parent).child_links.len();
        let child_index = self.mon(child).parent_links.len();
        let link = MonitorLink {
            parent,
            child,
            parent_index,
            child_index,
            parent_defects_index: None,
        };
        let id = match self.free_links.pop() {
            Some(id) => {
                self.links[id.0] = Some(link);
                id
            }
            None => {
                self.links.push(Some(link));
                LinkId(self.links.len() - 1)
            }
        };
        self.group_mut(parent).child_links.push(id);
        self.mon_mut(child).parent_links.push(id);
        id
    }

    /// Removes a link from both endpoint arrays and frees it.
    ///
    /// The child must already be out of the parent's defect list.
    pub(crate) fn delete_link(&mut self, l: LinkId) {
        let (parent, child, parent_index, child_index) = {
            let link = self.link(l);
            assert!(
                link.parent_defects_index.is_none(),
                "delete_link: child {} is still a defect of {}",
                link.child,
                link.parent
            );
            (link.parent, link.child, link.parent_index, link.child_index)
        };

        let moved = {
            let child_links = &mut self.group_mut(parent).child_links;
            child_links.swap_remove(parent_index);
            child_links.get(parent_index).copied()
        };
        if let Some(moved) = moved {
            self.link_mut(moved).parent_index = parent_index;
        }

        let moved = {
            let parent_links = &mut self.mon_mut(child).parent_links;
            parent_links.swap_remove(child_index);
            parent_links.get(child_index).copied()
        };
        if let Some(moved) = moved {
            self.link_mut(moved).child_index = child_index;
        }

        self.links[l.0] = None;
        self.free_links.push(l);
    }

    /// The link from `parent` to `child`, if there is one.
    pub(crate) fn find_link(&self, parent: MonitorId, child: MonitorId) -> Option<LinkId> {
        self.mon(child)
            .parent_links
            .iter()
            .copied()
            .find(|&l| self.link(l).parent == parent)
    }
}
