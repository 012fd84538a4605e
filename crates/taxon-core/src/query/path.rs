//! Paths through the hierarchy DAG.
//!
//! Every DAG edge descends exactly one level, so every node at depth `d` has
//! a parent at depth `d - 1`, and any upward walk to the root has length
//! `d`. Path finding therefore never backtracks when the target is the root.
//! Toward an arbitrary ancestor it can: parents are tried in id order and
//! nodes proven not to reach the target are remembered for the rest of the
//! search.

use std::collections::HashSet;

use crate::graph::nodes::NodeId;
use crate::hierarchy::Hierarchy;

impl Hierarchy {
    /// Path from `node` up to the root, excluding `node` and ending at the
    /// root.
    ///
    /// Returns `Some(vec![])` for the root itself and `None` when `node` is
    /// unknown or not connected.
    #[must_use]
    pub fn path_to_root(&self, node: &str) -> Option<Vec<&str>> {
        let id = self.id(node)?;
        let path = self.root_path_ids(id)?;
        Some(path.into_iter().map(|p| self.name(p)).collect())
    }

    /// Path from `node` up to `ancestor`, excluding `node` and ending at
    /// `ancestor`. `None` if `ancestor` is not above `node` in the DAG.
    #[must_use]
    pub fn path_between(&self, node: &str, ancestor: &str) -> Option<Vec<&str>> {
        let from = self.id(node)?;
        let to = self.id(ancestor)?;
        let path = self.path_ids(from, to)?;
        Some(path.into_iter().map(|p| self.name(p)).collect())
    }

    /// Whether `category` has a path to the root.
    #[must_use]
    pub fn is_connected(&self, category: &str) -> bool {
        self.id(category)
            .is_some_and(|id| self.depth_of(id).is_some())
    }

    pub(crate) fn root_path_ids(&self, id: NodeId) -> Option<Vec<NodeId>> {
        self.path_ids(id, self.root_id())
    }

    fn path_ids(&self, from: NodeId, to: NodeId) -> Option<Vec<NodeId>> {
        if from == to {
            return Some(Vec::new());
        }
        let target_depth = self.depth_of(to)?;
        let from_depth = self.depth_of(from)?;
        if from_depth <= target_depth {
            return None;
        }

        let mut dead = HashSet::new();
        let mut reversed = self.climb(from, to, target_depth, &mut dead)?;
        reversed.reverse();
        Some(reversed)
    }

    /// Returns the path from `to` back down to the parent of `node`, in
    /// reverse order.
    fn climb(
        &self,
        node: NodeId,
        to: NodeId,
        target_depth: u32,
        dead: &mut HashSet<NodeId>,
    ) -> Option<Vec<NodeId>> {
        let parents = self.parent_ids(node);
        if parents.binary_search(&to).is_ok() {
            return Some(vec![to]);
        }
        for &parent in parents {
            if dead.contains(&parent) {
                continue;
            }
            // Depth drops by one per step, so a parent at or above the
            // target's level cannot lead to it.
            if self.depth_of(parent).is_none_or(|d| d <= target_depth) {
                continue;
            }
            if let Some(mut path) = self.climb(parent, to, target_depth, dead) {
                path.push(parent);
                return Some(path);
            }
            dead.insert(parent);
        }
        None
    }
}
