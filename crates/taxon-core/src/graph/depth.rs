//! Minimum depth of every node below a root, over a graph with cycles.
//!
//! # Overview
//!
//! The raw category graph is full of cycles (`Physics ⊂ Science ⊂ Physics`
//! through some chain of subcategories), so a depth cannot be assigned by a
//! single top-down walk that marks nodes as visited. Instead each node is
//! labelled with the length of its shortest path from the root.
//!
//! Two strategies compute the same labels:
//!
//! - [`DepthStrategy::Frontier`]: breadth-first frontier from the root. Every
//!   node is finalised the first time it is reached. O(V + E).
//! - [`DepthStrategy::Relaxation`]: depth-first label correcting. A child is
//!   lowered to `parent + 1` whenever that improves it and is then descended
//!   into again, so nodes first reached through a long chain get relabelled
//!   when a shorter one turns up. Depths only decrease and are bounded below
//!   by zero, so the walk terminates. Kept as the reference the frontier pass
//!   is checked against.
//!
//! Nodes not reachable from the root keep an unresolved (`None`) depth.
//!
//! # Progress
//!
//! Both passes log a progress line every `progress_interval` newly resolved
//! nodes, with the resolved and total node counts.

#![allow(clippy::module_name_repetitions)]

use std::collections::{BTreeMap, VecDeque};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use super::build::{CategoryGraph, ChildTree};
use super::nodes::NodeId;

/// Default number of newly resolved nodes between progress lines.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 100_000;

// ---------------------------------------------------------------------------
// DepthStrategy
// ---------------------------------------------------------------------------

/// Algorithm used to assign depths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepthStrategy {
    /// Breadth-first frontier.
    #[default]
    Frontier,
    /// Depth-first relaxation (label correcting).
    Relaxation,
}

impl DepthStrategy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Frontier => "frontier",
            Self::Relaxation => "relaxation",
        }
    }
}

impl fmt::Display for DepthStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DepthStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "frontier" | "bfs" => Ok(Self::Frontier),
            "relaxation" | "relax" => Ok(Self::Relaxation),
            other => Err(format!(
                "unknown depth strategy '{other}' (expected frontier or relaxation)"
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// DepthMap
// ---------------------------------------------------------------------------

/// Node → minimum depth from the root, `None` when unreachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepthMap {
    root: NodeId,
    depths: Vec<Option<u32>>,
}

impl DepthMap {
    pub(crate) const fn from_raw(root: NodeId, depths: Vec<Option<u32>>) -> Self {
        Self { root, depths }
    }

    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Depth of `id`, or `None` if unresolved or unknown.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<u32> {
        self.depths.get(id.index()).copied().flatten()
    }

    #[must_use]
    pub fn is_resolved(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Number of node slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.depths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.depths.iter().filter(|d| d.is_some()).count()
    }

    #[must_use]
    pub fn max_depth(&self) -> Option<u32> {
        self.depths.iter().flatten().copied().max()
    }

    /// Number of resolved nodes at each depth.
    #[must_use]
    pub fn histogram(&self) -> BTreeMap<u32, usize> {
        let mut counts = BTreeMap::new();
        for depth in self.depths.iter().flatten() {
            *counts.entry(*depth).or_insert(0) += 1;
        }
        counts
    }

    /// `(id, depth)` for every resolved node, in id order.
    pub fn iter_resolved(&self) -> impl Iterator<Item = (NodeId, u32)> + '_ {
        self.depths.iter().enumerate().filter_map(|(idx, depth)| {
            let id = NodeId::try_from_index(idx)?;
            depth.map(|d| (id, d))
        })
    }
}

// ---------------------------------------------------------------------------
// Assignment
// ---------------------------------------------------------------------------

/// Assign minimum depths below `root` with the chosen strategy.
///
/// The caller guarantees `root` is a node of `graph`.
#[must_use]
#[instrument(skip(graph), fields(nodes = graph.node_count()))]
pub fn assign_depths(
    graph: &CategoryGraph,
    root: NodeId,
    strategy: DepthStrategy,
    progress_interval: usize,
) -> DepthMap {
    let mut progress = Progress::new(graph.node_count(), progress_interval);
    let depths = match strategy {
        DepthStrategy::Frontier => frontier(graph.child_tree(), root, &mut progress),
        DepthStrategy::Relaxation => relaxation(graph.child_tree(), root, &mut progress),
    };
    info!(
        strategy = %strategy,
        resolved = progress.resolved,
        total = progress.total,
        "depth assignment complete"
    );
    DepthMap::from_raw(root, depths)
}

fn frontier(children: &ChildTree, root: NodeId, progress: &mut Progress) -> Vec<Option<u32>> {
    let mut depths = vec![None; children.len()];
    if root.index() >= depths.len() {
        return depths;
    }
    depths[root.index()] = Some(0);
    progress.tick();

    let mut queue = VecDeque::from([root]);
    while let Some(parent) = queue.pop_front() {
        let Some(parent_depth) = depths[parent.index()] else {
            continue;
        };
        for &child in children.get(parent) {
            let slot = &mut depths[child.index()];
            if slot.is_none() {
                *slot = Some(parent_depth + 1);
                progress.tick();
                queue.push_back(child);
            }
        }
    }
    depths
}

/// Label-correcting walk. A child is pushed again only when its depth was
/// lowered and it has children of its own that could benefit.
fn relaxation(children: &ChildTree, root: NodeId, progress: &mut Progress) -> Vec<Option<u32>> {
    let mut depths: Vec<Option<u32>> = vec![None; children.len()];
    if root.index() >= depths.len() {
        return depths;
    }
    depths[root.index()] = Some(0);
    progress.tick();

    let mut stack = vec![root];
    while let Some(parent) = stack.pop() {
        let Some(parent_depth) = depths[parent.index()] else {
            continue;
        };
        let candidate = parent_depth + 1;
        for &child in children.get(parent) {
            let slot = &mut depths[child.index()];
            match *slot {
                Some(current) if current <= candidate => continue,
                None => progress.tick(),
                Some(_) => {}
            }
            *slot = Some(candidate);
            if !children.get(child).is_empty() {
                stack.push(child);
            }
        }
    }
    depths
}

struct Progress {
    resolved: usize,
    total: usize,
    interval: usize,
}

impl Progress {
    const fn new(total: usize, interval: usize) -> Self {
        Self {
            resolved: 0,
            total,
            interval,
        }
    }

    fn tick(&mut self) {
        self.resolved += 1;
        if self.interval > 0 && self.resolved % self.interval == 0 {
            info!(resolved = self.resolved, total = self.total, "resolving depths");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::build::GraphBuilder;

    fn graph(rows: &[(&str, &str)]) -> CategoryGraph {
        let mut builder = GraphBuilder::new();
        for (item, category) in rows {
            builder.add_edge(item, category);
        }
        builder.finish()
    }

    fn depth_of(graph: &CategoryGraph, depths: &DepthMap, name: &str) -> Option<u32> {
        graph.id(name).and_then(|id| depths.get(id))
    }

    fn both(rows: &[(&str, &str)], root: &str) -> (CategoryGraph, DepthMap, DepthMap) {
        let g = graph(rows);
        let root = g.id(root).expect("root present");
        let a = assign_depths(&g, root, DepthStrategy::Frontier, 0);
        let b = assign_depths(&g, root, DepthStrategy::Relaxation, 0);
        (g, a, b)
    }

    #[test]
    fn layered_tree_depths() {
        let (g, d, r) = both(&[("A", "Root"), ("B", "Root"), ("C", "A"), ("D", "B")], "Root");
        assert_eq!(d, r);
        assert_eq!(depth_of(&g, &d, "Root"), Some(0));
        assert_eq!(depth_of(&g, &d, "A"), Some(1));
        assert_eq!(depth_of(&g, &d, "B"), Some(1));
        assert_eq!(depth_of(&g, &d, "C"), Some(2));
        assert_eq!(depth_of(&g, &d, "D"), Some(2));
    }

    #[test]
    fn two_cycle_resolves_through_root_side() {
        let (g, d, r) = both(&[("X", "Y"), ("Y", "X"), ("X", "Root")], "Root");
        assert_eq!(d, r);
        assert_eq!(depth_of(&g, &d, "X"), Some(1));
        assert_eq!(depth_of(&g, &d, "Y"), Some(2));
    }

    #[test]
    fn shortcut_lowers_depth_found_through_long_chain() {
        // Root → A → B → C → D, plus Root → D directly.
        let (g, d, r) = both(
            &[("A", "Root"), ("B", "A"), ("C", "B"), ("D", "C"), ("E", "D"), ("D", "Root")],
            "Root",
        );
        assert_eq!(d, r);
        assert_eq!(depth_of(&g, &d, "D"), Some(1));
        assert_eq!(depth_of(&g, &d, "E"), Some(2));
    }

    #[test]
    fn unreachable_nodes_stay_unresolved() {
        let (g, d, _) = both(&[("A", "Root"), ("Orphan", "Elsewhere")], "Root");
        assert_eq!(depth_of(&g, &d, "Orphan"), None);
        assert_eq!(depth_of(&g, &d, "Elsewhere"), None);
        assert_eq!(d.resolved_count(), 2);
    }

    #[test]
    fn cycle_back_into_root_keeps_root_at_zero() {
        let (g, d, r) = both(&[("A", "Root"), ("Root", "A")], "Root");
        assert_eq!(d, r);
        assert_eq!(depth_of(&g, &d, "Root"), Some(0));
        assert_eq!(depth_of(&g, &d, "A"), Some(1));
    }

    #[test]
    fn self_loop_does_not_change_depth() {
        let (g, d, r) = both(&[("A", "Root"), ("A", "A")], "Root");
        assert_eq!(d, r);
        assert_eq!(depth_of(&g, &d, "A"), Some(1));
    }

    #[test]
    fn histogram_and_max_depth() {
        let (_, d, _) = both(&[("A", "Root"), ("B", "Root"), ("C", "A")], "Root");
        assert_eq!(d.max_depth(), Some(2));
        let hist: Vec<_> = d.histogram().into_iter().collect();
        assert_eq!(hist, [(0, 1), (1, 2), (2, 1)]);
    }

    #[test]
    fn iter_resolved_skips_unresolved() {
        let (_, d, _) = both(&[("A", "Root"), ("Z", "Y")], "Root");
        assert_eq!(d.iter_resolved().count(), 2);
    }

    #[test]
    fn strategy_parses_from_str() {
        assert_eq!("frontier".parse::<DepthStrategy>(), Ok(DepthStrategy::Frontier));
        assert_eq!("Relaxation".parse::<DepthStrategy>(), Ok(DepthStrategy::Relaxation));
        assert!("dijkstra".parse::<DepthStrategy>().is_err());
    }
}
