//! Summary statistics for a hierarchy build.
//!
//! [`HierarchyStats`] records what the pipeline saw and what it threw away:
//! raw size, how many nodes the root reaches, the depth profile, how many
//! edges the acyclic projection dropped and why, and how many cycles the raw
//! graph contained.
//!
//! Cycles are counted as strongly connected components with more than one
//! member, plus self-loops, using petgraph's Kosaraju implementation (it is
//! iterative, so multi-million-node graphs do not exhaust the stack).

#![allow(clippy::module_name_repetitions)]

use std::collections::BTreeMap;

use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use tracing::instrument;

use super::build::CategoryGraph;
use super::depth::DepthMap;
use super::nodes::NodeId;
use super::project::ProjectionCounts;

/// Statistics collected while building a hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HierarchyStats {
    /// Input rows after denoising filters, duplicates included.
    pub rows: usize,
    /// Distinct nodes in the raw graph.
    pub node_count: usize,
    /// Distinct `(item, category)` links in the raw graph.
    pub edge_count: usize,
    /// Rows removed by the hidden-category filter.
    pub hidden_removed: usize,
    /// Rows removed by the top-level subtree restriction.
    pub restricted_removed: usize,
    /// Nodes reachable from the root.
    pub resolved: usize,
    /// Nodes not reachable from the root.
    pub unresolved: usize,
    /// Deepest resolved node.
    pub max_depth: u32,
    /// Resolved node count per depth.
    pub depth_histogram: BTreeMap<u32, usize>,
    /// Projection outcome per row.
    pub projection: ProjectionCounts,
    /// Distinct edges in the projected DAG.
    pub dag_edges: usize,
    /// Cycles in the raw graph (multi-node SCCs plus self-loops).
    pub raw_cycles: usize,
}

impl HierarchyStats {
    pub(crate) fn collect(
        graph: &CategoryGraph,
        depths: &DepthMap,
        projection: ProjectionCounts,
        dag_edges: usize,
    ) -> Self {
        let resolved = depths.resolved_count();
        Self {
            rows: graph.row_count(),
            node_count: graph.node_count(),
            edge_count: graph.edge_count(),
            hidden_removed: 0,
            restricted_removed: 0,
            resolved,
            unresolved: graph.node_count().saturating_sub(resolved),
            max_depth: depths.max_depth().unwrap_or(0),
            depth_histogram: depths.histogram(),
            projection,
            dag_edges,
            raw_cycles: count_raw_cycles(graph),
        }
    }
}

/// Count cycles in the raw graph: SCCs with two or more members, plus
/// nodes that contain themselves.
#[must_use]
#[instrument(skip_all, fields(nodes = graph.node_count()))]
pub fn count_raw_cycles(graph: &CategoryGraph) -> usize {
    let node_count = graph.node_count();
    let mut g: DiGraph<(), ()> = DiGraph::with_capacity(node_count, graph.edge_count());
    for _ in 0..node_count {
        g.add_node(());
    }

    let children = graph.child_tree();
    let mut self_loops = 0;
    for from in 0..node_count {
        let Some(id) = NodeId::try_from_index(from) else {
            continue;
        };
        for &to in children.get(id) {
            if to == id {
                self_loops += 1;
            } else {
                g.add_edge(NodeIndex::new(from), NodeIndex::new(to.index()), ());
            }
        }
    }

    let multi = kosaraju_scc(&g).into_iter().filter(|scc| scc.len() > 1).count();
    multi + self_loops
}
