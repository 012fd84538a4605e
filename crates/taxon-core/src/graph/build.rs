//! Category graph construction from a raw edge list.
//!
//! # Overview
//!
//! [`GraphBuilder`] interns every node name and collects the membership rows;
//! [`GraphBuilder::finish`] turns them into a [`CategoryGraph`] holding two
//! complementary adjacency views:
//!
//! - **child tree**: category → items it directly contains.
//! - **parent tree**: item → categories that directly contain it.
//!
//! ## Leaves
//!
//! Every node that appears anywhere in the edge list owns a slot in both
//! views. Nodes never seen as a category have an empty child set; nodes never
//! seen as an item have an empty parent set. Traversal code therefore never
//! special-cases missing keys.
//!
//! ## Ordering
//!
//! Adjacency sets are stored sorted by [`NodeId`] and deduplicated. The graph
//! is input-order-independent up to the ids the interner hands out.

#![allow(clippy::module_name_repetitions)]

use tracing::{debug, instrument};

use super::edges::Edge;
use super::nodes::{NodeId, NodeTable};

// ---------------------------------------------------------------------------
// AdjacencyList
// ---------------------------------------------------------------------------

/// Node → set of neighbouring nodes, indexed by [`NodeId`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjacencyList {
    lists: Vec<Vec<NodeId>>,
}

/// Category → contained items.
pub type ChildTree = AdjacencyList;
/// Item → containing categories.
pub type ParentTree = AdjacencyList;

impl AdjacencyList {
    /// Build from `(from, to)` pairs over `node_count` nodes.
    pub(crate) fn from_pairs(
        node_count: usize,
        pairs: impl IntoIterator<Item = (NodeId, NodeId)>,
    ) -> Self {
        let mut lists = vec![Vec::new(); node_count];
        for (from, to) in pairs {
            if let Some(list) = lists.get_mut(from.index()) {
                list.push(to);
            }
        }
        for list in &mut lists {
            list.sort_unstable();
            list.dedup();
        }
        Self { lists }
    }

    /// Neighbours of `id`; empty for unknown ids.
    #[must_use]
    pub fn get(&self, id: NodeId) -> &[NodeId] {
        self.lists.get(id.index()).map_or(&[], Vec::as_slice)
    }

    /// Number of node slots (including nodes with no neighbours).
    #[must_use]
    pub fn len(&self) -> usize {
        self.lists.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lists.is_empty()
    }

    /// Number of distinct `(from, to)` links.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.lists.iter().map(Vec::len).sum()
    }
}

// ---------------------------------------------------------------------------
// GraphBuilder
// ---------------------------------------------------------------------------

/// Accumulates membership rows and interns node names.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    nodes: NodeTable,
    edges: Vec<(NodeId, NodeId)>,
}

impl GraphBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size the row buffer for `rows` edges.
    #[must_use]
    pub fn with_capacity(rows: usize) -> Self {
        Self {
            nodes: NodeTable::new(),
            edges: Vec::with_capacity(rows),
        }
    }

    /// Record that `item` is classified under `category`.
    pub fn add_edge(&mut self, item: &str, category: &str) -> &mut Self {
        let item = self.nodes.intern(item);
        let category = self.nodes.intern(category);
        self.edges.push((item, category));
        self
    }

    /// Record every edge in `edges`.
    pub fn extend<'a>(&mut self, edges: impl IntoIterator<Item = &'a Edge>) -> &mut Self {
        for edge in edges {
            self.add_edge(&edge.item, &edge.category);
        }
        self
    }

    /// Build both adjacency views.
    #[must_use]
    #[instrument(skip(self), fields(rows = self.edges.len()))]
    pub fn finish(self) -> CategoryGraph {
        let node_count = self.nodes.len();
        let children = AdjacencyList::from_pairs(
            node_count,
            self.edges.iter().map(|&(item, category)| (category, item)),
        );
        let parents = AdjacencyList::from_pairs(node_count, self.edges.iter().copied());
        debug!(
            nodes = node_count,
            links = children.link_count(),
            "category graph built"
        );
        CategoryGraph {
            nodes: self.nodes,
            children,
            parents,
            edges: self.edges,
        }
    }
}

// ---------------------------------------------------------------------------
// CategoryGraph
// ---------------------------------------------------------------------------

/// The raw category graph. May contain cycles.
#[derive(Debug)]
pub struct CategoryGraph {
    nodes: NodeTable,
    children: ChildTree,
    parents: ParentTree,
    /// Input rows in arrival order, duplicates kept.
    edges: Vec<(NodeId, NodeId)>,
}

impl CategoryGraph {
    /// Build a graph from an edge slice.
    #[must_use]
    pub fn from_edges(edges: &[Edge]) -> Self {
        let mut builder = GraphBuilder::with_capacity(edges.len());
        builder.extend(edges);
        builder.finish()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of input rows, duplicates included.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of distinct `(item, category)` links.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.parents.link_count()
    }

    #[must_use]
    pub fn id(&self, name: &str) -> Option<NodeId> {
        self.nodes.id(name)
    }

    #[must_use]
    pub fn name(&self, id: NodeId) -> &str {
        self.nodes.name(id)
    }

    #[must_use]
    pub const fn child_tree(&self) -> &ChildTree {
        &self.children
    }

    /// Raw `(item, category)` rows in input order.
    #[must_use]
    pub fn rows(&self) -> &[(NodeId, NodeId)] {
        &self.edges
    }

    /// Names of the items directly under `category`, or `None` for an
    /// unknown node.
    #[must_use]
    pub fn children_of(&self, category: &str) -> Option<Vec<&str>> {
        let id = self.id(category)?;
        Some(self.names(self.children.get(id)))
    }

    /// Names of the categories directly containing `item`, or `None` for an
    /// unknown node.
    #[must_use]
    pub fn parents_of(&self, item: &str) -> Option<Vec<&str>> {
        let id = self.id(item)?;
        Some(self.names(self.parents.get(id)))
    }

    fn names(&self, ids: &[NodeId]) -> Vec<&str> {
        ids.iter().map(|&id| self.name(id)).collect()
    }

    /// Give up the adjacency views and keep only the interned names.
    pub(crate) fn into_nodes(self) -> NodeTable {
        self.nodes
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(rows: &[(&str, &str)]) -> CategoryGraph {
        let mut builder = GraphBuilder::new();
        for (item, category) in rows {
            builder.add_edge(item, category);
        }
        builder.finish()
    }

    fn sorted(mut names: Vec<&str>) -> Vec<&str> {
        names.sort_unstable();
        names
    }

    #[test]
    fn empty_input_builds_empty_graph() {
        let g = graph(&[]);
        assert_eq!(g.node_count(), 0);
        assert_eq!(g.edge_count(), 0);
        assert!(g.child_tree().is_empty());
    }

    #[test]
    fn child_and_parent_views_are_inverse() {
        let g = graph(&[("A", "Root"), ("B", "Root"), ("C", "A"), ("C", "B")]);
        assert_eq!(sorted(g.children_of("Root").unwrap_or_default()), ["A", "B"]);
        assert_eq!(sorted(g.parents_of("C").unwrap_or_default()), ["A", "B"]);
        assert_eq!(g.children_of("A").unwrap_or_default(), ["C"]);
    }

    #[test]
    fn leaves_get_empty_sets_not_absence() {
        let g = graph(&[("A", "Root")]);
        assert_eq!(g.children_of("A"), Some(vec![]));
        assert_eq!(g.parents_of("Root"), Some(vec![]));
        assert_eq!(g.children_of("Missing"), None);
    }

    #[test]
    fn duplicates_collapse_but_rows_are_kept() {
        let g = graph(&[("A", "Root"), ("A", "Root"), ("A", "Root")]);
        assert_eq!(g.row_count(), 3);
        assert_eq!(g.edge_count(), 1);
        assert_eq!(g.children_of("Root").unwrap_or_default(), ["A"]);
    }

    #[test]
    fn self_loop_is_stored_in_both_views() {
        let g = graph(&[("X", "X")]);
        assert_eq!(g.children_of("X").unwrap_or_default(), ["X"]);
        assert_eq!(g.parents_of("X").unwrap_or_default(), ["X"]);
    }

    #[test]
    fn result_is_independent_of_row_order() {
        let a = graph(&[("A", "Root"), ("B", "A"), ("C", "A")]);
        let b = graph(&[("C", "A"), ("B", "A"), ("A", "Root")]);
        for name in ["Root", "A", "B", "C"] {
            assert_eq!(
                sorted(a.children_of(name).unwrap_or_default()),
                sorted(b.children_of(name).unwrap_or_default())
            );
            assert_eq!(
                sorted(a.parents_of(name).unwrap_or_default()),
                sorted(b.parents_of(name).unwrap_or_default())
            );
        }
    }

    #[test]
    fn from_edges_matches_builder() {
        let edges = vec![Edge::new("A", "Root"), Edge::new("B", "A")];
        let g = CategoryGraph::from_edges(&edges);
        assert_eq!(g.node_count(), 3);
        assert_eq!(g.edge_count(), 2);
    }
}
