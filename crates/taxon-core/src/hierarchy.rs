//! The immutable hierarchy snapshot.
//!
//! A [`Hierarchy`] is the read-only substrate for every distance and
//! commonality query. It holds the interned node names, the depth of every
//! node below the root, and the acyclic projection of the raw graph in both
//! directions. Nothing in it changes after construction; a new edge list
//! produces a new snapshot.
//!
//! Two ways to get one:
//!
//! - [`Hierarchy::build`] runs the full batch pipeline over raw edges
//!   (denoise → graph → depths → projection).
//! - [`Hierarchy::from_parts`] reassembles a snapshot from a persisted DAG
//!   edge table and depth table, validating the layering invariant.
//!
//! `Hierarchy` is `Send + Sync`; share it behind an `Arc` between any number
//! of query callers.

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use tracing::{info, instrument, warn};

use crate::error::ErrorCode;
use crate::graph::build::{AdjacencyList, CategoryGraph, ChildTree, ParentTree};
use crate::graph::depth::{DEFAULT_PROGRESS_INTERVAL, DepthMap, DepthStrategy, assign_depths};
use crate::graph::edges::{self, DEFAULT_HIDDEN_MARKER, Edge};
use crate::graph::nodes::{NodeId, NodeNames, NodeTable};
use crate::graph::project::{EdgeClass, classify, project};
use crate::graph::stats::HierarchyStats;
use crate::graph::subtree::{descendant_ids, restrict_to_subtrees};

/// Root used when none is configured. `Contents` sits above it but also
/// pulls in every navigational and maintenance tree.
pub const DEFAULT_ROOT: &str = "Main_topic_classifications";

// ---------------------------------------------------------------------------
// Options and errors
// ---------------------------------------------------------------------------

/// Knobs for [`Hierarchy::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildOptions {
    /// Node all depths are measured from.
    pub root: String,
    /// Category whose members are treated as hidden.
    pub hidden_marker: Option<String>,
    /// Additional hidden categories.
    pub extra_hidden: Vec<String>,
    /// Restrict the graph to the subtrees under these categories.
    pub top_levels: Vec<String>,
    /// Depth assignment algorithm.
    pub strategy: DepthStrategy,
    /// Newly resolved nodes between progress log lines; 0 disables them.
    pub progress_interval: usize,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            root: DEFAULT_ROOT.to_string(),
            hidden_marker: Some(DEFAULT_HIDDEN_MARKER.to_string()),
            extra_hidden: Vec::new(),
            top_levels: Vec::new(),
            strategy: DepthStrategy::default(),
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl BuildOptions {
    /// Default options with a different root and no hidden-category filter.
    #[must_use]
    pub fn with_root(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            hidden_marker: None,
            ..Self::default()
        }
    }
}

/// Errors that abort building or loading a hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// The configured root does not appear in the edge list.
    #[error("root category '{0}' not found in dataset")]
    RootNotFound(String),
    /// Persisted tables disagree with each other.
    #[error("corrupt hierarchy snapshot: {0}")]
    CorruptSnapshot(String),
}

impl BuildError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::RootNotFound(_) => ErrorCode::RootNotFound,
            Self::CorruptSnapshot(_) => ErrorCode::CorruptSnapshot,
        }
    }
}

// ---------------------------------------------------------------------------
// Hierarchy
// ---------------------------------------------------------------------------

/// Frozen category DAG with per-node depths.
#[derive(Debug)]
pub struct Hierarchy {
    names: NodeNames,
    depths: DepthMap,
    /// DAG item → categories.
    parents: ParentTree,
    /// DAG category → items.
    children: ChildTree,
    /// Distinct DAG edges `(item, category)`, sorted by id.
    dag: Vec<(NodeId, NodeId)>,
    content_hash: String,
}

impl Hierarchy {
    /// Run the batch pipeline over raw `(item, category)` rows.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::RootNotFound`] if `options.root` is not a node
    /// of the (filtered) edge list.
    #[instrument(skip(edges, options), fields(rows = edges.len(), root = %options.root))]
    pub fn build(
        mut edges: Vec<Edge>,
        options: &BuildOptions,
    ) -> Result<(Self, HierarchyStats), BuildError> {
        let hidden = edges::hidden_categories(
            &edges,
            options.hidden_marker.as_deref(),
            options.extra_hidden.iter().map(String::as_str),
        );
        let hidden_removed = edges::remove_hidden(&mut edges, &hidden);
        drop(hidden);

        let before_restriction = edges.len();
        let edges = restrict_to_subtrees(edges, &options.top_levels);
        let restricted_removed = before_restriction - edges.len();

        let graph = CategoryGraph::from_edges(&edges);
        drop(edges);

        let root = graph
            .id(&options.root)
            .ok_or_else(|| BuildError::RootNotFound(options.root.clone()))?;
        let depths = assign_depths(&graph, root, options.strategy, options.progress_interval);
        let (dag, counts) = project(graph.rows(), &depths);

        let mut stats = HierarchyStats::collect(&graph, &depths, counts, dag.len());
        stats.hidden_removed = hidden_removed;
        stats.restricted_removed = restricted_removed;

        let hierarchy = Self::assemble(graph.into_nodes().freeze(), depths, dag);
        info!(
            nodes = stats.node_count,
            resolved = stats.resolved,
            dag_edges = stats.dag_edges,
            dropped = stats.projection.dropped(),
            max_depth = stats.max_depth,
            "hierarchy built"
        );
        Ok((hierarchy, stats))
    }

    /// Reassemble a snapshot from a persisted DAG edge table and depth table.
    ///
    /// # Errors
    ///
    /// - [`BuildError::RootNotFound`] if `root` appears in neither table.
    /// - [`BuildError::CorruptSnapshot`] if the root is not at depth 0, a
    ///   node is listed with two depths, or a DAG edge does not descend
    ///   exactly one level.
    #[instrument(skip(dag_edges, depth_rows))]
    pub fn from_parts(
        root: &str,
        dag_edges: impl IntoIterator<Item = Edge>,
        depth_rows: impl IntoIterator<Item = (String, u32)>,
    ) -> Result<Self, BuildError> {
        let mut nodes = NodeTable::new();

        let mut known: HashMap<NodeId, u32> = HashMap::new();
        for (name, depth) in depth_rows {
            let id = nodes.intern(&name);
            if let Some(previous) = known.insert(id, depth) {
                if previous != depth {
                    return Err(BuildError::CorruptSnapshot(format!(
                        "node '{name}' listed at depths {previous} and {depth}"
                    )));
                }
            }
        }

        let rows: Vec<(NodeId, NodeId)> = dag_edges
            .into_iter()
            .map(|edge| (nodes.intern(&edge.item), nodes.intern(&edge.category)))
            .collect();

        let root_id = nodes
            .id(root)
            .ok_or_else(|| BuildError::RootNotFound(root.to_string()))?;
        match known.get(&root_id) {
            Some(0) => {}
            Some(other) => {
                return Err(BuildError::CorruptSnapshot(format!(
                    "root '{root}' stored at depth {other}"
                )));
            }
            None => {
                return Err(BuildError::CorruptSnapshot(format!(
                    "root '{root}' missing from depth table"
                )));
            }
        }

        let mut raw = vec![None; nodes.len()];
        for (id, depth) in known {
            raw[id.index()] = Some(depth);
        }
        let depths = DepthMap::from_raw(root_id, raw);

        for &(item, category) in &rows {
            let class = classify(&depths, item, category);
            if class != EdgeClass::Descending {
                return Err(BuildError::CorruptSnapshot(format!(
                    "edge '{}' -> '{}' is {:?}, expected one level of descent",
                    nodes.name(item),
                    nodes.name(category),
                    class
                )));
            }
        }

        let mut dag = rows;
        dag.sort_unstable();
        dag.dedup();
        Ok(Self::assemble(nodes.freeze(), depths, dag))
    }

    fn assemble(names: NodeNames, depths: DepthMap, dag: Vec<(NodeId, NodeId)>) -> Self {
        let node_count = names.len();
        let parents = AdjacencyList::from_pairs(node_count, dag.iter().copied());
        let children =
            AdjacencyList::from_pairs(node_count, dag.iter().map(|&(item, cat)| (cat, item)));
        let content_hash =
            edges::content_hash(dag.iter().map(|&(i, c)| (names.name(i), names.name(c))));
        Self {
            names,
            depths,
            parents,
            children,
            dag,
            content_hash,
        }
    }

    // -- accessors ----------------------------------------------------------

    /// Name of the root node.
    #[must_use]
    pub fn root(&self) -> &str {
        self.names.name(self.depths.root())
    }

    /// Number of interned nodes, resolved or not.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.names.len()
    }

    /// Number of nodes with a depth.
    #[must_use]
    pub fn resolved_count(&self) -> usize {
        self.depths.resolved_count()
    }

    /// Number of distinct DAG edges.
    #[must_use]
    pub fn dag_edge_count(&self) -> usize {
        self.dag.len()
    }

    /// BLAKE3 hash of the DAG edge set (`blake3:<hex>`).
    ///
    /// Equal hashes mean equal DAGs; callers can key their own caches on it.
    #[must_use]
    pub fn content_hash(&self) -> &str {
        &self.content_hash
    }

    /// Whether `name` appears anywhere in the dataset.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.id(name).is_some()
    }

    /// Minimum depth of `name` below the root.
    #[must_use]
    pub fn depth(&self, name: &str) -> Option<u32> {
        self.names.id(name).and_then(|id| self.depths.get(id))
    }

    /// Largest resolved depth.
    #[must_use]
    pub fn max_depth(&self) -> u32 {
        self.depths.max_depth().unwrap_or(0)
    }

    /// DAG edges as `(item, category)` names, sorted by name.
    #[must_use]
    pub fn dag_edges(&self) -> Vec<(&str, &str)> {
        let mut out: Vec<(&str, &str)> = self
            .dag
            .iter()
            .map(|&(item, category)| (self.name(item), self.name(category)))
            .collect();
        out.sort_unstable();
        out
    }

    /// `(node, depth)` for every resolved node, sorted by depth then name.
    #[must_use]
    pub fn depth_table(&self) -> Vec<(&str, u32)> {
        let mut out: Vec<(&str, u32)> = self
            .depths
            .iter_resolved()
            .map(|(id, depth)| (self.name(id), depth))
            .collect();
        out.sort_unstable_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(b.0)));
        out
    }

    /// Direct DAG parents of `name`; `None` if the node is unknown.
    #[must_use]
    pub fn parents_of(&self, name: &str) -> Option<Vec<&str>> {
        let id = self.names.id(name)?;
        Some(self.parents.get(id).iter().map(|&p| self.name(p)).collect())
    }

    /// Direct DAG children of `name`; `None` if the node is unknown.
    #[must_use]
    pub fn children_of(&self, name: &str) -> Option<Vec<&str>> {
        let id = self.names.id(name)?;
        Some(self.children.get(id).iter().map(|&c| self.name(c)).collect())
    }

    /// Every node at or below `name` in the DAG, `name` first.
    #[must_use]
    pub fn descendants(&self, name: &str) -> Option<Vec<&str>> {
        let id = self.names.id(name)?;
        if !self.depths.is_resolved(id) {
            warn!(node = name, "descendants requested for node outside the hierarchy");
        }
        Some(
            descendant_ids(&self.children, id)
                .into_iter()
                .map(|d| self.name(d))
                .collect(),
        )
    }

    // -- crate-internal id access --------------------------------------------

    pub(crate) fn id(&self, name: &str) -> Option<NodeId> {
        self.names.id(name)
    }

    pub(crate) fn name(&self, id: NodeId) -> &str {
        self.names.name(id)
    }

    pub(crate) fn root_id(&self) -> NodeId {
        self.depths.root()
    }

    pub(crate) fn depth_of(&self, id: NodeId) -> Option<u32> {
        self.depths.get(id)
    }

    pub(crate) fn parent_ids(&self, id: NodeId) -> &[NodeId] {
        self.parents.get(id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
