//! Batch construction of the category hierarchy.
//!
//! ## Pipeline
//!
//! ```text
//! Vec<Edge>  (item, category) rows from a category dump
//!        ↓  edges::remove_hidden / subtree::restrict_to_subtrees
//! Vec<Edge>  denoised rows
//!        ↓  build::GraphBuilder::finish()
//! CategoryGraph (child tree + parent tree, cyclic)
//!        ↓  depth::assign_depths()
//! DepthMap (minimum depth below the root, None when unreachable)
//!        ↓  project::project()
//! DAG edges (depth(item) == depth(category) + 1)
//! ```
//!
//! [`crate::Hierarchy::build`] runs the whole pipeline and freezes the result.

pub mod build;
pub mod depth;
pub mod edges;
pub mod nodes;
pub mod project;
pub mod stats;
pub mod subtree;

pub use build::{AdjacencyList, CategoryGraph, ChildTree, GraphBuilder, ParentTree};
pub use depth::{DepthMap, DepthStrategy, assign_depths};
pub use edges::{Edge, hidden_categories, mentioned_nodes, remove_hidden};
pub use nodes::{NodeId, NodeNames, NodeTable};
pub use project::{EdgeClass, ProjectionCounts, classify, project};
pub use stats::HierarchyStats;
pub use subtree::{descendants, restrict_to_subtrees};
