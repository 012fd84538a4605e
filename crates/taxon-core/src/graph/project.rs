//! Acyclic projection: keep only edges that descend exactly one level.
//!
//! An edge `(item, category)` survives iff both endpoints are resolved and
//! `depth(item) == depth(category) + 1`. Every other edge is inconsistent
//! with a single distance-from-root and is dropped:
//!
//! | kind        | condition                               |
//! |-------------|-----------------------------------------|
//! | unresolved  | either endpoint unreachable from root    |
//! | backward    | `depth(item) < depth(category)`          |
//! | sideways    | `depth(item) == depth(category)`         |
//! | skipping    | `depth(item) > depth(category) + 1`      |
//!
//! The surviving edges form a layered DAG: depth strictly increases along
//! every edge, so no cycle can remain.

use serde::Serialize;
use tracing::{debug, instrument};

use super::depth::DepthMap;
use super::nodes::NodeId;

/// How an edge relates to the depth assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeClass {
    /// `depth(item) == depth(category) + 1`.
    Descending,
    /// Points toward the root.
    Backward,
    /// Both endpoints at the same depth.
    Sideways,
    /// Descends more than one level.
    Skipping,
    /// At least one endpoint has no depth.
    Unresolved,
}

/// Classify the edge `(item, category)` against `depths`.
#[must_use]
pub fn classify(depths: &DepthMap, item: NodeId, category: NodeId) -> EdgeClass {
    let (Some(item_depth), Some(category_depth)) = (depths.get(item), depths.get(category)) else {
        return EdgeClass::Unresolved;
    };
    match i64::from(item_depth) - i64::from(category_depth) {
        1 => EdgeClass::Descending,
        0 => EdgeClass::Sideways,
        d if d < 0 => EdgeClass::Backward,
        _ => EdgeClass::Skipping,
    }
}

/// Counts of kept and dropped rows by [`EdgeClass`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ProjectionCounts {
    pub kept: usize,
    pub backward: usize,
    pub sideways: usize,
    pub skipping: usize,
    pub unresolved: usize,
}

impl ProjectionCounts {
    fn record(&mut self, class: EdgeClass) {
        match class {
            EdgeClass::Descending => self.kept += 1,
            EdgeClass::Backward => self.backward += 1,
            EdgeClass::Sideways => self.sideways += 1,
            EdgeClass::Skipping => self.skipping += 1,
            EdgeClass::Unresolved => self.unresolved += 1,
        }
    }

    /// Total dropped rows.
    #[must_use]
    pub const fn dropped(&self) -> usize {
        self.backward + self.sideways + self.skipping + self.unresolved
    }
}

/// Filter `rows` down to the depth-consistent edges.
///
/// Kept edges are returned sorted and deduplicated.
#[must_use]
#[instrument(skip_all, fields(rows = rows.len()))]
pub fn project(
    rows: &[(NodeId, NodeId)],
    depths: &DepthMap,
) -> (Vec<(NodeId, NodeId)>, ProjectionCounts) {
    let mut counts = ProjectionCounts::default();
    let mut kept: Vec<(NodeId, NodeId)> = rows
        .iter()
        .copied()
        .filter(|&(item, category)| {
            let class = classify(depths, item, category);
            counts.record(class);
            class == EdgeClass::Descending
        })
        .collect();
    kept.sort_unstable();
    kept.dedup();
    debug!(
        kept = counts.kept,
        dropped = counts.dropped(),
        distinct = kept.len(),
        "acyclic projection complete"
    );
    (kept, counts)
}
