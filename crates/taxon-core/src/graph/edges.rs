//! Raw membership edges and the denoising filters applied before building.
//!
//! An [`Edge`] `(item, category)` reads "`item` is classified under
//! `category`". Edge lists come straight from a category dump and are not
//! deduplicated; every consumer treats them with set semantics.
//!
//! ## Hidden categories
//!
//! Dumps tag their maintenance categories ("Articles with short
//! description", "Use mdy dates", ...) as members of one marker category.
//! Rows linking two such hidden categories carry no topical signal, so
//! [`remove_hidden`] drops every edge whose item *and* category are hidden.
//! Edges from real articles into a hidden category survive; they never reach
//! the root and fall out during depth resolution anyway.

use std::collections::{BTreeSet, HashSet};

use tracing::debug;

/// Marker category whose members are administrative categories.
pub const DEFAULT_HIDDEN_MARKER: &str = "Hidden_categories";

/// One `(item, category)` membership row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge {
    /// The member (article or subcategory).
    pub item: String,
    /// The containing category.
    pub category: String,
}

impl Edge {
    pub fn new(item: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            category: category.into(),
        }
    }
}

impl<I: Into<String>, C: Into<String>> From<(I, C)> for Edge {
    fn from((item, category): (I, C)) -> Self {
        Self::new(item, category)
    }
}

/// Collect the hidden set: every direct member of `marker`, plus `extra`.
#[must_use]
pub fn hidden_categories<'a>(
    edges: &[Edge],
    marker: Option<&str>,
    extra: impl IntoIterator<Item = &'a str>,
) -> HashSet<String> {
    let mut hidden: HashSet<String> = extra.into_iter().map(str::to_string).collect();
    if let Some(marker) = marker {
        hidden.extend(
            edges
                .iter()
                .filter(|edge| edge.category == marker)
                .map(|edge| edge.item.clone()),
        );
    }
    hidden
}

/// Drop every edge whose item and category are both hidden.
///
/// Returns the number of removed rows.
pub fn remove_hidden(edges: &mut Vec<Edge>, hidden: &HashSet<String>) -> usize {
    if hidden.is_empty() {
        return 0;
    }
    let before = edges.len();
    edges.retain(|edge| !(hidden.contains(&edge.item) && hidden.contains(&edge.category)));
    let removed = before - edges.len();
    debug!(removed, hidden = hidden.len(), "removed hidden category links");
    removed
}

/// Every node mentioned by `edges`, as item or as category.
#[must_use]
pub fn mentioned_nodes(edges: &[Edge]) -> BTreeSet<&str> {
    edges
        .iter()
        .flat_map(|edge| [edge.item.as_str(), edge.category.as_str()])
        .collect()
}

/// BLAKE3 hash of an edge set, independent of row order and duplicates.
#[must_use]
pub fn content_hash<'a>(edges: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let sorted: BTreeSet<(&str, &str)> = edges.into_iter().collect();
    let mut hasher = blake3::Hasher::new();
    for (item, category) in sorted {
        hasher.update(item.as_bytes());
        hasher.update(b"\x00");
        hasher.update(category.as_bytes());
        hasher.update(b"\x00");
    }
    format!("blake3:{}", hasher.finalize())
}
