//! Restricting an edge list to the subtrees under chosen top-level categories.
//!
//! A full category dump covers every topic. Some consumers only care about,
//! say, `Branches_of_science` and `Fields_of_mathematics`.
//! [`restrict_to_subtrees`] keeps an edge only when both its item and its
//! category lie at or below one of the chosen top levels.

use std::collections::HashSet;

use tracing::{debug, instrument, warn};

use super::build::{CategoryGraph, ChildTree};
use super::edges::Edge;
use super::nodes::NodeId;

/// Every node reachable from `top` through the child tree, `top` included.
///
/// The raw graph is cyclic, so each node is expanded once.
#[must_use]
pub fn descendant_ids(children: &ChildTree, top: NodeId) -> Vec<NodeId> {
    let mut seen = vec![false; children.len()];
    let mut out = Vec::new();
    let mut stack = vec![top];
    while let Some(node) = stack.pop() {
        match seen.get_mut(node.index()) {
            Some(flag) if !*flag => *flag = true,
            _ => continue,
        }
        out.push(node);
        stack.extend(children.get(node).iter().copied());
    }
    out
}

/// Names of every node at or below `top`, or `None` if `top` is unknown.
#[must_use]
pub fn descendants<'g>(graph: &'g CategoryGraph, top: &str) -> Option<HashSet<&'g str>> {
    let id = graph.id(top)?;
    Some(
        descendant_ids(graph.child_tree(), id)
            .into_iter()
            .map(|id| graph.name(id))
            .collect(),
    )
}

/// Keep only edges whose item and category both lie under some top level.
///
/// Unknown top levels are logged and ignored. An empty `top_levels` keeps
/// everything.
#[must_use]
#[instrument(skip(edges), fields(rows = edges.len()))]
pub fn restrict_to_subtrees(edges: Vec<Edge>, top_levels: &[String]) -> Vec<Edge> {
    if top_levels.is_empty() {
        return edges;
    }

    let viable: HashSet<String> = {
        let graph = CategoryGraph::from_edges(&edges);
        let mut viable = HashSet::new();
        for top in top_levels {
            match descendants(&graph, top) {
                Some(names) => viable.extend(names.into_iter().map(str::to_string)),
                None => warn!(top_level = %top, "top-level category not present in edges"),
            }
        }
        viable
    };

    let before = edges.len();
    let kept: Vec<Edge> = edges
        .into_iter()
        .filter(|edge| viable.contains(&edge.item) && viable.contains(&edge.category))
        .collect();
    debug!(
        before,
        after = kept.len(),
        viable = viable.len(),
        "restricted edges to top-level subtrees"
    );
    kept
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edges(rows: &[(&str, &str)]) -> Vec<Edge> {
        rows.iter().map(|&(i, c)| Edge::new(i, c)).collect()
    }

    #[test]
    fn descendants_include_top_and_survive_cycles() {
        let rows = edges(&[("A", "Top"), ("B", "A"), ("Top", "B"), ("Z", "Other")]);
        let graph = CategoryGraph::from_edges(&rows);
        let mut names: Vec<_> = descendants(&graph, "Top")
            .unwrap_or_default()
            .into_iter()
            .collect();
        names.sort_unstable();
        assert_eq!(names, ["A", "B", "Top"]);
    }

    #[test]
    fn descendants_of_unknown_is_none() {
        let graph = CategoryGraph::from_edges(&edges(&[("A", "Top")]));
        assert!(descendants(&graph, "Nope").is_none());
    }

    #[test]
    fn restriction_keeps_edges_inside_subtrees_only() {
        let rows = edges(&[
            ("Physics", "Science"),
            ("Optics", "Physics"),
            ("Science", "Root"),
            ("Painting", "Art"),
            ("Optics", "Art"),
        ]);
        let kept = restrict_to_subtrees(rows, &["Science".to_string()]);
        assert_eq!(
            kept,
            edges(&[("Physics", "Science"), ("Optics", "Physics")])
        );
    }

    #[test]
    fn union_of_several_top_levels() {
        let rows = edges(&[("Physics", "Science"), ("Painting", "Art"), ("X", "Y")]);
        let kept = restrict_to_subtrees(rows, &["Science".to_string(), "Art".to_string()]);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn empty_top_levels_is_identity() {
        let rows = edges(&[("A", "B")]);
        assert_eq!(restrict_to_subtrees(rows.clone(), &[]), rows);
    }
}
