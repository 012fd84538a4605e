use proptest::prelude::*;
use taxon_core::graph::Edge;

/// Name used for the root in generated graphs.
pub const ROOT: &str = "N0";

pub fn node_name(idx: usize) -> String {
    format!("N{idx}")
}

/// Arbitrary `(item, category)` index pairs over `nodes` nodes. Cycles,
/// self-loops, duplicates, and unreachable islands all occur.
pub fn arb_raw_edges(nodes: usize, max_edges: usize) -> impl Strategy<Value = Vec<Edge>> + Clone {
    prop::collection::vec((0..nodes, 0..nodes), 1..max_edges).prop_map(|pairs| {
        pairs
            .into_iter()
            .map(|(item, category)| Edge::new(node_name(item), node_name(category)))
            .collect()
    })
}

/// Raw edges guaranteed to mention the root, so builds never fail on it.
pub fn arb_rooted_edges() -> impl Strategy<Value = Vec<Edge>> + Clone {
    (arb_raw_edges(24, 80), 1usize..24).prop_map(|(mut edges, first_child)| {
        edges.push(Edge::new(node_name(first_child), ROOT));
        edges
    })
}

/// A generated hierarchy together with a pair of node names to query.
pub fn arb_rooted_with_queries()
-> impl Strategy<Value = (Vec<Edge>, String, String)> + Clone {
    (arb_rooted_edges(), 0usize..24, 0usize..24)
        .prop_map(|(edges, a, b)| (edges, node_name(a), node_name(b)))
}

/// Two lists of node names for commonality queries.
pub fn arb_name_lists() -> impl Strategy<Value = (Vec<String>, Vec<String>)> + Clone {
    (
        prop::collection::vec((0usize..28).prop_map(node_name), 0..6),
        prop::collection::vec((0usize..28).prop_map(node_name), 0..6),
    )
}
