//! Distance and commonality between categories.
//!
//! # Distance
//!
//! Each category is prefixed to its own root path, `[c, parent, ..., root]`.
//! The distance between `a` and `b` is the smallest `i + j + 1` over index
//! pairs where `path_a[i] == path_b[j]`. Identical categories meet at
//! `i = j = 0` and so sit at distance 1, never 0.
//!
//! # Commonality
//!
//! Given category lists `A` and `B`, categories without a root path are
//! dropped first. If either side ends up empty the score is 0. Otherwise
//! the pairwise distance matrix is reduced to its row minima (best match in
//! `B` for each `a`) and column minima (best match in `A` for each `b`), and
//! the score is the reciprocal of the mean of both sets of minima together.
//! Using both directions keeps the score symmetric and stops the shorter
//! list from dominating.
//!
//! Distances are at least 1, so the score lies in `(0, 1]` whenever it is
//! non-zero. It reaches exactly 1 when every category on each side has an
//! identical partner on the other. The score is not clamped.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::ErrorCode;
use crate::graph::nodes::NodeId;
use crate::hierarchy::Hierarchy;

/// Errors from a single distance or commonality query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// The category is unknown or has no path to the root.
    #[error("category '{0}' is not connected to the hierarchy root")]
    Disconnected(String),
    /// Two root paths share no node. Every root path ends at the root, so
    /// this indicates a corrupt snapshot.
    #[error("root paths of '{a}' and '{b}' share no common ancestor")]
    NoCommonAncestor { a: String, b: String },
}

impl QueryError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Disconnected(_) => ErrorCode::Disconnected,
            Self::NoCommonAncestor { .. } => ErrorCode::NoCommonAncestor,
        }
    }
}

/// Full breakdown of a commonality computation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommonalityReport {
    /// `1 / mean(row_minima ++ column_minima)`, or 0.
    pub score: f64,
    /// Connected categories of the first list, in input order.
    pub kept_a: Vec<String>,
    /// Connected categories of the second list, in input order.
    pub kept_b: Vec<String>,
    /// Inputs dropped for having no root path.
    pub disconnected: Vec<String>,
    /// Best distance to `kept_b` for each entry of `kept_a`.
    pub row_minima: Vec<u32>,
    /// Best distance to `kept_a` for each entry of `kept_b`.
    pub column_minima: Vec<u32>,
}

impl Hierarchy {
    /// Distance between two categories through their nearest shared
    /// ancestor.
    ///
    /// # Errors
    ///
    /// - [`QueryError::Disconnected`] if either category has no root path.
    /// - [`QueryError::NoCommonAncestor`] if the paths never meet.
    pub fn categorical_distance(&self, a: &str, b: &str) -> Result<u32, QueryError> {
        let path_a = self
            .chain(a)
            .ok_or_else(|| QueryError::Disconnected(a.to_string()))?;
        let path_b = self
            .chain(b)
            .ok_or_else(|| QueryError::Disconnected(b.to_string()))?;
        chain_distance(&path_a, &path_b).ok_or_else(|| QueryError::NoCommonAncestor {
            a: a.to_string(),
            b: b.to_string(),
        })
    }

    /// Symmetric relatedness score between two category lists.
    ///
    /// Disconnected or unknown categories are skipped. Returns 0 when either
    /// list has no connected category.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::NoCommonAncestor`] only on a corrupt snapshot.
    pub fn categorical_commonality<A, B>(&self, a: &[A], b: &[B]) -> Result<f64, QueryError>
    where
        A: AsRef<str>,
        B: AsRef<str>,
    {
        self.commonality_report(a, b).map(|report| report.score)
    }

    /// [`Hierarchy::categorical_commonality`] with the intermediate minima.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::NoCommonAncestor`] only on a corrupt snapshot.
    #[allow(clippy::cast_precision_loss)]
    pub fn commonality_report<A, B>(&self, a: &[A], b: &[B]) -> Result<CommonalityReport, QueryError>
    where
        A: AsRef<str>,
        B: AsRef<str>,
    {
        let mut cache: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
        let mut disconnected = Vec::new();
        let side_a = self.connected_side(a, &mut cache, &mut disconnected);
        let side_b = self.connected_side(b, &mut cache, &mut disconnected);

        let mut report = CommonalityReport {
            score: 0.0,
            kept_a: side_a.iter().map(|&id| self.name(id).to_string()).collect(),
            kept_b: side_b.iter().map(|&id| self.name(id).to_string()).collect(),
            disconnected,
            row_minima: Vec::new(),
            column_minima: Vec::new(),
        };
        if side_a.is_empty() || side_b.is_empty() {
            debug!(
                kept_a = side_a.len(),
                kept_b = side_b.len(),
                "commonality short-circuits to zero"
            );
            return Ok(report);
        }

        let mut rows = vec![u32::MAX; side_a.len()];
        let mut columns = vec![u32::MAX; side_b.len()];
        for (i, &x) in side_a.iter().enumerate() {
            for (j, &y) in side_b.iter().enumerate() {
                let d = match (cache.get(&x), cache.get(&y)) {
                    (Some(px), Some(py)) => chain_distance(px, py),
                    _ => None,
                }
                .ok_or_else(|| QueryError::NoCommonAncestor {
                    a: self.name(x).to_string(),
                    b: self.name(y).to_string(),
                })?;
                rows[i] = rows[i].min(d);
                columns[j] = columns[j].min(d);
            }
        }

        let total: f64 = rows.iter().chain(&columns).map(|&d| f64::from(d)).sum();
        let count = (rows.len() + columns.len()) as f64;
        report.score = count / total;
        report.row_minima = rows;
        report.column_minima = columns;
        trace!(score = report.score, "commonality computed");
        Ok(report)
    }

    /// Resolve names to ids with cached chains, dropping disconnected ones.
    fn connected_side<S: AsRef<str>>(
        &self,
        names: &[S],
        cache: &mut HashMap<NodeId, Vec<NodeId>>,
        disconnected: &mut Vec<String>,
    ) -> Vec<NodeId> {
        let mut kept = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let Some(id) = self.id(name) else {
                disconnected.push(name.to_string());
                continue;
            };
            if !cache.contains_key(&id) {
                match self.chain_ids(id) {
                    Some(chain) => {
                        cache.insert(id, chain);
                    }
                    None => {
                        disconnected.push(name.to_string());
                        continue;
                    }
                }
            }
            kept.push(id);
        }
        kept
    }

    /// `[category, ...root path]`.
    fn chain(&self, name: &str) -> Option<Vec<NodeId>> {
        self.id(name).and_then(|id| self.chain_ids(id))
    }

    fn chain_ids(&self, id: NodeId) -> Option<Vec<NodeId>> {
        let path = self.root_path_ids(id)?;
        let mut chain = Vec::with_capacity(path.len() + 1);
        chain.push(id);
        chain.extend(path);
        Some(chain)
    }
}

/// Smallest `i + j + 1` with `a[i] == b[j]`.
fn chain_distance(a: &[NodeId], b: &[NodeId]) -> Option<u32> {
    let positions: HashMap<NodeId, usize> = b.iter().enumerate().map(|(j, &n)| (n, j)).collect();
    a.iter()
        .enumerate()
        .filter_map(|(i, n)| positions.get(n).map(|&j| i + j + 1))
        .min()
        .map(|d| u32::try_from(d).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::edges::Edge;
    use crate::hierarchy::BuildOptions;

    fn hierarchy(rows: &[(&str, &str)]) -> Hierarchy {
        let edges = rows.iter().map(|&(i, c)| Edge::new(i, c)).collect();
        Hierarchy::build(edges, &BuildOptions::with_root("Root"))
            .expect("build")
            .0
    }

    fn layered() -> Hierarchy {
        hierarchy(&[("A", "Root"), ("B", "Root"), ("C", "A"), ("D", "B"), ("E", "A")])
    }

    #[test]
    fn identity_distance_is_one() {
        let h = layered();
        assert_eq!(h.categorical_distance("C", "C"), Ok(1));
        assert_eq!(h.categorical_distance("Root", "Root"), Ok(1));
    }

    #[test]
    fn siblings_meet_at_their_parent() {
        let h = layered();
        assert_eq!(h.categorical_distance("C", "E"), Ok(3));
        assert_eq!(h.categorical_distance("C", "A"), Ok(2));
    }

    #[test]
    fn cousins_meet_at_root() {
        let h = layered();
        assert_eq!(h.categorical_distance("C", "D"), Ok(5));
        assert_eq!(h.categorical_distance("D", "C"), Ok(5));
    }

    #[test]
    fn disconnected_categories_are_reported() {
        let h = hierarchy(&[("A", "Root"), ("Z", "Y")]);
        assert_eq!(
            h.categorical_distance("A", "Z"),
            Err(QueryError::Disconnected("Z".to_string()))
        );
        let err = h.categorical_distance("Nope", "A").expect_err("unknown");
        assert_eq!(err.code(), ErrorCode::Disconnected);
    }

    #[test]
    fn chain_distance_without_overlap_is_none() {
        let a = [NodeId::try_from_index(0), NodeId::try_from_index(1)];
        let b = [NodeId::try_from_index(2)];
        let a: Vec<NodeId> = a.into_iter().flatten().collect();
        let b: Vec<NodeId> = b.into_iter().flatten().collect();
        assert_eq!(chain_distance(&a, &b), None);
        assert_eq!(chain_distance(&a, &a), Some(1));
    }

    #[test]
    fn empty_sides_score_zero() {
        let h = layered();
        let none: [&str; 0] = [];
        assert_eq!(h.categorical_commonality(&none, &["C"]), Ok(0.0));
        assert_eq!(h.categorical_commonality(&["C"], &none), Ok(0.0));
        assert_eq!(h.categorical_commonality(&["Nope"], &["C"]), Ok(0.0));
    }

    #[test]
    fn identical_lists_score_one() {
        let h = layered();
        let score = h.categorical_commonality(&["C", "D"], &["D", "C"]).unwrap_or(0.0);
        assert!((score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn commonality_uses_row_and_column_minima() {
        let h = layered();
        let report = h.commonality_report(&["C"], &["E", "D"]).expect("report");
        assert_eq!(report.row_minima, [3]);
        assert_eq!(report.column_minima, [3, 5]);
        assert!((report.score - 3.0 / 11.0).abs() < 1e-12);
    }

    #[test]
    fn commonality_is_symmetric() {
        let h = layered();
        let ab = h.categorical_commonality(&["C", "A"], &["E", "D", "B"]).unwrap_or(0.0);
        let ba = h.categorical_commonality(&["E", "D", "B"], &["C", "A"]).unwrap_or(0.0);
        assert!((ab - ba).abs() < 1e-12);
    }

    #[test]
    fn disconnected_inputs_are_filtered_and_recorded() {
        let h = hierarchy(&[("A", "Root"), ("B", "A"), ("Z", "Y")]);
        let report = h
            .commonality_report(&["B", "Z", "Nope"], &["B"])
            .expect("report");
        assert_eq!(report.kept_a, ["B"]);
        assert_eq!(report.disconnected, ["Z", "Nope"]);
        assert!((report.score - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn related_lists_outscore_unrelated_ones() {
        let h = layered();
        let related = h.categorical_commonality(&["C"], &["C", "E"]).unwrap_or(0.0);
        let unrelated = h.categorical_commonality(&["C"], &["D"]).unwrap_or(0.0);
        assert!(related > unrelated);
    }
}
