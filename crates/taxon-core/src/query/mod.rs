//! Query-time surface over a frozen [`Hierarchy`](crate::Hierarchy).
//!
//! - [`path`]: root paths and ancestor paths.
//! - [`commonality`]: pairwise distance and list-to-list commonality.
//!
//! All queries take `&self` and never mutate the snapshot.

pub mod commonality;
pub mod path;

pub use commonality::{CommonalityReport, QueryError};
