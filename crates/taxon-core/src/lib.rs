//! taxon-core library.
//!
//! Turns a raw, cyclic category membership dump into a layered DAG under a
//! chosen root, and answers path, distance, and commonality queries over it.
//!
//! ```text
//! raw edges ─▶ graph::build ─▶ graph::depth ─▶ graph::project ─▶ Hierarchy ─▶ query
//! ```
//!
//! # Conventions
//!
//! - **Errors**: typed `thiserror` enums at library boundaries ([`BuildError`],
//!   [`QueryError`], [`io::TsvError`]), each with an [`ErrorCode`];
//!   `anyhow::Result` for file-level orchestration.
//! - **Logging**: `tracing` macros (`info!`, `warn!`, `debug!`, `trace!`);
//!   batch stages are `#[instrument]`ed.

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod graph;
pub mod hierarchy;
pub mod io;
pub mod query;

pub use error::ErrorCode;
pub use graph::{DepthStrategy, Edge, HierarchyStats};
pub use hierarchy::{BuildError, BuildOptions, DEFAULT_ROOT, Hierarchy};
pub use query::{CommonalityReport, QueryError};
