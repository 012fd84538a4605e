//! On-disk formats.
//!
//! - [`tsv`]: reader/writer-level parsing of the tab-separated tables.
//! - [`snapshot`]: file-level helpers for raw dumps and persisted snapshots.

pub mod snapshot;
pub mod tsv;

pub use snapshot::{load_snapshot, read_edges_file, read_node_list_file, save_snapshot};
pub use tsv::TsvError;
