//! Reading raw dumps and saving/loading hierarchy snapshots on disk.
//!
//! A snapshot is two tables next to each other: the DAG edge table and the
//! depth table. Together with the root name they are enough to rebuild the
//! [`Hierarchy`] without rerunning depth assignment.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, instrument};

use super::tsv;
use crate::graph::edges::Edge;
use crate::hierarchy::Hierarchy;

/// Read an edge table from `path`.
///
/// # Errors
///
/// Returns an error naming `path` if it cannot be opened or parsed.
pub fn read_edges_file(path: &Path) -> Result<Vec<Edge>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    tsv::read_edges(BufReader::new(file))
        .with_context(|| format!("Failed to read edges from {}", path.display()))
}

/// Read a node list (first column) from `path`.
///
/// # Errors
///
/// Returns an error naming `path` if it cannot be opened or parsed.
pub fn read_node_list_file(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    tsv::read_node_list(BufReader::new(file))
        .with_context(|| format!("Failed to read node list from {}", path.display()))
}

fn create(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}

/// Write the DAG edge table and the depth table.
///
/// Parent directories are created as needed.
///
/// # Errors
///
/// Returns an error naming the file that could not be written.
#[instrument(skip(hierarchy))]
pub fn save_snapshot(hierarchy: &Hierarchy, dag_path: &Path, depths_path: &Path) -> Result<()> {
    let edges = tsv::write_edges(create(dag_path)?, hierarchy.dag_edges())
        .with_context(|| format!("Failed to write {}", dag_path.display()))?;
    let depths = tsv::write_depths(create(depths_path)?, hierarchy.depth_table())
        .with_context(|| format!("Failed to write {}", depths_path.display()))?;
    info!(edges, depths, "snapshot saved");
    Ok(())
}

/// Rebuild a [`Hierarchy`] from tables written by [`save_snapshot`].
///
/// # Errors
///
/// Returns an error if either file is unreadable or malformed, or if the
/// tables do not form a valid hierarchy under `root`.
#[instrument]
pub fn load_snapshot(root: &str, dag_path: &Path, depths_path: &Path) -> Result<Hierarchy> {
    let edges = read_edges_file(dag_path)?;
    let file = File::open(depths_path)
        .with_context(|| format!("Failed to open {}", depths_path.display()))?;
    let depths = tsv::read_depths(BufReader::new(file))
        .with_context(|| format!("Failed to read depths from {}", depths_path.display()))?;
    let hierarchy = Hierarchy::from_parts(root, edges, depths)
        .with_context(|| format!("Failed to load snapshot from {}", dag_path.display()))?;
    info!(
        nodes = hierarchy.node_count(),
        dag_edges = hierarchy.dag_edge_count(),
        hash = hierarchy.content_hash(),
        "snapshot loaded"
    );
    Ok(hierarchy)
}
