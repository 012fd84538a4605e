//! `tx build`: run the batch pipeline over a raw edge dump and persist the
//! resulting snapshot.

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use serde::Serialize;
use taxon_core::io::{read_edges_file, read_node_list_file, save_snapshot};
use taxon_core::{DepthStrategy, ErrorCode, Hierarchy, HierarchyStats};
use tracing::{debug, info};

use crate::output::{CliError, OutputMode, pretty_kv, pretty_section, render_error, render_mode};

use super::{input_error_code, project_config, reported};

/// Arguments for `tx build`.
#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Raw `item<TAB>category` edge dump.
    #[arg(long)]
    pub edges: Option<PathBuf>,

    /// Extra hidden categories, one per line.
    #[arg(long)]
    pub hidden: Option<PathBuf>,

    /// Root category depths are measured from.
    #[arg(long)]
    pub root: Option<String>,

    /// Output path for the DAG edge table.
    #[arg(long = "out-dag")]
    pub out_dag: Option<PathBuf>,

    /// Output path for the depth table.
    #[arg(long = "out-depths")]
    pub out_depths: Option<PathBuf>,

    /// Restrict the graph to subtrees under these categories (repeatable).
    #[arg(long = "top-level")]
    pub top_levels: Vec<String>,

    /// Depth assignment algorithm (`frontier` or `relaxation`).
    #[arg(long)]
    pub strategy: Option<DepthStrategy>,

    /// Keep links between hidden categories.
    #[arg(long)]
    pub keep_hidden: bool,
}

#[derive(Debug, Serialize)]
struct BuildReport {
    root: String,
    content_hash: String,
    dag_path: String,
    depths_path: String,
    stats: HierarchyStats,
}

/// Execute `tx build`.
pub fn run_build(args: &BuildArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let config = project_config(output, project_root)?;
    let mut options = config.build_options();
    if let Some(root) = &args.root {
        options.root.clone_from(root);
    }
    if !args.top_levels.is_empty() {
        options.top_levels.clone_from(&args.top_levels);
    }
    if let Some(strategy) = args.strategy {
        options.strategy = strategy;
    }
    if args.keep_hidden {
        options.hidden_marker = None;
    }

    if let Some(hidden) = args.hidden.as_ref().or(config.paths.hidden.as_ref()) {
        options.extra_hidden = read_node_list_file(hidden).map_err(|err| {
            let code = input_error_code(&err);
            reported(output, code, err)
        })?;
        debug!(count = options.extra_hidden.len(), "loaded extra hidden categories");
    }

    let edges_path = args.edges.clone().unwrap_or(config.paths.edges);
    let dag_path = args.out_dag.clone().unwrap_or(config.paths.dag);
    let depths_path = args.out_depths.clone().unwrap_or(config.paths.depths);

    let edges = read_edges_file(&edges_path).map_err(|err| {
        let code = input_error_code(&err);
        reported(output, code, err)
    })?;
    info!(rows = edges.len(), path = %edges_path.display(), "edge dump loaded");

    let (hierarchy, stats) = match Hierarchy::build(edges, &options) {
        Ok(built) => built,
        Err(err) => {
            render_error(output, &CliError::from_code(err.code(), err.to_string()))?;
            anyhow::bail!(err);
        }
    };
    save_snapshot(&hierarchy, &dag_path, &depths_path)
        .map_err(|err| reported(output, ErrorCode::OutputWriteFailed, err))?;

    let report = BuildReport {
        root: hierarchy.root().to_string(),
        content_hash: hierarchy.content_hash().to_string(),
        dag_path: dag_path.display().to_string(),
        depths_path: depths_path.display().to_string(),
        stats,
    };
    render_mode(output, &report, render_build_text, render_build_pretty)
}

fn render_build_text(report: &BuildReport, w: &mut dyn Write) -> std::io::Result<()> {
    let s = &report.stats;
    writeln!(w, "root\t{}", report.root)?;
    writeln!(w, "nodes\t{}", s.node_count)?;
    writeln!(w, "resolved\t{}", s.resolved)?;
    writeln!(w, "dag_edges\t{}", s.dag_edges)?;
    writeln!(w, "dropped\t{}", s.projection.dropped())?;
    writeln!(w, "max_depth\t{}", s.max_depth)?;
    writeln!(w, "content_hash\t{}", report.content_hash)
}

fn render_build_pretty(report: &BuildReport, w: &mut dyn Write) -> std::io::Result<()> {
    let s = &report.stats;
    pretty_section(w, &format!("Hierarchy under {}", report.root))?;
    pretty_kv(w, "rows", s.rows.to_string())?;
    pretty_kv(w, "hidden removed", s.hidden_removed.to_string())?;
    pretty_kv(w, "out of subtree", s.restricted_removed.to_string())?;
    pretty_kv(w, "nodes", s.node_count.to_string())?;
    pretty_kv(w, "links", s.edge_count.to_string())?;
    pretty_kv(w, "raw cycles", s.raw_cycles.to_string())?;
    pretty_kv(
        w,
        "resolved",
        format!("{} ({} unreachable)", s.resolved, s.unresolved),
    )?;
    pretty_kv(w, "max depth", s.max_depth.to_string())?;
    writeln!(w)?;

    pretty_section(w, "Projection")?;
    pretty_kv(w, "kept", s.projection.kept.to_string())?;
    pretty_kv(w, "backward", s.projection.backward.to_string())?;
    pretty_kv(w, "sideways", s.projection.sideways.to_string())?;
    pretty_kv(w, "skipping", s.projection.skipping.to_string())?;
    pretty_kv(w, "unresolved", s.projection.unresolved.to_string())?;
    pretty_kv(w, "dag edges", s.dag_edges.to_string())?;
    writeln!(w)?;

    pretty_section(w, "Depths")?;
    for (depth, count) in &s.depth_histogram {
        pretty_kv(w, &depth.to_string(), count.to_string())?;
    }
    writeln!(w)?;

    pretty_kv(w, "dag", &report.dag_path)?;
    pretty_kv(w, "depths", &report.depths_path)?;
    pretty_kv(w, "hash", &report.content_hash)
}
