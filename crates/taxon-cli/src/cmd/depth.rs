//! `tx depth`: depth of one or more nodes in a persisted hierarchy.

use std::io::{self, Write};
use std::path::Path;

use clap::Args;
use serde::Serialize;

use crate::output::{OutputMode, Renderable, render_list};

use super::SnapshotArgs;

/// Arguments for `tx depth`.
#[derive(Args, Debug)]
pub struct DepthArgs {
    /// Nodes to look up.
    #[arg(required = true)]
    pub nodes: Vec<String>,

    #[command(flatten)]
    pub snapshot: SnapshotArgs,
}

#[derive(Debug, Serialize)]
struct DepthRow {
    node: String,
    /// `None` when the node is unknown or not under the root.
    depth: Option<u32>,
}

impl Renderable for DepthRow {
    fn render_human(&self, w: &mut dyn Write) -> io::Result<()> {
        match self.depth {
            Some(depth) => writeln!(w, "{:<40} {depth}", self.node),
            None => writeln!(w, "{:<40} (not connected)", self.node),
        }
    }

    fn render_table(&self, w: &mut dyn Write) -> io::Result<()> {
        let depth = self.depth.map_or_else(|| "-".to_string(), |d| d.to_string());
        writeln!(w, "{}\t{depth}", self.node)
    }

    fn table_headers() -> &'static [&'static str] {
        &["node", "depth"]
    }
}

/// Execute `tx depth`.
pub fn run_depth(args: &DepthArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let hierarchy = args.snapshot.load(output, project_root)?;
    let rows: Vec<DepthRow> = args
        .nodes
        .iter()
        .map(|node| DepthRow {
            node: node.clone(),
            depth: hierarchy.depth(node),
        })
        .collect();
    render_list(&rows, output)
}
