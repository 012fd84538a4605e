//! `tx path`: the path from a node up to the root, or to a chosen ancestor.

use std::io::Write;
use std::path::Path;

use clap::Args;
use serde::Serialize;
use taxon_core::ErrorCode;

use crate::output::{CliError, OutputMode, pretty_kv, render_error, render_mode};

use super::SnapshotArgs;

/// Arguments for `tx path`.
#[derive(Args, Debug)]
pub struct PathArgs {
    /// Starting node.
    pub node: String,

    /// Stop at this ancestor instead of the root.
    #[arg(long)]
    pub ancestor: Option<String>,

    #[command(flatten)]
    pub snapshot: SnapshotArgs,
}

#[derive(Debug, Serialize)]
struct PathOutput<'a> {
    node: &'a str,
    ancestor: &'a str,
    depth: Option<u32>,
    path: Vec<&'a str>,
}

/// Execute `tx path`.
pub fn run_path(args: &PathArgs, output: OutputMode, project_root: &Path) -> anyhow::Result<()> {
    let hierarchy = args.snapshot.load(output, project_root)?;
    let ancestor = args.ancestor.as_deref().unwrap_or_else(|| hierarchy.root());

    let found = match &args.ancestor {
        Some(target) => hierarchy.path_between(&args.node, target),
        None => hierarchy.path_to_root(&args.node),
    };
    let Some(path) = found else {
        render_error(
            output,
            &CliError::from_code(
                ErrorCode::Disconnected,
                format!("no path from '{}' to '{ancestor}'", args.node),
            ),
        )?;
        anyhow::bail!("no path from '{}' to '{ancestor}'", args.node);
    };

    let payload = PathOutput {
        node: &args.node,
        ancestor,
        depth: hierarchy.depth(&args.node),
        path,
    };
    render_mode(
        output,
        &payload,
        |p, w| {
            for step in std::iter::once(p.node).chain(p.path.iter().copied()) {
                writeln!(w, "{step}")?;
            }
            Ok(())
        },
        |p, w| {
            pretty_kv(w, "node", p.node)?;
            pretty_kv(w, "depth", p.depth.map_or_else(|| "-".to_string(), |d| d.to_string()))?;
            pretty_kv(w, "steps", p.path.len().to_string())?;
            let chain: Vec<&str> = std::iter::once(p.node).chain(p.path.iter().copied()).collect();
            pretty_kv(w, "path", chain.join(" → "))
        },
    )
}
