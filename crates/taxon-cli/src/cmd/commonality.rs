//! `tx commonality`: relatedness score between two category lists.

use std::io::Write;
use std::path::Path;

use clap::Args;
use taxon_core::CommonalityReport;

use crate::output::{
    CliError, OutputMode, pretty_kv, pretty_section, render_error, render_mode,
};

use super::SnapshotArgs;

/// Arguments for `tx commonality`.
#[derive(Args, Debug)]
pub struct CommonalityArgs {
    /// First category list, comma separated.
    #[arg(long, value_delimiter = ',')]
    pub a: Vec<String>,

    /// Second category list, comma separated.
    #[arg(long, value_delimiter = ',')]
    pub b: Vec<String>,

    #[command(flatten)]
    pub snapshot: SnapshotArgs,
}

/// Execute `tx commonality`.
pub fn run_commonality(
    args: &CommonalityArgs,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let hierarchy = args.snapshot.load(output, project_root)?;
    let report = match hierarchy.commonality_report(&args.a, &args.b) {
        Ok(report) => report,
        Err(err) => {
            render_error(output, &CliError::from_code(err.code(), err.to_string()))?;
            anyhow::bail!(err);
        }
    };
    render_mode(
        output,
        &report,
        |r, w| writeln!(w, "{}", r.score),
        render_commonality_pretty,
    )
}

fn join_minima(values: &[u32]) -> String {
    values
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_commonality_pretty(report: &CommonalityReport, w: &mut dyn Write) -> std::io::Result<()> {
    pretty_section(w, "Commonality")?;
    pretty_kv(w, "score", format!("{:.4}", report.score))?;
    pretty_kv(w, "a", report.kept_a.join(", "))?;
    pretty_kv(w, "b", report.kept_b.join(", "))?;
    pretty_kv(w, "best for a", join_minima(&report.row_minima))?;
    pretty_kv(w, "best for b", join_minima(&report.column_minima))?;
    if !report.disconnected.is_empty() {
        pretty_kv(w, "skipped", report.disconnected.join(", "))?;
    }
    Ok(())
}
