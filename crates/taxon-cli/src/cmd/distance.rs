//! `tx distance`: categorical distance between two categories.

use std::io::Write;
use std::path::Path;

use clap::Args;
use serde::Serialize;

use crate::output::{CliError, OutputMode, render, render_error};

use super::SnapshotArgs;

/// Arguments for `tx distance`.
#[derive(Args, Debug)]
pub struct DistanceArgs {
    pub a: String,
    pub b: String,

    #[command(flatten)]
    pub snapshot: SnapshotArgs,
}

#[derive(Debug, Serialize)]
struct DistanceOutput<'a> {
    a: &'a str,
    b: &'a str,
    distance: u32,
}

/// Execute `tx distance`.
pub fn run_distance(
    args: &DistanceArgs,
    output: OutputMode,
    project_root: &Path,
) -> anyhow::Result<()> {
    let hierarchy = args.snapshot.load(output, project_root)?;
    let distance = match hierarchy.categorical_distance(&args.a, &args.b) {
        Ok(distance) => distance,
        Err(err) => {
            render_error(output, &CliError::from_code(err.code(), err.to_string()))?;
            anyhow::bail!(err);
        }
    };

    let payload = DistanceOutput {
        a: &args.a,
        b: &args.b,
        distance,
    };
    render(output, &payload, |p, w| writeln!(w, "{}", p.distance))
}
