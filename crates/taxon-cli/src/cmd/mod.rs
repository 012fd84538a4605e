//! Subcommand implementations for `tx`.
//!
//! Query commands share [`SnapshotArgs`] to locate and load a persisted
//! hierarchy. Failures are rendered through the output layer with an
//! [`ErrorCode`] before being propagated.

pub mod build;
pub mod commonality;
pub mod completions;
pub mod depth;
pub mod distance;
pub mod path;

use std::path::{Path, PathBuf};

use clap::Args;
use taxon_core::config::{TaxonConfig, load_config};
use taxon_core::io::{TsvError, load_snapshot};
use taxon_core::{BuildError, ErrorCode, Hierarchy};

use crate::output::{CliError, OutputMode, render_error};

/// Where to find the persisted hierarchy. Defaults come from `taxon.toml`.
#[derive(Args, Debug, Default, Clone, PartialEq, Eq)]
pub struct SnapshotArgs {
    /// DAG edge table written by `tx build`.
    #[arg(long)]
    pub dag: Option<PathBuf>,

    /// Depth table written by `tx build`.
    #[arg(long)]
    pub depths: Option<PathBuf>,

    /// Root category the snapshot was built under.
    #[arg(long)]
    pub root: Option<String>,
}

/// Render `err` under `code` and hand it back for propagation.
pub fn reported(output: OutputMode, code: ErrorCode, err: anyhow::Error) -> anyhow::Error {
    match render_error(output, &CliError::from_code(code, format!("{err:#}"))) {
        Ok(()) => err,
        Err(render_err) => render_err.context(err.to_string()),
    }
}

/// Best error code for a failure while reading input files.
pub fn input_error_code(err: &anyhow::Error) -> ErrorCode {
    if let Some(tsv) = err.downcast_ref::<TsvError>() {
        return tsv.code();
    }
    if let Some(build) = err.downcast_ref::<BuildError>() {
        return build.code();
    }
    ErrorCode::InputUnreadable
}

/// Load `taxon.toml` from the project root with paths resolved against it.
pub fn project_config(output: OutputMode, project_root: &Path) -> anyhow::Result<TaxonConfig> {
    load_config(project_root)
        .map(|config| config.resolve_paths(project_root))
        .map_err(|err| reported(output, ErrorCode::ConfigParseError, err))
}

impl SnapshotArgs {
    /// Load the snapshot, rendering a structured error if it is missing or
    /// inconsistent.
    pub fn load(&self, output: OutputMode, project_root: &Path) -> anyhow::Result<Hierarchy> {
        let config = project_config(output, project_root)?;
        let dag = self.dag.clone().unwrap_or(config.paths.dag);
        let depths = self.depths.clone().unwrap_or(config.paths.depths);
        let root = self.root.clone().unwrap_or(config.hierarchy.root);

        for path in [&dag, &depths] {
            if !path.exists() {
                render_error(
                    output,
                    &CliError::with_details(
                        format!("hierarchy snapshot not found: {}", path.display()),
                        "run `tx build` to generate the DAG and depth tables",
                        ErrorCode::InputUnreadable.code(),
                    ),
                )?;
                anyhow::bail!("snapshot not found");
            }
        }

        load_snapshot(&root, &dag, &depths).map_err(|err| {
            let code = input_error_code(&err);
            reported(output, code, err)
        })
    }
}
