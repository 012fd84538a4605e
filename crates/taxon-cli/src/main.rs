#![forbid(unsafe_code)]

mod cmd;
mod output;

use clap::{CommandFactory, Parser, Subcommand};
use output::{OutputMode, resolve_output_mode};
use std::env;
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "tx",
    author,
    version,
    about = "taxon: category hierarchy depths, paths, and commonality",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format: pretty, text, or json.
    #[arg(long, value_enum, global = true)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Derive the output mode from flags and environment.
    fn output_mode(&self) -> OutputMode {
        resolve_output_mode(self.format, self.json)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Batch",
        about = "Build and persist the hierarchy snapshot",
        long_about = "Read a raw edge dump, resolve depths under the root, project the graph to a DAG, and write the DAG and depth tables.",
        after_help = "EXAMPLES:\n    # Build with paths from taxon.toml\n    tx build\n\n    # Build from an explicit dump under a different root\n    tx build --edges dump.tsv --root Contents\n\n    # Only keep the science subtree\n    tx build --top-level Branches_of_science"
    )]
    Build(cmd::build::BuildArgs),

    #[command(
        next_help_heading = "Query",
        about = "Show node depths",
        after_help = "EXAMPLES:\n    # Depth of two categories\n    tx depth Physics Optics\n\n    # Emit machine-readable output\n    tx depth Physics --json"
    )]
    Depth(cmd::depth::DepthArgs),

    #[command(
        next_help_heading = "Query",
        about = "Show the path from a node to the root",
        after_help = "EXAMPLES:\n    # Path to the root\n    tx path Optics\n\n    # Path to an intermediate ancestor\n    tx path Optics --ancestor Science"
    )]
    Path(cmd::path::PathArgs),

    #[command(
        next_help_heading = "Query",
        about = "Categorical distance between two categories",
        after_help = "EXAMPLES:\n    tx distance Optics Painting"
    )]
    Distance(cmd::distance::DistanceArgs),

    #[command(
        next_help_heading = "Query",
        about = "Commonality score between two category lists",
        after_help = "EXAMPLES:\n    tx commonality --a Optics,Acoustics --b Painting,Physics"
    )]
    Commonality(cmd::commonality::CommonalityArgs),

    #[command(about = "Generate shell completions")]
    Completions(cmd::completions::CompletionsArgs),
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_env("TAXON_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if verbose || env::var("DEBUG").is_ok() {
            "taxon=debug,info"
        } else {
            "taxon=info,warn"
        })
    });

    let format = env::var("TAXON_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    debug!(command = ?cli.command, "starting");

    let project_root = env::current_dir()?;
    let output = cli.output_mode();

    match cli.command {
        Commands::Build(ref args) => cmd::build::run_build(args, output, &project_root),
        Commands::Depth(ref args) => cmd::depth::run_depth(args, output, &project_root),
        Commands::Path(ref args) => cmd::path::run_path(args, output, &project_root),
        Commands::Distance(ref args) => cmd::distance::run_distance(args, output, &project_root),
        Commands::Commonality(ref args) => {
            cmd::commonality::run_commonality(args, output, &project_root)
        }
        Commands::Completions(ref args) => {
            cmd::completions::run_completions(args, Cli::command(), &mut std::io::stdout());
            Ok(())
        }
    }
}
