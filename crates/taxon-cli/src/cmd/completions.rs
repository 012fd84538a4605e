//! `tx completions`: shell completion scripts.

use std::io::Write;

use clap::{Args, Command};
use clap_complete::{Shell, generate};

/// Arguments for `tx completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script generation.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Write the completion script for `command` to `out`, named after the
/// command's binary.
pub fn run_completions(args: &CompletionsArgs, mut command: Command, out: &mut dyn Write) {
    let bin = command.get_name().to_string();
    generate(args.shell, &mut command, bin, out);
}
