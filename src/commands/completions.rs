//! Shell completions command

use clap::CommandFactory;
use clap_complete::Shell;
use std::io::Write;

use crate::cli::CompletionsArgs;
use crate::error::Result;

/// Generate shell completions to stdout
pub fn run(args: CompletionsArgs) -> Result<()> {
    generate(args.shell, &mut std::io::stdout().lock());
    Ok(())
}

fn generate(shell: Shell, out: &mut dyn Write) {
    let mut cmd = <crate::cli::Cli as CommandFactory>::command();
    clap_complete::generate(shell, &mut cmd, "moog-setup", out);
}
