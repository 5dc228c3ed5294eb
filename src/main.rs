//! moog-setup - build and install MOOG
//!
//! Resolves the host platform and Fortran compiler, fills in the checked-in
//! makefile templates of a MOOG checkout, builds every variant for the host,
//! restores the templates and installs the binaries.

use clap::Parser;
use miette::Diagnostic;
use tracing_subscriber::EnvFilter;

mod build;
mod cli;
mod commands;
mod config;
mod error;
mod hash;
mod installer;
mod interrupt;
mod lock;
mod operations;
mod platform;
mod progress;
mod restore;
mod template;
mod toolchain;

#[cfg(test)]
mod test_fixtures;

use cli::{Cli, Commands};
use error::SetupError;

fn init_tracing(verbose: bool) {
    let default = if verbose { "moog_setup=info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn report(e: &SetupError) {
    eprintln!("Error: {e}");
    if let Some(help) = e.help() {
        eprintln!("  help: {help}");
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Install(args) => commands::install::run(cli.repo, args),
        Commands::Restore(args) => commands::restore::run(cli.repo, args).map(|()| 0),
        Commands::Version => commands::version::run().map(|()| 0),
        Commands::Completions(args) => commands::completions::run(args).map(|()| 0),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            report(&e);
            std::process::exit(e.exit_code());
        }
    }
}
