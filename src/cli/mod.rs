//! CLI definitions using clap derive API
//!
//! One submodule per command's argument type:
//! - install: Install command arguments
//! - restore: Restore command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod completions;
pub mod install;
pub mod restore;

pub use completions::CompletionsArgs;
pub use install::InstallArgs;
pub use restore::RestoreArgs;

/// moog-setup - build and install MOOG
///
/// Stages the MOOG makefile templates for this host, builds every variant,
/// puts the templates back, and installs the binaries.
#[derive(Parser, Debug)]
#[command(
    name = "moog-setup",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Build and install the MOOG spectral synthesis code",
    long_about = "moog-setup resolves the host platform and Fortran compiler, fills in the \
                  checked-in makefile templates, builds the interactive and silent MOOG \
                  front ends, restores the templates, and installs the binaries.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  moog-setup install                         \x1b[90m# Build and install into /usr/local/bin\x1b[0m\n   \
                  moog-setup install --prefix ~/.local/bin   \x1b[90m# Install somewhere writable\x1b[0m\n   \
                  moog-setup install --dry-run               \x1b[90m# Build only\x1b[0m\n   \
                  moog-setup restore                         \x1b[90m# Undo a run that was killed mid-build\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// MOOG repository root (defaults to current directory)
    #[arg(long, short = 'r', global = true, env = "MOOG_SETUP_REPO")]
    pub repo: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build MOOG and install the binaries
    Install(InstallArgs),

    /// Restore templates left staged by an interrupted run
    Restore(RestoreArgs),

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
