use clap::Parser;
use std::path::PathBuf;

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Build and install into the default prefix:\n    sudo moog-setup install\n\n\
                   Install into a user directory:\n    moog-setup install --prefix ~/.local/bin\n\n\
                   Build with the legacy compiler:\n    moog-setup install --compiler g77\n\n\
                   Resume after an interrupted run:\n    moog-setup install --recover")]
pub struct InstallArgs {
    /// Directory to install MOOG and MOOGSILENT into [default: /usr/local/bin]
    #[arg(long, short = 'p', value_name = "DIR", env = "MOOG_SETUP_PREFIX")]
    pub prefix: Option<PathBuf>,

    /// Stage, build and restore, but do not install
    #[arg(long)]
    pub dry_run: bool,

    /// Fortran compiler to use instead of probing (gfortran, g77)
    #[arg(long, short = 'c', value_name = "NAME", env = "MOOG_SETUP_FC")]
    pub compiler: Option<String>,

    /// Restore templates left staged by an interrupted run before staging
    #[arg(long)]
    pub recover: bool,
}
