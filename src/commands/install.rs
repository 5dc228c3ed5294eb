//! Install command implementation
//!
//! 1. Resolve the host platform and settings
//! 2. Install interrupt handlers
//! 3. Resolve the Fortran compiler
//! 4. Stage, build, restore, install (see [`InstallOperation`])
//! 5. Print the run summary and return the exit code

use std::path::PathBuf;

use crate::build::Make;
use crate::cli::InstallArgs;
use crate::config::{Overrides, Settings};
use crate::error::Result;
use crate::installer::AccessCheck;
use crate::interrupt::InterruptGuard;
use crate::operations::install::display;
use crate::operations::{InstallOperation, InstallOptions};
use crate::platform;
use crate::toolchain::PathProbe;

/// Run the install command, returning the process exit code
pub fn run(repo: Option<PathBuf>, args: InstallArgs) -> Result<i32> {
    let profile = platform::resolve()?;
    let repo = match repo {
        Some(repo) => repo,
        None => std::env::current_dir()?,
    };
    let overrides = Overrides {
        prefix: args.prefix,
        compiler: args.compiler,
    };
    let settings = Settings::resolve(&repo, &overrides, Some(profile.os_family))?;

    let interrupt = InterruptGuard::install()?;
    let probe = PathProbe;
    let make = Make::default();
    let privilege = AccessCheck;
    let operation = InstallOperation::new(&settings, &probe, &make, &privilege, interrupt.flag());

    let toolchain = operation.toolchain(&profile)?;
    display::print_plan(&profile, &toolchain, args.dry_run);

    let summary = operation.run(
        &profile,
        toolchain,
        InstallOptions {
            dry_run: args.dry_run,
            recover: args.recover,
        },
    )?;

    display::print_summary(&summary);
    Ok(summary.exit_code())
}
