//! Restore command implementation

use std::path::PathBuf;

use crate::cli::RestoreArgs;
use crate::config::{Overrides, Settings};
use crate::error::Result;
use crate::operations::RestoreOperation;

/// Restore templates left staged by an interrupted run
pub fn run(repo: Option<PathBuf>, _args: RestoreArgs) -> Result<()> {
    let repo = match repo {
        Some(repo) => repo,
        None => std::env::current_dir()?,
    };
    // No platform lookup: restore must work on any host.
    let settings = Settings::resolve(&repo, &Overrides::default(), None)?;

    let restored = RestoreOperation::new(&settings).execute()?;
    if restored == 0 {
        println!("Nothing to restore in {}", settings.source_dir.display());
    } else {
        println!(
            "Restored {restored} template(s) in {}",
            settings.source_dir.display()
        );
    }
    Ok(())
}
