//! Optional copy of a supporting framework bundle
//!
//! Some hosts (macOS with AquaTerm) need a framework next to the installed
//! binaries. The copy is best effort, but its result is always reported as one
//! of three states rather than dropped.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use walkdir::WalkDir;

use super::{InstallOutcome, PrivilegeCheck};

/// Framework directory to copy, and the directory to copy it into
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameworkCopy {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Result of an optional step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Skipped { reason: String },
    FailedNonFatal { reason: String },
    Succeeded { detail: String },
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skipped { reason } => write!(f, "skipped ({reason})"),
            Self::FailedNonFatal { reason } => write!(f, "failed ({reason})"),
            Self::Succeeded { detail } => write!(f, "done ({detail})"),
        }
    }
}

/// Copy the framework if one is configured and the binaries were installed
pub fn copy_framework(
    framework: Option<&FrameworkCopy>,
    install: &InstallOutcome,
    privilege: &dyn PrivilegeCheck,
) -> StepOutcome {
    let Some(framework) = framework else {
        return StepOutcome::Skipped {
            reason: "no support framework configured".to_string(),
        };
    };

    if !install.is_installed() {
        return StepOutcome::Skipped {
            reason: "binaries were not installed".to_string(),
        };
    }

    if !framework.source.is_dir() {
        return StepOutcome::Skipped {
            reason: format!("{} not found", framework.source.display()),
        };
    }

    if !privilege.can_write(&framework.destination) {
        return StepOutcome::FailedNonFatal {
            reason: format!("no write access to {}", framework.destination.display()),
        };
    }

    let Some(name) = framework.source.file_name() else {
        return StepOutcome::FailedNonFatal {
            reason: format!("{} has no directory name", framework.source.display()),
        };
    };
    let target = framework.destination.join(name);

    match replace_dir(&framework.source, &target) {
        Ok(()) => {
            info!(target = %target.display(), "copied support framework");
            StepOutcome::Succeeded {
                detail: target.display().to_string(),
            }
        }
        Err(e) => {
            warn!("framework copy failed: {e}");
            StepOutcome::FailedNonFatal {
                reason: e.to_string(),
            }
        }
    }
}

/// Replace `dst` with a recursive copy of `src`, keeping symlinks as symlinks
fn replace_dir(src: &Path, dst: &Path) -> io::Result<()> {
    if dst.symlink_metadata().is_ok() {
        if dst.is_dir() && !dst.is_symlink() {
            fs::remove_dir_all(dst)?;
        } else {
            fs::remove_file(dst)?;
        }
    }

    for entry in WalkDir::new(src).follow_links(false) {
        let entry = entry.map_err(io::Error::other)?;
        let relative = entry
            .path()
            .strip_prefix(src)
            .map_err(io::Error::other)?;
        let target = dst.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target)?;
        } else if file_type.is_symlink() {
            let link = fs::read_link(entry.path())?;
            std::os::unix::fs::symlink(link, &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }

    Ok(())
}
