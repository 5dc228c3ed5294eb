//! Installing built binaries
//!
//! Installation only happens when at least one variant built. The artifacts
//! of successful variants are copied into the destination with mode `0755`.
//! Lacking write access is not an error: the run reports
//! [`InstallOutcome::PermissionDenied`] and tells the operator how to finish
//! by hand.

pub mod framework;
pub mod privilege;

use std::fs::{self, File};
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::build::BuildResult;
use crate::error::{Result, SetupError};

pub use framework::{FrameworkCopy, StepOutcome};
pub use privilege::{AccessCheck, PrivilegeCheck};

/// Mode set on installed binaries
pub const ARTIFACT_MODE: u32 = 0o755;

/// What the install step did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Artifacts were copied into `destination`
    Installed {
        destination: PathBuf,
        artifacts: Vec<PathBuf>,
    },
    /// No variant built, nothing was touched
    NothingBuilt,
    /// Install was not requested
    DryRun,
    /// The destination is not writable; artifacts stay in `location`
    PermissionDenied {
        destination: PathBuf,
        location: PathBuf,
        artifacts: Vec<&'static str>,
    },
}

impl InstallOutcome {
    pub fn is_installed(&self) -> bool {
        matches!(self, Self::Installed { .. })
    }
}

/// Names of the artifacts produced by successful variants, in build order
pub fn built_artifacts(results: &[BuildResult]) -> Vec<&'static str> {
    let mut artifacts: Vec<&'static str> = Vec::new();
    for result in results.iter().filter(|r| r.succeeded) {
        let artifact = result.variant.artifact();
        if !artifacts.contains(&artifact) {
            artifacts.push(artifact);
        }
    }
    artifacts
}

pub struct Installer<'a> {
    source_dir: &'a Path,
    destination: &'a Path,
    privilege: &'a dyn PrivilegeCheck,
}

impl<'a> Installer<'a> {
    pub fn new(
        source_dir: &'a Path,
        destination: &'a Path,
        privilege: &'a dyn PrivilegeCheck,
    ) -> Self {
        Self {
            source_dir,
            destination,
            privilege,
        }
    }

    pub fn install(&self, results: &[BuildResult]) -> Result<InstallOutcome> {
        let artifacts = built_artifacts(results);
        if artifacts.is_empty() {
            debug!("no successful variant; skipping install");
            return Ok(InstallOutcome::NothingBuilt);
        }

        if !self.privilege.can_write(self.destination) {
            info!(destination = %self.destination.display(), "no write access; skipping install");
            return Ok(InstallOutcome::PermissionDenied {
                destination: self.destination.to_path_buf(),
                location: self.source_dir.to_path_buf(),
                artifacts,
            });
        }

        fs::create_dir_all(self.destination).map_err(|e| SetupError::InstallFailed {
            artifact: artifacts.join(", "),
            destination: self.destination.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut installed = Vec::with_capacity(artifacts.len());
        for artifact in &artifacts {
            let source = self.source_dir.join(artifact);
            let target = self.destination.join(artifact);
            let fail = |reason: String| SetupError::InstallFailed {
                artifact: (*artifact).to_string(),
                destination: self.destination.display().to_string(),
                reason,
            };

            if !source.is_file() {
                return Err(fail(format!(
                    "{} was not produced by the build",
                    source.display()
                )));
            }

            install_file(&source, &target).map_err(|e| fail(e.to_string()))?;
            info!(artifact, target = %target.display(), "installed");
            installed.push(target);
        }

        Ok(InstallOutcome::Installed {
            destination: self.destination.to_path_buf(),
            artifacts: installed,
        })
    }
}

/// Copy `source` to `target` through a temp file in the target directory
///
/// The rename replaces an existing binary atomically, even a read-only one.
fn install_file(source: &Path, target: &Path) -> io::Result<()> {
    let dir = target.parent().unwrap_or_else(|| Path::new("."));
    let mut staged = NamedTempFile::new_in(dir)?;
    let mut input = File::open(source)?;
    io::copy(&mut input, staged.as_file_mut())?;
    staged
        .as_file()
        .set_permissions(fs::Permissions::from_mode(ARTIFACT_MODE))?;
    staged.persist(target).map_err(|e| e.error)?;
    Ok(())
}
