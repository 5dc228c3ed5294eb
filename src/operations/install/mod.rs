//! The install pipeline
//!
//! `ToolchainResolved -> Staged -> Built -> Restored -> {Installed | InstallSkipped}`
//!
//! Everything that can fail before staging does so with the tree untouched.
//! Once staged, the tree is owned by a [`StagedTree`] so the templates are
//! restored on every way out of [`InstallOperation::run`], including a
//! panic in the build phase.

pub mod display;

use std::sync::atomic::AtomicBool;

use tracing::{debug, info};

use crate::build::{BuildDriver, BuildReport, BuildTool};
use crate::config::Settings;
use crate::error::{EXIT_ALL_VARIANTS_FAILED, EXIT_INSTALL_SKIPPED, Result, SetupError};
use crate::installer::{self, InstallOutcome, Installer, PrivilegeCheck, StepOutcome};
use crate::lock::{self, RunLock};
use crate::platform::PlatformProfile;
use crate::restore::{self, StagedTree};
use crate::template::{self, BuildTarget, TemplateEngine};
use crate::toolchain::{self, CompilerProbe, ToolchainConfig};

/// Options for one install run
#[derive(Debug, Clone, Copy, Default)]
pub struct InstallOptions {
    /// Stage, build and restore, but never install
    pub dry_run: bool,
    /// Restore a tree left staged by an interrupted run before staging
    pub recover: bool,
}

/// Everything a completed run did
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub profile: PlatformProfile,
    pub toolchain: ToolchainConfig,
    /// Templates put back from an earlier interrupted run
    pub recovered: usize,
    pub report: BuildReport,
    pub install: InstallOutcome,
    pub framework: StepOutcome,
}

impl RunSummary {
    pub fn exit_code(&self) -> i32 {
        match self.install {
            InstallOutcome::Installed { .. } | InstallOutcome::DryRun => 0,
            InstallOutcome::PermissionDenied { .. } => EXIT_INSTALL_SKIPPED,
            InstallOutcome::NothingBuilt => EXIT_ALL_VARIANTS_FAILED,
        }
    }
}

pub struct InstallOperation<'a> {
    settings: &'a Settings,
    probe: &'a dyn CompilerProbe,
    tool: &'a dyn BuildTool,
    privilege: &'a dyn PrivilegeCheck,
    interrupt: &'a AtomicBool,
}

impl<'a> InstallOperation<'a> {
    pub fn new(
        settings: &'a Settings,
        probe: &'a dyn CompilerProbe,
        tool: &'a dyn BuildTool,
        privilege: &'a dyn PrivilegeCheck,
        interrupt: &'a AtomicBool,
    ) -> Self {
        Self {
            settings,
            probe,
            tool,
            privilege,
            interrupt,
        }
    }

    /// Pick the compiler for `profile`; touches nothing on disk
    pub fn toolchain(&self, profile: &PlatformProfile) -> Result<ToolchainConfig> {
        let toolchain = toolchain::resolve(profile, self.probe, self.settings.compiler)?;
        info!(compiler = %toolchain.compiler, "toolchain resolved");
        Ok(toolchain)
    }

    /// Run the whole pipeline
    pub fn execute(&self, profile: &PlatformProfile, options: InstallOptions) -> Result<RunSummary> {
        let toolchain = self.toolchain(profile)?;
        self.run(profile, toolchain, options)
    }

    /// Run the pipeline with an already resolved toolchain
    pub fn run(
        &self,
        profile: &PlatformProfile,
        toolchain: ToolchainConfig,
        options: InstallOptions,
    ) -> Result<RunSummary> {
        let _lock = RunLock::try_acquire(&lock::lock_path_for(&self.settings.repo_root))?;

        let engine = TemplateEngine::new(&self.settings.source_dir);
        let values = self.settings.token_values(profile, &toolchain);
        let targets: Vec<BuildTarget> = template::discover(engine.source_dir())?
            .into_iter()
            .map(|spec| BuildTarget::new(spec, &values))
            .collect();

        let recovered = if options.recover {
            restore::recover(&engine, &targets)?
        } else {
            0
        };

        let tree = StagedTree::stage(&engine, targets)?;
        debug!(count = tree.targets().len(), "templates staged");

        let report =
            BuildDriver::new(self.tool, engine.source_dir(), self.interrupt).run(&profile.variants);

        let restored = tree.restore()?;
        debug!(restored, "templates restored");

        if report.interrupted {
            return Err(SetupError::Interrupted);
        }

        let install = if options.dry_run {
            if report.any_succeeded() {
                InstallOutcome::DryRun
            } else {
                InstallOutcome::NothingBuilt
            }
        } else {
            Installer::new(&self.settings.source_dir, &self.settings.prefix, self.privilege)
                .install(&report.results)?
        };

        let framework = installer::framework::copy_framework(
            self.settings.framework.as_ref(),
            &install,
            self.privilege,
        );

        Ok(RunSummary {
            profile: profile.clone(),
            toolchain,
            recovered,
            report,
            install,
            framework,
        })
    }
}
