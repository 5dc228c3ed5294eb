//! Build driver
//!
//! Runs the external build tool once per variant, strictly in order. Every
//! variant is attempted whatever happened to the previous one; the results
//! are handed back for the caller to judge. Output of the tool goes straight
//! to the terminal and is never parsed.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use crate::platform::Variant;
use crate::progress::BuildProgress;

/// Outcome of building one variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    pub variant: Variant,
    /// Exit code of the build tool; `None` if it was killed or never started
    pub exit_status: Option<i32>,
    pub succeeded: bool,
}

impl BuildResult {
    pub fn variant_name(&self) -> &'static str {
        self.variant.name()
    }
}

/// An external tool that builds one makefile
pub trait BuildTool {
    /// Run the build in `working_dir`; `Ok(None)` means killed by a signal
    fn build(&self, working_dir: &Path, makefile: &str) -> std::io::Result<Option<i32>>;

    fn describe(&self) -> String;
}

/// `make -f <makefile>`
#[derive(Debug, Clone)]
pub struct Make {
    program: PathBuf,
}

impl Make {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for Make {
    fn default() -> Self {
        Self::new("make")
    }
}

impl BuildTool for Make {
    fn build(&self, working_dir: &Path, makefile: &str) -> std::io::Result<Option<i32>> {
        let status = Command::new(&self.program)
            .arg("-f")
            .arg(makefile)
            .current_dir(working_dir)
            .status()?;
        Ok(status.code())
    }

    fn describe(&self) -> String {
        self.program.display().to_string()
    }
}

/// Everything the driver produced
#[derive(Debug, Clone, Default)]
pub struct BuildReport {
    /// One entry per attempted variant, in build order
    pub results: Vec<BuildResult>,
    /// Set when an interrupt stopped the remaining variants
    pub interrupted: bool,
}

impl BuildReport {
    pub fn any_succeeded(&self) -> bool {
        self.results.iter().any(|r| r.succeeded)
    }
}

pub struct BuildDriver<'a> {
    tool: &'a dyn BuildTool,
    working_dir: &'a Path,
    interrupt: &'a AtomicBool,
}

impl<'a> BuildDriver<'a> {
    pub fn new(tool: &'a dyn BuildTool, working_dir: &'a Path, interrupt: &'a AtomicBool) -> Self {
        Self {
            tool,
            working_dir,
            interrupt,
        }
    }

    pub fn run(&self, variants: &[Variant]) -> BuildReport {
        let progress = BuildProgress::new(variants.len());
        let mut report = BuildReport::default();

        for (index, variant) in variants.iter().enumerate() {
            if self.interrupt.load(Ordering::SeqCst) {
                warn!("interrupted; skipping remaining variants");
                report.interrupted = true;
                break;
            }

            progress.start_variant(variant.name(), index + 1, variants.len());
            info!(variant = variant.name(), tool = %self.tool.describe(), "building");

            let outcome = progress.suspend(|| self.tool.build(self.working_dir, variant.makefile));
            let exit_status = match outcome {
                Ok(code) => code,
                Err(e) => {
                    warn!(variant = variant.name(), "could not run {}: {e}", self.tool.describe());
                    None
                }
            };
            let succeeded = exit_status == Some(0);

            if succeeded {
                info!(variant = variant.name(), "build succeeded");
            } else {
                warn!(variant = variant.name(), ?exit_status, "build failed");
            }

            report.results.push(BuildResult {
                variant: variant.clone(),
                exit_status,
                succeeded,
            });
            progress.finish_variant();
        }

        if self.interrupt.load(Ordering::SeqCst) {
            report.interrupted = true;
        }

        if report.interrupted {
            progress.abandon();
        } else {
            progress.finish();
        }
        report
    }
}
