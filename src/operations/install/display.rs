//! Operator-facing output for the install pipeline
//!
//! Messages are built as strings so they can be checked in tests, then
//! printed with `console` styles.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use console::Style;

use crate::installer::{InstallOutcome, StepOutcome};
use crate::platform::PlatformProfile;
use crate::toolchain::ToolchainConfig;

use super::RunSummary;

/// Print what is about to be built
pub fn print_plan(profile: &PlatformProfile, toolchain: &ToolchainConfig, dry_run: bool) {
    let variants = profile
        .variants
        .iter()
        .map(|v| v.name())
        .collect::<Vec<_>>()
        .join(", ");
    let prefix = if dry_run { "[DRY RUN] " } else { "" };
    println!(
        "{prefix}Building for {} ({}-bit) with {}: {variants}",
        profile.os_family, profile.pointer_bits, toolchain.compiler
    );
}

/// Per-variant results and install outcome
pub fn format_summary(summary: &RunSummary) -> String {
    let mut out = String::new();

    if summary.recovered > 0 {
        let _ = writeln!(
            out,
            "Recovered {} template(s) from an interrupted run",
            summary.recovered
        );
    }

    let _ = writeln!(out, "Build results:");
    for result in &summary.report.results {
        let status = match result.exit_status {
            Some(code) => format!("exit {code}"),
            None => "killed".to_string(),
        };
        let verdict = if result.succeeded { "ok" } else { "FAILED" };
        let _ = writeln!(
            out,
            "  {:<22} {verdict} ({status}) -> {}",
            result.variant_name(),
            result.variant.artifact()
        );
    }

    match &summary.install {
        InstallOutcome::Installed {
            destination,
            artifacts,
        } => {
            let _ = writeln!(
                out,
                "Installed {} binary(ies) into {}",
                artifacts.len(),
                destination.display()
            );
        }
        InstallOutcome::DryRun => {
            let _ = writeln!(out, "[DRY RUN] Skipping install");
        }
        InstallOutcome::NothingBuilt => {
            let _ = writeln!(out, "No variant built; nothing installed");
        }
        InstallOutcome::PermissionDenied { .. } => {
            let _ = writeln!(out, "Install skipped");
        }
    }

    let _ = writeln!(out, "Support framework: {}", summary.framework);
    out
}

pub fn print_summary(summary: &RunSummary) {
    let text = format_summary(summary);
    let ok = Style::new().green();
    let bad = Style::new().red();
    for line in text.lines() {
        if line.contains(" FAILED ") || line.starts_with("No variant built") {
            println!("{}", bad.apply_to(line));
        } else if line.starts_with("Installed ") {
            println!("{}", ok.apply_to(line));
        } else {
            println!("{line}");
        }
    }

    if let InstallOutcome::PermissionDenied {
        destination,
        location,
        artifacts,
    } = &summary.install
    {
        warn(&remediation(destination, location, artifacts));
    }

    if let StepOutcome::FailedNonFatal { reason } = &summary.framework {
        warn(&format!("Support framework was not copied: {reason}"));
    }
}

/// What to do when the destination is not writable
pub fn remediation(destination: &Path, location: &Path, artifacts: &[&str]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "No write access to {}; the build finished but nothing was installed.",
        destination.display()
    );
    let _ = writeln!(out, "Built binaries are in {}:", location.display());
    for artifact in artifacts {
        let _ = writeln!(out, "  {}", location.join(artifact).display());
    }
    let _ = writeln!(out, "To finish, do one of:");
    let _ = writeln!(out, "  - re-run with elevated privileges (e.g. sudo moog-setup install)");
    let _ = writeln!(
        out,
        "  - re-run with --prefix {}",
        user_bin_dir().display()
    );
    let _ = write!(
        out,
        "  - copy {} into a directory on your $PATH",
        artifacts.join(" and ")
    );
    out
}

/// A directory the user can write to without privileges
fn user_bin_dir() -> PathBuf {
    dirs::executable_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("bin")))
        .unwrap_or_else(|| PathBuf::from("~/bin"))
}

/// Print a yellow warning to stderr
pub fn warn(message: &str) {
    let style = Style::new().yellow();
    for line in message.lines() {
        eprintln!("{}", style.apply_to(line));
    }
}
