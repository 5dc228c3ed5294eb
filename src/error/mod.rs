//! Error types and handling for moog-setup
//!
//! Uses `thiserror` for error definitions and `miette` for diagnostics.
//!
//! Errors fall into the phases of a run:
//! - platform and toolchain resolution (fatal, before anything is touched)
//! - staging (fatal, aborts before any template is left mutated)
//! - restore and install (reported after the build phase)
//!
//! Build failures are not errors: they are recorded per variant in
//! [`crate::build::BuildResult`].

use miette::Diagnostic;
use thiserror::Error;

/// Exit code for an unsupported host platform
pub const EXIT_UNSUPPORTED_PLATFORM: i32 = 1;
/// Exit code when no Fortran compiler could be found
pub const EXIT_TOOLCHAIN_NOT_FOUND: i32 = 2;
/// Exit code when every build variant failed
pub const EXIT_ALL_VARIANTS_FAILED: i32 = 3;
/// Exit code when the build succeeded but installation lacked privilege
pub const EXIT_INSTALL_SKIPPED: i32 = 4;
/// Exit code for staging, lock and configuration errors
pub const EXIT_STAGING: i32 = 5;
/// Exit code for failures while copying artifacts or restoring templates
pub const EXIT_INSTALL_FAILED: i32 = 6;
/// Exit code after SIGINT/SIGTERM
pub const EXIT_INTERRUPTED: i32 = 130;

/// Main error type for moog-setup operations
#[derive(Error, Diagnostic, Debug)]
pub enum SetupError {
    // Platform errors
    #[error("Platform '{platform}' not recognised")]
    #[diagnostic(
        code(moog_setup::platform::unsupported),
        help("Supported platforms: Darwin (macOS) and Linux")
    )]
    UnsupportedPlatform { platform: String },

    // Toolchain errors
    #[error("No Fortran compiler found (looked for: {searched})")]
    #[diagnostic(
        code(moog_setup::toolchain::not_found),
        help("Install gfortran (preferred) or g77 and make sure it is on your $PATH")
    )]
    ToolchainNotFound { searched: String },

    #[error("Unknown compiler: {name}")]
    #[diagnostic(
        code(moog_setup::toolchain::unknown_compiler),
        help("Supported compilers: gfortran, g77")
    )]
    UnknownCompiler { name: String },

    // Staging errors
    #[error("Template {path} does not contain expected token {token}")]
    #[diagnostic(
        code(moog_setup::staging::missing_token),
        help("The template looks already substituted or was edited; check it out again from version control")
    )]
    MissingToken { path: String, token: String },

    #[error("Failed to stage {path}: {reason}")]
    #[diagnostic(code(moog_setup::staging::failed))]
    StagingFailed { path: String, reason: String },

    #[error("Staged templates from an interrupted run were found: {paths}")]
    #[diagnostic(
        code(moog_setup::staging::stale_backup),
        help("Run 'moog-setup restore' to put the originals back, or re-run install with --recover")
    )]
    StaleBackup { paths: String },

    #[error("Backup {path} does not match the original recorded when it was staged")]
    #[diagnostic(
        code(moog_setup::restore::corrupted_backup),
        help("The backup was left in place; compare it with version control before restoring by hand")
    )]
    CorruptedBackup { path: String },

    #[error("Failed to restore {path}: {reason}")]
    #[diagnostic(code(moog_setup::restore::failed))]
    RestoreFailed { path: String, reason: String },

    #[error("Another moog-setup run is using this repository (lock: {path})")]
    #[diagnostic(
        code(moog_setup::lock::held),
        help("Wait for the other run to finish; concurrent runs would overwrite each other's backups")
    )]
    LockHeld { path: String },

    // Configuration errors
    #[error("Failed to read configuration file: {path}")]
    #[diagnostic(code(moog_setup::config::read_failed))]
    ConfigReadFailed { path: String, reason: String },

    #[error("Failed to parse configuration file: {path}: {reason}")]
    #[diagnostic(code(moog_setup::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    // File system errors
    #[error("File not found: {path}")]
    #[diagnostic(code(moog_setup::fs::not_found))]
    FileNotFound { path: String },

    #[error("Failed to read file: {path}: {reason}")]
    #[diagnostic(code(moog_setup::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(moog_setup::fs::io_error))]
    IoError { message: String },

    // Install errors
    #[error("Failed to install {artifact} into {destination}: {reason}")]
    #[diagnostic(code(moog_setup::install::failed))]
    InstallFailed {
        artifact: String,
        destination: String,
        reason: String,
    },

    #[error("Interrupted; templates were restored")]
    #[diagnostic(code(moog_setup::interrupted))]
    Interrupted,
}

impl SetupError {
    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnsupportedPlatform { .. } => EXIT_UNSUPPORTED_PLATFORM,
            Self::ToolchainNotFound { .. } | Self::UnknownCompiler { .. } => {
                EXIT_TOOLCHAIN_NOT_FOUND
            }
            Self::MissingToken { .. }
            | Self::StagingFailed { .. }
            | Self::StaleBackup { .. }
            | Self::LockHeld { .. }
            | Self::ConfigReadFailed { .. }
            | Self::ConfigParseFailed { .. }
            | Self::FileNotFound { .. }
            | Self::FileReadFailed { .. } => EXIT_STAGING,
            Self::CorruptedBackup { .. }
            | Self::RestoreFailed { .. }
            | Self::IoError { .. }
            | Self::InstallFailed { .. } => EXIT_INSTALL_FAILED,
            Self::Interrupted => EXIT_INTERRUPTED,
        }
    }
}

impl From<std::io::Error> for SetupError {
    fn from(err: std::io::Error) -> Self {
        SetupError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for SetupError {
    fn from(err: serde_yaml::Error) -> Self {
        SetupError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for SetupError {
    fn from(err: serde_json::Error) -> Self {
        SetupError::StagingFailed {
            path: "stage journal".to_string(),
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, SetupError>;
