//! Fortran toolchain detection
//!
//! Probes the host for a Fortran compiler, preferring `gfortran` over the
//! legacy `g77`, and derives the compiler flags the MOOG makefiles expect.
//! Probing is read-only: it only asks whether an executable is on `$PATH`.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::debug;

use crate::error::{Result, SetupError};
use crate::platform::PlatformProfile;

/// Known Fortran compilers, in probe priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compiler {
    /// GNU Fortran (modern)
    Gfortran,
    /// GNU Fortran 77 (legacy)
    G77,
}

impl Compiler {
    /// Probe order: first found wins
    pub const PRIORITY: [Compiler; 2] = [Compiler::Gfortran, Compiler::G77];

    pub fn executable(self) -> &'static str {
        match self {
            Self::Gfortran => "gfortran",
            Self::G77 => "g77",
        }
    }

    pub fn is_modern(self) -> bool {
        matches!(self, Self::Gfortran)
    }
}

impl fmt::Display for Compiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.executable())
    }
}

impl FromStr for Compiler {
    type Err = SetupError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "gfortran" => Ok(Self::Gfortran),
            "g77" => Ok(Self::G77),
            _ => Err(SetupError::UnknownCompiler {
                name: s.to_string(),
            }),
        }
    }
}

/// Presence query for an executable on the host
pub trait CompilerProbe {
    /// Location of `executable`, if it is installed
    fn locate(&self, executable: &str) -> Option<PathBuf>;
}

/// Looks compilers up on `$PATH`
#[derive(Debug, Default, Clone, Copy)]
pub struct PathProbe;

impl CompilerProbe for PathProbe {
    fn locate(&self, executable: &str) -> Option<PathBuf> {
        which::which(executable).ok()
    }
}

/// Chosen compiler and the flags to build with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainConfig {
    pub compiler: Compiler,
    pub flags: Vec<String>,
    pub pointer_bits: u32,
}

impl ToolchainConfig {
    /// Build a configuration for `compiler` on a host with `pointer_bits`
    pub fn new(compiler: Compiler, pointer_bits: u32) -> Self {
        Self {
            compiler,
            flags: flags_for(compiler, pointer_bits),
            pointer_bits,
        }
    }

    /// The `FC = ...` makefile line substituted for the configuration block token
    pub fn config_block(&self) -> String {
        format!("FC = {} {}", self.compiler.executable(), self.flags.join(" "))
    }
}

/// Compiler flags for the fixed-form MOOG sources
fn flags_for(compiler: Compiler, pointer_bits: u32) -> Vec<String> {
    let mut flags = vec![
        "-Wall".to_string(),
        "-O4".to_string(),
        "-ffixed-line-length-72".to_string(),
    ];

    if compiler.is_modern() {
        flags.push("-ff2c".to_string());
        if pointer_bits == 64 {
            flags.push("-m64".to_string());
        }
    }

    flags
}

/// Select a compiler for `profile`
///
/// With `requested` set only that compiler is probed; otherwise
/// [`Compiler::PRIORITY`] is walked and the first installed one wins.
pub fn resolve(
    profile: &PlatformProfile,
    probe: &dyn CompilerProbe,
    requested: Option<Compiler>,
) -> Result<ToolchainConfig> {
    let candidates: Vec<Compiler> = match requested {
        Some(compiler) => vec![compiler],
        None => Compiler::PRIORITY.to_vec(),
    };

    for compiler in &candidates {
        if let Some(path) = probe.locate(compiler.executable()) {
            debug!(compiler = %compiler, path = %path.display(), "found Fortran compiler");
            return Ok(ToolchainConfig::new(*compiler, profile.pointer_bits));
        }
        debug!(compiler = %compiler, "compiler not found");
    }

    Err(SetupError::ToolchainNotFound {
        searched: candidates
            .iter()
            .map(|c| c.executable())
            .collect::<Vec<_>>()
            .join(", "),
    })
}
