//! Run configuration
//!
//! Settings come from, in order of precedence:
//! 1. command line flags (and their `MOOG_SETUP_*` environment variables)
//! 2. `moog-setup.yaml` at the repository root
//! 3. built-in defaults matching the MOOG repository layout
//!
//! Relative paths in the YAML file are resolved against the repository root.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SetupError};
use crate::installer::FrameworkCopy;
use crate::platform::{OsFamily, PlatformProfile};
use crate::template::{Token, TokenValues};
use crate::toolchain::{Compiler, ToolchainConfig};

/// Optional configuration file at the repository root
pub const CONFIG_FILE: &str = "moog-setup.yaml";

pub const DEFAULT_PREFIX: &str = "/usr/local/bin";
pub const DEFAULT_SOURCE_DIR: &str = "moog";
pub const DEFAULT_SMLIB: &str = "lib/smlib";
pub const DEFAULT_AQLIB: &str = "lib/aqlib";
pub const DEFAULT_FRAMEWORK_DESTINATION: &str = "/Library/Frameworks";
pub const AQUATERM_FRAMEWORK: &str = "AquaTerm.framework";

/// Contents of `moog-setup.yaml`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SetupConfig {
    /// Install destination for the binaries
    pub prefix: Option<PathBuf>,

    /// Compiler to use instead of probing (`gfortran` or `g77`)
    pub compiler: Option<String>,

    /// MOOG source root
    pub source_dir: Option<PathBuf>,

    /// SM library root
    pub smlib: Option<PathBuf>,

    /// AquaTerm library root
    pub aqlib: Option<PathBuf>,

    /// Support framework to copy after installing
    pub framework: Option<FrameworkConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrameworkConfig {
    pub source: PathBuf,
    #[serde(default)]
    pub destination: Option<PathBuf>,
}

impl SetupConfig {
    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Load `moog-setup.yaml` from `repo_root`, defaults if absent
    pub fn load(repo_root: &Path) -> Result<Self> {
        let path = repo_root.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let yaml = fs::read_to_string(&path).map_err(|e| SetupError::ConfigReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        debug!(path = %path.display(), "loaded configuration");
        Self::from_yaml(&yaml).map_err(|e| match e {
            SetupError::ConfigParseFailed { reason, .. } => SetupError::ConfigParseFailed {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }
}

/// Values given on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub prefix: Option<PathBuf>,
    pub compiler: Option<String>,
}

/// Fully resolved settings for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub repo_root: PathBuf,
    pub source_dir: PathBuf,
    pub smlib: PathBuf,
    pub aqlib: PathBuf,
    pub prefix: PathBuf,
    pub compiler: Option<Compiler>,
    pub framework: Option<FrameworkCopy>,
}

impl Settings {
    /// Resolve settings for the repository at `repo`
    ///
    /// `os` is only consulted to find a bundled framework; `None` resolves
    /// without any host facts.
    pub fn resolve(repo: &Path, overrides: &Overrides, os: Option<OsFamily>) -> Result<Self> {
        let repo_root = dunce::canonicalize(repo).map_err(|_| SetupError::FileNotFound {
            path: repo.display().to_string(),
        })?;
        let config = SetupConfig::load(&repo_root)?;

        let under_root = |configured: Option<&PathBuf>, default: &str| match configured {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => repo_root.join(p),
            None => repo_root.join(default),
        };

        let prefix = match &overrides.prefix {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => std::env::current_dir()?.join(p),
            None => config
                .prefix
                .as_ref()
                .map_or_else(|| PathBuf::from(DEFAULT_PREFIX), |p| under_root(Some(p), DEFAULT_PREFIX)),
        };

        let compiler = overrides
            .compiler
            .as_deref()
            .or(config.compiler.as_deref())
            .map(str::parse::<Compiler>)
            .transpose()?;

        let aqlib = under_root(config.aqlib.as_ref(), DEFAULT_AQLIB);

        let framework = match &config.framework {
            Some(fw) => Some(FrameworkCopy {
                source: under_root(Some(&fw.source), DEFAULT_AQLIB),
                destination: fw
                    .destination
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_FRAMEWORK_DESTINATION)),
            }),
            None if os == Some(OsFamily::Darwin) && aqlib.join(AQUATERM_FRAMEWORK).is_dir() => {
                Some(FrameworkCopy {
                    source: aqlib.join(AQUATERM_FRAMEWORK),
                    destination: PathBuf::from(DEFAULT_FRAMEWORK_DESTINATION),
                })
            }
            None => None,
        };

        Ok(Self {
            source_dir: under_root(config.source_dir.as_ref(), DEFAULT_SOURCE_DIR),
            smlib: under_root(config.smlib.as_ref(), DEFAULT_SMLIB),
            aqlib,
            prefix,
            compiler,
            framework,
            repo_root,
        })
    }

    /// Value of every template token for this run
    pub fn token_values(&self, profile: &PlatformProfile, toolchain: &ToolchainConfig) -> TokenValues {
        TokenValues::from([
            (Token::SmLib, self.smlib.display().to_string()),
            (Token::AqLib, self.aqlib.display().to_string()),
            (Token::SrcDir, self.source_dir.display().to_string()),
            (Token::Machine, profile.machine_tag.to_string()),
            (Token::FConfig, toolchain.config_block()),
        ])
    }
}
