//! Host platform resolution
//!
//! Maps the host operating system and pointer width onto a
//! [`PlatformProfile`]: the machine tag embedded into the Fortran sources
//! and the ordered list of makefile variants to build.

use std::fmt;

use crate::error::{Result, SetupError};

/// Supported operating system families
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Darwin,
    Linux,
}

impl OsFamily {
    /// Parse an OS name as reported by `uname -s` or `std::env::consts::OS`
    pub fn from_os_name(name: &str) -> Result<Self> {
        match name {
            "Darwin" | "macos" => Ok(Self::Darwin),
            "Linux" | "linux" => Ok(Self::Linux),
            other => Err(SetupError::UnsupportedPlatform {
                platform: other.to_string(),
            }),
        }
    }

    /// Short machine tag understood by the MOOG sources
    pub fn machine_tag(self) -> &'static str {
        match self {
            Self::Darwin => "mac",
            Self::Linux => "pcl",
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Darwin => write!(f, "Darwin"),
            Self::Linux => write!(f, "Linux"),
        }
    }
}

/// Which front end a variant produces
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantKind {
    /// Interactive front end (`MOOG`)
    Interactive,
    /// Non-interactive front end (`MOOGSILENT`)
    Silent,
}

impl VariantKind {
    /// Name of the binary this kind of variant produces in the source root
    pub fn artifact(self) -> &'static str {
        match self {
            Self::Interactive => "MOOG",
            Self::Silent => "MOOGSILENT",
        }
    }
}

/// One named build configuration, identified by its makefile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variant {
    /// Makefile name relative to the source root (e.g. `Makefile.rh64`)
    pub makefile: &'static str,

    pub kind: VariantKind,
}

impl Variant {
    const fn new(makefile: &'static str, kind: VariantKind) -> Self {
        Self { makefile, kind }
    }

    pub fn name(&self) -> &'static str {
        self.makefile
    }

    pub fn artifact(&self) -> &'static str {
        self.kind.artifact()
    }
}

const DARWIN_VARIANTS: [Variant; 2] = [
    Variant::new("Makefile.mac", VariantKind::Interactive),
    Variant::new("Makefile.macsilent", VariantKind::Silent),
];

const LINUX_64_VARIANTS: [Variant; 2] = [
    Variant::new("Makefile.rh64", VariantKind::Interactive),
    Variant::new("Makefile.rh64silent", VariantKind::Silent),
];

const LINUX_32_VARIANTS: [Variant; 2] = [
    Variant::new("Makefile.rh", VariantKind::Interactive),
    Variant::new("Makefile.rhsilent", VariantKind::Silent),
];

/// Resolved description of the host, immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformProfile {
    pub os_family: OsFamily,
    pub pointer_bits: u32,
    pub machine_tag: &'static str,
    /// Variants in build order
    pub variants: Vec<Variant>,
}

/// Resolve the profile of the running host
pub fn resolve() -> Result<PlatformProfile> {
    resolve_for(std::env::consts::OS, usize::BITS)
}

/// Resolve a profile for an explicit OS name and pointer width
///
/// Darwin always builds the same pair; Linux picks the 64-bit or 32-bit
/// makefile pair from the pointer width.
pub fn resolve_for(os_name: &str, pointer_bits: u32) -> Result<PlatformProfile> {
    let os_family = OsFamily::from_os_name(os_name)?;

    let variants = match os_family {
        OsFamily::Darwin => DARWIN_VARIANTS.to_vec(),
        OsFamily::Linux if pointer_bits >= 64 => LINUX_64_VARIANTS.to_vec(),
        OsFamily::Linux => LINUX_32_VARIANTS.to_vec(),
    };

    Ok(PlatformProfile {
        os_family,
        pointer_bits,
        machine_tag: os_family.machine_tag(),
        variants,
    })
}
