//! Write-privilege checks for install destinations

use std::path::Path;

use nix::unistd::{AccessFlags, access};

/// Whether the current process may write into a directory
pub trait PrivilegeCheck {
    fn can_write(&self, dir: &Path) -> bool;
}

/// Asks the kernel via `access(2)`
///
/// A destination that does not exist yet is judged by its nearest existing
/// ancestor, since that is where it would be created.
#[derive(Debug, Default, Clone, Copy)]
pub struct AccessCheck;

impl PrivilegeCheck for AccessCheck {
    fn can_write(&self, dir: &Path) -> bool {
        dir.ancestors()
            .find(|p| p.exists())
            .is_some_and(|p| access(p, AccessFlags::W_OK | AccessFlags::X_OK).is_ok())
    }
}
