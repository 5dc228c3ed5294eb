//! High-level operations behind the CLI commands
//!
//! - [`InstallOperation`]: toolchain, stage, build, restore, install
//! - [`RestoreOperation`]: put back templates left staged by a dead run
//!
//! Both take the per-repository run lock before touching the tree.

pub mod install;
pub mod restore;

pub use install::{InstallOperation, InstallOptions, RunSummary};
pub use restore::RestoreOperation;
