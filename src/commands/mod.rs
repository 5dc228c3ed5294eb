//! Command implementations for the moog-setup CLI

pub mod completions;
pub mod install;
pub mod restore;
pub mod version;
