//! Scoped ownership of a staged template set

use std::path::PathBuf;

use tracing::warn;

use crate::error::Result;
use crate::template::{BuildTarget, TemplateEngine};

/// A staged template set that is restored when it goes out of scope
///
/// ```ignore
/// let tree = StagedTree::stage(&engine, targets)?;
/// // build against the staged files...
/// tree.restore()?; // or dropped: restore happens automatically
/// ```
#[derive(Debug)]
pub struct StagedTree {
    targets: Vec<BuildTarget>,
    journal_path: PathBuf,
    restored: bool,
}

impl StagedTree {
    /// Stage `targets`; on error nothing is left staged
    pub fn stage(engine: &TemplateEngine, mut targets: Vec<BuildTarget>) -> Result<Self> {
        engine.stage(&mut targets)?;
        Ok(Self {
            targets,
            journal_path: engine.journal_path(),
            restored: false,
        })
    }

    pub fn targets(&self) -> &[BuildTarget] {
        &self.targets
    }

    /// Restore now, surfacing any error to the caller
    pub fn restore(mut self) -> Result<usize> {
        self.restored = true;
        super::restore(&mut self.targets, &self.journal_path)
    }
}

impl Drop for StagedTree {
    fn drop(&mut self) {
        if !self.restored {
            if let Err(e) = super::restore(&mut self.targets, &self.journal_path) {
                warn!("Failed to restore templates: {e}");
                eprintln!("Warning: Failed to restore templates: {e}");
            }
        }
    }
}
