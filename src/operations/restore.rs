//! Standalone crash recovery
//!
//! Puts back every template an interrupted run left staged and removes the
//! stage journal. On a clean tree this does nothing.

use tracing::info;

use crate::config::Settings;
use crate::error::Result;
use crate::lock::{self, RunLock};
use crate::restore;
use crate::template::{self, BuildTarget, TemplateEngine, TokenValues};

pub struct RestoreOperation<'a> {
    settings: &'a Settings,
}

impl<'a> RestoreOperation<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }

    /// Returns the number of templates restored
    pub fn execute(&self) -> Result<usize> {
        let _lock = RunLock::try_acquire(&lock::lock_path_for(&self.settings.repo_root))?;

        let engine = TemplateEngine::new(&self.settings.source_dir);
        let none = TokenValues::new();
        let templates: Vec<BuildTarget> = template::discover(engine.source_dir())?
            .into_iter()
            .map(|spec| BuildTarget::new(spec, &none))
            .collect();

        let restored = restore::recover(&engine, &templates)?;
        info!(restored, "recovery finished");
        Ok(restored)
    }
}
