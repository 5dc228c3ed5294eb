//! Restoring staged templates
//!
//! Restore renames each `.original` backup back over its working file, after
//! checking the backup against the digest recorded in the stage journal. A
//! backup that cannot be verified is never renamed. It is idempotent: targets
//! without a backup are skipped, so calling it again after a successful restore
//! does nothing.
//!
//! [`StagedTree`] wraps a staged set and restores it on drop, so a build
//! failure, an early `?` return or a panic all leave the tree as checked in.

mod guard;

pub use guard::StagedTree;

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{Result, SetupError};
use crate::hash;
use crate::template::{BuildTarget, StageJournal, TemplateEngine};

/// Put every staged target back to its original content
///
/// Keeps going after a failed target so as many files as possible are
/// restored, then returns the first error. The journal is removed once no
/// target is left staged. Returns the number of files restored.
pub fn restore(targets: &mut [BuildTarget], journal_path: &Path) -> Result<usize> {
    let journal = match StageJournal::load(journal_path) {
        Ok(journal) => journal,
        Err(e) => {
            warn!("stage journal unusable, only verifiable backups will be restored: {e}");
            None
        }
    };

    let mut restored = 0;
    let mut first_error = None;

    for target in targets.iter_mut() {
        let Some(backup) = target.backup_path.clone() else {
            continue;
        };

        match restore_one(&target.working_path, &backup, journal.as_ref()) {
            Ok(()) => {
                debug!(path = %target.working_path.display(), "restored");
                target.backup_path = None;
                restored += 1;
            }
            Err(e) => {
                warn!("{e}");
                first_error.get_or_insert(e);
            }
        }
    }

    if let Some(e) = first_error {
        return Err(e);
    }

    if journal_path.exists() {
        fs::remove_file(journal_path).map_err(|e| SetupError::RestoreFailed {
            path: journal_path.display().to_string(),
            reason: e.to_string(),
        })?;
    }

    if restored > 0 {
        info!(count = restored, "restored templates");
    }
    Ok(restored)
}

fn restore_one(working: &Path, backup: &Path, journal: Option<&StageJournal>) -> Result<()> {
    if !backup.exists() {
        return Err(SetupError::RestoreFailed {
            path: working.display().to_string(),
            reason: format!("backup {} is missing", backup.display()),
        });
    }

    let backup_ok = match journal.and_then(|j| j.digest_for(working)) {
        Some(expected) => {
            if hash::hash_file(backup)? == expected {
                true
            } else if working.is_file() && hash::hash_file(working)? == expected {
                // Killed while copying the backup: the working file was never rewritten.
                debug!(path = %backup.display(), "discarding partial backup");
                false
            } else {
                return Err(SetupError::CorruptedBackup {
                    path: backup.display().to_string(),
                });
            }
        }
        None => {
            if working.is_file() && files_equal(working, backup)? {
                false
            } else {
                return Err(SetupError::CorruptedBackup {
                    path: backup.display().to_string(),
                });
            }
        }
    };

    let outcome = if backup_ok {
        fs::rename(backup, working)
    } else {
        fs::remove_file(backup)
    };
    outcome.map_err(|e| SetupError::RestoreFailed {
        path: working.display().to_string(),
        reason: e.to_string(),
    })
}

fn files_equal(a: &Path, b: &Path) -> Result<bool> {
    Ok(hash::hash_file(a)? == hash::hash_file(b)?)
}

/// Restore whatever an interrupted run left staged
///
/// Picks up backups next to the given templates plus any extra entry the
/// journal lists. A clean tree is a no-op.
pub fn recover(engine: &TemplateEngine, templates: &[BuildTarget]) -> Result<usize> {
    let journal_path = engine.journal_path();

    let mut stale: Vec<BuildTarget> = templates
        .iter()
        .filter(|t| t.backup_location().exists())
        .map(|t| BuildTarget::adopted(t.working_path.clone(), t.backup_location()))
        .collect();

    match StageJournal::load(&journal_path) {
        Ok(Some(journal)) => {
            for entry in journal.entries {
                let known = stale.iter().any(|t| t.working_path == entry.working);
                if !known && entry.backup.exists() {
                    stale.push(BuildTarget::adopted(entry.working, entry.backup));
                }
            }
        }
        Ok(None) => {}
        Err(e) => warn!("{e}"),
    }

    if !stale.is_empty() {
        info!(count = stale.len(), "recovering templates from an interrupted run");
    }

    restore(&mut stale, &journal_path)
}
