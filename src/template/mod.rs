//! Template staging
//!
//! The MOOG tree ships makefiles and two Fortran sources holding reserved
//! tokens (`$SMLIB`, `$SRCDIR`, ...). Staging rewrites them in place with the
//! resolved values, after keeping a byte-identical `.original` backup of each
//! file and a [`journal::StageJournal`] describing the set.
//!
//! Staging is all-or-nothing:
//! 1. every template is read and checked for its expected tokens
//! 2. the journal is written, then every backup
//! 3. only then are working files rewritten
//!
//! A failure in steps 1-2 leaves no file changed. A failure in step 3 restores
//! the files already rewritten before returning.

pub mod journal;
pub mod token;

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use walkdir::WalkDir;
use wax::{CandidatePath, Glob, Pattern};

use crate::error::{Result, SetupError};
use crate::hash;
use crate::restore;

pub use journal::{JOURNAL_FILE, JournalEntry, StageJournal};
pub use token::{Token, TokenValues};

/// Suffix appended to a template's path for its backup
pub const BACKUP_SUFFIX: &str = ".original";

/// Fortran sources that embed the source root path
pub const SOURCE_TEMPLATES: [&str; 2] = ["Moog.f", "Moogsilent.f"];

const MAKEFILE_PATTERN: &str = "Makefile*";

/// A checked-in template and the tokens it must contain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSpec {
    pub path: PathBuf,
    pub expected: Vec<Token>,
}

/// Find every template in the source root
///
/// All `Makefile*` files are staged (not only the ones built on this host) so
/// that the tree stays consistent; each must reference `$SMLIB`. The two MOOG
/// driver sources must exist and reference `$SRCDIR`.
pub fn discover(source_dir: &Path) -> Result<Vec<TemplateSpec>> {
    if !source_dir.is_dir() {
        return Err(SetupError::FileNotFound {
            path: source_dir.display().to_string(),
        });
    }

    let glob = Glob::new(MAKEFILE_PATTERN).map_err(|e| SetupError::StagingFailed {
        path: source_dir.display().to_string(),
        reason: e.to_string(),
    })?;

    let mut makefiles: Vec<PathBuf> = WalkDir::new(source_dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            let name = e.file_name().to_string_lossy();
            !name.ends_with(BACKUP_SUFFIX)
                && glob.matched(&CandidatePath::from(name.as_ref())).is_some()
        })
        .map(walkdir::DirEntry::into_path)
        .collect();
    makefiles.sort();

    let mut specs: Vec<TemplateSpec> = makefiles
        .into_iter()
        .map(|path| TemplateSpec {
            path,
            expected: vec![Token::SmLib],
        })
        .collect();

    for name in SOURCE_TEMPLATES {
        let path = source_dir.join(name);
        if !path.is_file() {
            return Err(SetupError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        specs.push(TemplateSpec {
            path,
            expected: vec![Token::SrcDir],
        });
    }

    debug!(count = specs.len(), "discovered templates");
    Ok(specs)
}

/// Backup location for a working file
pub fn backup_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// One template taking part in a run
///
/// `backup_path` is `Some` exactly while `working_path` holds substituted
/// content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    pub working_path: PathBuf,
    pub backup_path: Option<PathBuf>,
    pub expected: Vec<Token>,
    pub substitutions: TokenValues,
}

impl BuildTarget {
    pub fn new(spec: TemplateSpec, values: &TokenValues) -> Self {
        Self {
            working_path: spec.path,
            backup_path: None,
            expected: spec.expected,
            substitutions: values.clone(),
        }
    }

    /// Target for a file known to be staged by an earlier run
    pub fn adopted(working_path: PathBuf, backup_path: PathBuf) -> Self {
        Self {
            working_path,
            backup_path: Some(backup_path),
            expected: Vec::new(),
            substitutions: TokenValues::new(),
        }
    }

    pub fn backup_location(&self) -> PathBuf {
        backup_path_for(&self.working_path)
    }

    pub fn is_staged(&self) -> bool {
        self.backup_path.is_some()
    }
}

/// Working file content before and after substitution
struct Prepared {
    original: Vec<u8>,
    staged: Vec<u8>,
}

/// Stages templates inside one source root
#[derive(Debug, Clone)]
pub struct TemplateEngine {
    source_dir: PathBuf,
}

impl TemplateEngine {
    pub fn new(source_dir: impl Into<PathBuf>) -> Self {
        Self {
            source_dir: source_dir.into(),
        }
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn journal_path(&self) -> PathBuf {
        self.source_dir.join(JOURNAL_FILE)
    }

    /// Leftovers of an earlier staging that was never restored
    ///
    /// Includes the journal itself, any backup of a known template, and any
    /// backup the journal lists (its working file may have been removed).
    pub fn stale_files(&self, targets: &[BuildTarget]) -> Vec<PathBuf> {
        let mut stale: Vec<PathBuf> = targets
            .iter()
            .map(BuildTarget::backup_location)
            .filter(|p| p.exists())
            .collect();

        let journal_path = self.journal_path();
        if journal_path.exists() {
            match StageJournal::load(&journal_path) {
                Ok(Some(journal)) => {
                    for entry in journal.entries {
                        if entry.backup.exists() && !stale.contains(&entry.backup) {
                            stale.push(entry.backup);
                        }
                    }
                }
                Ok(None) => {}
                Err(e) => warn!("ignoring unreadable stage journal: {e}"),
            }
            stale.push(journal_path);
        }

        stale
    }

    /// Back up and substitute every target
    pub fn stage(&self, targets: &mut [BuildTarget]) -> Result<()> {
        if let Some(target) = targets.iter().find(|t| t.is_staged()) {
            return Err(SetupError::StagingFailed {
                path: target.working_path.display().to_string(),
                reason: "already staged".to_string(),
            });
        }

        let stale = self.stale_files(targets);
        if !stale.is_empty() {
            return Err(SetupError::StaleBackup {
                paths: stale
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
            });
        }

        let prepared = targets
            .iter()
            .map(prepare)
            .collect::<Result<Vec<Prepared>>>()?;

        // Digests come from the bytes just read, and the journal goes to disk
        // before any backup so a half-written backup can always be detected.
        let journal = StageJournal::new(
            targets
                .iter()
                .zip(&prepared)
                .map(|(target, prepared)| JournalEntry {
                    working: target.working_path.clone(),
                    backup: target.backup_location(),
                    digest: hash::hash_bytes(&prepared.original),
                })
                .collect(),
        );
        if let Err(e) = journal.save(&self.journal_path()) {
            let _ = fs::remove_file(self.journal_path());
            return Err(e);
        }

        for (done, entry) in journal.entries.iter().enumerate() {
            if let Err(e) = fs::copy(&entry.working, &entry.backup) {
                discard(journal.entries[..done].iter().map(|written| written.backup.as_path()));
                if entry.backup.is_file() {
                    let _ = fs::remove_file(&entry.backup);
                }
                let _ = fs::remove_file(self.journal_path());
                return Err(SetupError::StagingFailed {
                    path: entry.backup.display().to_string(),
                    reason: e.to_string(),
                });
            }
        }

        for (target, entry) in targets.iter_mut().zip(journal.entries) {
            target.backup_path = Some(entry.backup);
        }

        let mut write_error = None;
        for (target, prepared) in targets.iter().zip(&prepared) {
            if let Err(e) = fs::write(&target.working_path, &prepared.staged) {
                write_error = Some(SetupError::StagingFailed {
                    path: target.working_path.display().to_string(),
                    reason: e.to_string(),
                });
                break;
            }
        }

        if let Some(failed) = write_error {
            restore::restore(targets, &self.journal_path())?;
            return Err(failed);
        }

        info!(count = targets.len(), "staged templates");
        Ok(())
    }
}

fn prepare(target: &BuildTarget) -> Result<Prepared> {
    let path = &target.working_path;
    let original = fs::read(path).map_err(|e| SetupError::FileReadFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    if let Some(token) = token::missing_tokens(&original, &target.expected).first() {
        return Err(SetupError::MissingToken {
            path: path.display().to_string(),
            token: token.marker().to_string(),
        });
    }

    let staged = token::substitute(&original, &target.substitutions);
    if token::contains_any(&staged) {
        debug!(path = %path.display(), "markers without a value left in place");
    }
    Ok(Prepared { original, staged })
}

fn discard<'a>(paths: impl Iterator<Item = &'a Path>) {
    for path in paths {
        if let Err(e) = fs::remove_file(path) {
            warn!("failed to remove {}: {e}", path.display());
        }
    }
}
