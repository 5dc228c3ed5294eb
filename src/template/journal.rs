//! Stage journal
//!
//! A small JSON record written next to the templates while they are staged.
//! It survives a crash so a later run can tell which files were rewritten and
//! check each backup against the digest of the original it replaced.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, SetupError};

/// Journal file name inside the source root
pub const JOURNAL_FILE: &str = ".moog-setup-stage.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub working: PathBuf,
    pub backup: PathBuf,
    /// BLAKE3 digest of the original content
    pub digest: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageJournal {
    /// PID of the run that staged the tree
    pub pid: u32,
    pub entries: Vec<JournalEntry>,
}

impl StageJournal {
    pub fn new(entries: Vec<JournalEntry>) -> Self {
        Self {
            pid: std::process::id(),
            entries,
        }
    }

    /// Load the journal at `path`, `None` if there is none
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path).map_err(|e| SetupError::FileReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let journal = serde_json::from_str(&content).map_err(|e| SetupError::StagingFailed {
            path: path.display().to_string(),
            reason: format!("unreadable stage journal: {e}"),
        })?;

        Ok(Some(journal))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|e| SetupError::StagingFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Recorded digest for the original of `working`
    pub fn digest_for(&self, working: &Path) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.working == working)
            .map(|e| e.digest.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_journal() {
        let temp = TempDir::new().unwrap();
        assert!(
            StageJournal::load(&temp.path().join(JOURNAL_FILE))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_save_and_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(JOURNAL_FILE);
        let journal = StageJournal::new(vec![JournalEntry {
            working: temp.path().join("Moog.f"),
            backup: temp.path().join("Moog.f.original"),
            digest: "blake3:abc".to_string(),
        }]);

        journal.save(&path).unwrap();
        let loaded = StageJournal::load(&path).unwrap().unwrap();

        assert_eq!(loaded, journal);
        assert_eq!(
            loaded.digest_for(&temp.path().join("Moog.f")),
            Some("blake3:abc")
        );
        assert_eq!(loaded.digest_for(&temp.path().join("Other.f")), None);
    }

    #[test]
    fn test_corrupt_journal() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(JOURNAL_FILE);
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            StageJournal::load(&path),
            Err(SetupError::StagingFailed { .. })
        ));
    }
}
