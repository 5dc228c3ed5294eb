//! Test fixtures shared by unit tests.
//!
//! [`MoogTree`] lays out a miniature MOOG repository in a temp directory:
//! makefile templates for every variant, the two driver sources, and the two
//! library roots.
//!
//! ```ignore
//! let tree = MoogTree::new();
//! let targets = tree.targets();
//! let before = tree.snapshot();
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::template::{self, BuildTarget, TemplateEngine, Token, TokenValues};

pub const MAKEFILES: [&str; 6] = [
    "Makefile.mac",
    "Makefile.macsilent",
    "Makefile.rh",
    "Makefile.rhsilent",
    "Makefile.rh64",
    "Makefile.rh64silent",
];

pub fn makefile_template(name: &str) -> String {
    format!(
        "# {name}\n$FCONFIG\nSMTOOLS = $SMLIB\nAQLIBS = $AQLIB\nLIBS = $(SMTOOLS)/lib/libplotsub.a\n"
    )
}

pub fn source_template(program: &str) -> String {
    format!(
        "      program {program}\n      moogpath = '$SRCDIR'\n      machine = '$MACHINE'\n      end\n"
    )
}

/// A throwaway MOOG repository
pub struct MoogTree {
    pub temp: TempDir,
    pub root: PathBuf,
}

impl MoogTree {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();

        let source = root.join("moog");
        fs::create_dir_all(&source).expect("Failed to create source dir");
        fs::create_dir_all(root.join("lib/smlib")).expect("Failed to create smlib");
        fs::create_dir_all(root.join("lib/aqlib")).expect("Failed to create aqlib");

        for name in MAKEFILES {
            fs::write(source.join(name), makefile_template(name)).expect("Failed to write makefile");
        }
        fs::write(source.join("Moog.f"), source_template("moog")).expect("Failed to write Moog.f");
        fs::write(source.join("Moogsilent.f"), source_template("moogsilent"))
            .expect("Failed to write Moogsilent.f");
        fs::write(source.join("Abfind.f"), "      subroutine abfind\n      end\n")
            .expect("Failed to write Abfind.f");

        Self { temp, root }
    }

    pub fn source_dir(&self) -> PathBuf {
        self.root.join("moog")
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.source_dir().join(name)
    }

    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.path(name)).expect("Failed to read file")
    }

    pub fn write(&self, name: &str, content: &str) {
        fs::write(self.path(name), content).expect("Failed to write file");
    }

    pub fn engine(&self) -> TemplateEngine {
        TemplateEngine::new(self.source_dir())
    }

    pub fn token_values(&self) -> TokenValues {
        TokenValues::from([
            (Token::SmLib, self.root.join("lib/smlib").display().to_string()),
            (Token::AqLib, self.root.join("lib/aqlib").display().to_string()),
            (Token::SrcDir, self.source_dir().display().to_string()),
            (Token::Machine, "pcl".to_string()),
            (
                Token::FConfig,
                "FC = gfortran -Wall -O4 -ffixed-line-length-72 -ff2c -m64".to_string(),
            ),
        ])
    }

    pub fn targets(&self) -> Vec<BuildTarget> {
        let values = self.token_values();
        template::discover(&self.source_dir())
            .expect("Failed to discover templates")
            .into_iter()
            .map(|spec| BuildTarget::new(spec, &values))
            .collect()
    }

    /// Content of every file in the source root
    pub fn snapshot(&self) -> BTreeMap<PathBuf, Vec<u8>> {
        snapshot_dir(&self.source_dir())
    }

    /// Backup files and journals currently on disk
    pub fn leftovers(&self) -> Vec<PathBuf> {
        self.snapshot()
            .into_keys()
            .filter(|p| {
                let name = p.file_name().map(|n| n.to_string_lossy().to_string());
                name.is_some_and(|n| {
                    n.ends_with(template::BACKUP_SUFFIX) || n == template::JOURNAL_FILE
                })
            })
            .collect()
    }
}

impl Default for MoogTree {
    fn default() -> Self {
        Self::new()
    }
}

pub fn snapshot_dir(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    walkdir::WalkDir::new(dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| {
            let content = fs::read(e.path()).expect("Failed to read file");
            (e.into_path(), content)
        })
        .collect()
}
