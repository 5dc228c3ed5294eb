//! Common test utilities for moog-setup integration tests
//!
//! [`MoogRepo`] lays out a miniature MOOG checkout plus a private `bin/`
//! directory of fake tools. Commands built with [`MoogRepo::cmd`] see only
//! that directory on `PATH`, so no real compiler or make is ever run.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

pub const JOURNAL_FILE: &str = ".moog-setup-stage.json";

pub const MAKEFILES: [&str; 6] = [
    "Makefile.mac",
    "Makefile.macsilent",
    "Makefile.rh",
    "Makefile.rhsilent",
    "Makefile.rh64",
    "Makefile.rh64silent",
];

/// Stands in for make: copies the staged makefile and Moog.f into
/// `$FAKE_MAKE_CAPTURE`, then writes the artifact. Uses shell builtins only.
const FAKE_MAKE: &str = r#"#!/bin/sh
makefile="$2"
case "$makefile" in
  *silent) out=MOOGSILENT ;;
  *) out=MOOG ;;
esac
copy() {
  while IFS= read -r line || [ -n "$line" ]; do
    printf '%s\n' "$line"
  done < "$1" > "$2"
}
if [ -n "$FAKE_MAKE_CAPTURE" ]; then
  copy "$makefile" "$FAKE_MAKE_CAPTURE/$makefile"
  copy Moog.f "$FAKE_MAKE_CAPTURE/$makefile.Moog.f"
fi
if [ -n "$FAKE_MAKE_INTERRUPT" ]; then
  kill -INT $PPID
fi
case " $FAKE_MAKE_FAIL " in
  *" $makefile "*) echo "fake make: $makefile failed" >&2; exit 2 ;;
esac
printf '#!/bin/sh\necho %s\n' "$out" > "$out"
echo "fake make: built $out from $makefile"
"#;

const FAKE_COMPILER: &str = "#!/bin/sh\nexit 0\n";

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

/// The variants this host builds, in order
pub fn host_variants() -> [&'static str; 2] {
    if cfg!(target_os = "macos") {
        ["Makefile.mac", "Makefile.macsilent"]
    } else if cfg!(target_pointer_width = "64") {
        ["Makefile.rh64", "Makefile.rh64silent"]
    } else {
        ["Makefile.rh", "Makefile.rhsilent"]
    }
}

pub fn host_machine_tag() -> &'static str {
    if cfg!(target_os = "macos") { "mac" } else { "pcl" }
}

/// A fake MOOG checkout with its own fake toolchain
pub struct MoogRepo {
    pub temp: TempDir,
    /// Repository root
    pub path: PathBuf,
    /// Directory holding the fake tools
    pub bin: PathBuf,
    /// Where the fake make copies what it saw
    pub capture: PathBuf,
    /// Default install prefix for tests
    pub prefix: PathBuf,
}

impl MoogRepo {
    /// Repository with fake `make` and `gfortran`
    pub fn new() -> Self {
        let repo = Self::without_tools();
        repo.add_tool("make", FAKE_MAKE);
        repo.add_tool("gfortran", FAKE_COMPILER);
        repo
    }

    /// Repository with an empty tool directory
    pub fn without_tools() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().join("MOOG");
        let bin = temp.path().join("fakebin");
        let capture = temp.path().join("capture");
        let prefix = temp.path().join("prefix/bin");

        let source = path.join("moog");
        fs::create_dir_all(&source).expect("Failed to create source dir");
        fs::create_dir_all(path.join("lib/smlib")).expect("Failed to create smlib");
        fs::create_dir_all(path.join("lib/aqlib")).expect("Failed to create aqlib");
        fs::create_dir_all(&bin).expect("Failed to create fake bin dir");
        fs::create_dir_all(&capture).expect("Failed to create capture dir");

        for name in MAKEFILES {
            fs::write(source.join(name), makefile_template(name)).expect("Failed to write makefile");
        }
        fs::write(source.join("Moog.f"), source_template("moog")).expect("Failed to write Moog.f");
        fs::write(source.join("Moogsilent.f"), source_template("moogsilent"))
            .expect("Failed to write Moogsilent.f");

        Self {
            temp,
            path,
            bin,
            capture,
            prefix,
        }
    }

    pub fn add_tool(&self, name: &str, script: &str) {
        let tool = self.bin.join(name);
        fs::write(&tool, script).expect("Failed to write fake tool");
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755))
            .expect("Failed to make fake tool executable");
    }

    pub fn remove_tool(&self, name: &str) {
        fs::remove_file(self.bin.join(name)).expect("Failed to remove fake tool");
    }

    pub fn source_dir(&self) -> PathBuf {
        self.path.join("moog")
    }

    pub fn source_file(&self, name: &str) -> PathBuf {
        self.source_dir().join(name)
    }

    pub fn read_source(&self, name: &str) -> String {
        fs::read_to_string(self.source_file(name)).expect("Failed to read source file")
    }

    pub fn write_source(&self, name: &str, content: &str) {
        fs::write(self.source_file(name), content).expect("Failed to write source file");
    }

    /// Staged makefile as the fake make saw it
    pub fn captured(&self, makefile: &str) -> String {
        fs::read_to_string(self.capture.join(makefile)).expect("Failed to read captured makefile")
    }

    /// Staged Moog.f as the fake make saw it while building `makefile`
    pub fn captured_source(&self, makefile: &str) -> String {
        fs::read_to_string(self.capture.join(format!("{makefile}.Moog.f")))
            .expect("Failed to read captured source")
    }

    pub fn templates(&self) -> BTreeMap<String, String> {
        MAKEFILES
            .iter()
            .copied()
            .chain(["Moog.f", "Moogsilent.f"])
            .map(|name| (name.to_string(), self.read_source(name)))
            .collect()
    }

    /// Backups and journals left in the source root, sorted
    pub fn leftovers(&self) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.source_dir())
            .expect("Failed to read source dir")
            .filter_map(Result::ok)
            .map(|e| e.file_name().to_string_lossy().to_string())
            .filter(|name| name.ends_with(".original") || name == JOURNAL_FILE)
            .collect();
        names.sort();
        names
    }

    /// Simulate a run that was killed after staging `makefile`
    pub fn leave_staged(&self, makefile: &str) {
        let original = self.read_source(makefile);
        self.journal(makefile, &original);
        fs::write(self.source_file(&format!("{makefile}.original")), &original)
            .expect("Failed to write backup");
        self.write_source(makefile, &original.replace("$SMLIB", "/stale/smlib"));
    }

    /// Simulate a run that was killed while copying the backup of `name`
    pub fn leave_partial_backup(&self, name: &str) {
        let original = self.read_source(name);
        self.journal(name, &original);
        fs::write(
            self.source_file(&format!("{name}.original")),
            &original[..original.len() / 2],
        )
        .expect("Failed to write backup");
    }

    /// Add an entry for `name` to the stage journal, creating it if needed
    fn journal(&self, name: &str, original: &str) {
        let source = dunce::canonicalize(self.source_dir()).expect("Failed to canonicalize");
        let path = self.source_file(JOURNAL_FILE);
        let mut journal: serde_json::Value = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).expect("Failed to parse journal"),
            Err(_) => serde_json::json!({ "pid": 1, "entries": [] }),
        };
        journal["entries"]
            .as_array_mut()
            .expect("journal entries")
            .push(serde_json::json!({
                "working": source.join(name),
                "backup": source.join(format!("{name}.original")),
                "digest": format!("blake3:{}", blake3::hash(original.as_bytes()).to_hex()),
            }));
        fs::write(&path, journal.to_string()).expect("Failed to write journal");
    }

    /// moog-setup with the fake tools as the only `PATH` entry
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("moog-setup").expect("Failed to find moog-setup binary");
        cmd.env_clear()
            .env("PATH", &self.bin)
            .env("HOME", self.temp.path())
            .env("FAKE_MAKE_CAPTURE", &self.capture)
            .env("MOOG_SETUP_REPO", &self.path)
            .current_dir(self.temp.path());
        cmd
    }
}

pub fn mode(path: &Path) -> u32 {
    fs::metadata(path)
        .expect("Failed to stat file")
        .permissions()
        .mode()
        & 0o777
}
