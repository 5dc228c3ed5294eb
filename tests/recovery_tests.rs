//! Stale staged trees: refusal, --recover, and the restore command

mod common;

use common::{MoogRepo, host_variants};
use predicates::prelude::*;

#[test]
fn test_stale_backup_is_refused() {
    let repo = MoogRepo::new();
    repo.leave_staged("Makefile.rh64");
    let crashed = repo.templates();

    repo.cmd()
        .args(["install", "--prefix"])
        .arg(&repo.prefix)
        .assert()
        .code(5)
        .stderr(predicate::str::contains("Makefile.rh64.original"))
        .stderr(predicate::str::contains("moog-setup restore"));

    assert_eq!(repo.templates(), crashed);
    assert_eq!(
        repo.leftovers(),
        vec![
            common::JOURNAL_FILE.to_string(),
            "Makefile.rh64.original".to_string()
        ]
    );
    assert!(!repo.prefix.exists());
}

#[test]
fn test_restore_command_puts_originals_back() {
    let repo = MoogRepo::new();
    let pristine = repo.templates();
    repo.leave_staged("Makefile.rh64");
    repo.leave_staged("Makefile.mac");

    repo.cmd()
        .arg("restore")
        .assert()
        .success()
        .stdout(predicate::str::contains("Restored 2 template(s)"));

    assert_eq!(repo.templates(), pristine);
    assert!(repo.leftovers().is_empty());
}

#[test]
fn test_restore_on_clean_tree_is_noop() {
    let repo = MoogRepo::new();
    let pristine = repo.templates();

    repo.cmd()
        .arg("restore")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to restore"));

    assert_eq!(repo.templates(), pristine);
}

#[test]
fn test_recover_then_install_substitutes_once() {
    let repo = MoogRepo::new();
    let pristine = repo.templates();
    let [interactive, _] = host_variants();
    repo.leave_staged(interactive);

    repo.cmd()
        .args(["install", "--recover", "--prefix"])
        .arg(&repo.prefix)
        .assert()
        .success()
        .stdout(predicate::str::contains("Recovered 1 template(s)"));

    let staged = repo.captured(interactive);
    assert!(!staged.contains("/stale/smlib"));
    assert_eq!(staged.matches("SMTOOLS = ").count(), 1);
    assert!(staged.ends_with("LIBS = $(SMTOOLS)/lib/libplotsub.a\n"));

    assert_eq!(repo.templates(), pristine);
    assert!(repo.leftovers().is_empty());
    assert!(repo.prefix.join("MOOG").is_file());
}

#[test]
fn test_restore_for_repo_flag() {
    let repo = MoogRepo::new();
    let pristine = repo.templates();
    repo.leave_staged("Moog.f");

    repo.cmd()
        .env_remove("MOOG_SETUP_REPO")
        .arg("restore")
        .arg("--repo")
        .arg(&repo.path)
        .assert()
        .success();

    assert_eq!(repo.templates(), pristine);
}

#[test]
fn test_restore_discards_partial_backup() {
    let repo = MoogRepo::new();
    let pristine = repo.templates();
    repo.leave_partial_backup("Moog.f");

    repo.cmd().arg("restore").assert().success();

    assert_eq!(repo.templates(), pristine);
    assert!(repo.leftovers().is_empty());
}

#[test]
fn test_unverifiable_backup_is_never_restored() {
    let repo = MoogRepo::new();
    let pristine = repo.templates();
    repo.write_source("Moog.f.original", "      program mo");

    repo.cmd()
        .arg("restore")
        .assert()
        .code(6)
        .stderr(predicate::str::contains("Moog.f.original"));

    assert_eq!(repo.templates(), pristine);
    assert_eq!(repo.leftovers(), vec!["Moog.f.original".to_string()]);
}
