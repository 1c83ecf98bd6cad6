//! CLI integration tests for the Photon command-line interface.
//!
//! These tests cover parsing and help output only; no vendor calls are made.

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a command for the photon binary.
fn photon() -> Command {
    Command::cargo_bin("photon").unwrap()
}

#[test]
fn test_help_displays() {
    photon()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Photon"))
        .stdout(predicate::str::contains("Dream Machine"));
}

#[test]
fn test_version_displays() {
    photon()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("photon"));
}

#[test]
fn test_help_lists_subcommands() {
    photon()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("start"))
        .stdout(predicate::str::contains("usage"))
        .stdout(predicate::str::contains("auth"));
}

#[test]
fn test_start_rejects_bad_bind_address() {
    photon()
        .args(["start", "--bind", "not-an-address"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid --bind address"));
}

#[test]
fn test_unknown_subcommand_fails() {
    photon()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}
