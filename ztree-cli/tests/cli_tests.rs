//! Argument-surface tests for the `ztree` binary. No network involved:
//! every case fails or returns before any connection is attempted.

use assert_cmd::Command;
use predicates::prelude::*;

fn ztree() -> Command {
    Command::cargo_bin("ztree").expect("binary")
}

#[test]
fn help_lists_subcommands() {
    ztree()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("tree"));
}

#[test]
fn version_flag_works() {
    ztree()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ztree"));
}

#[test]
fn sync_requires_bucket() {
    ztree()
        .arg("sync")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--bucket"));
}

#[test]
fn status_rejects_unknown_flags() {
    ztree()
        .args(["status", "--bucket", "b", "--nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--nope"));
}

#[test]
fn sync_help_documents_env_fallbacks() {
    ztree()
        .args(["sync", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ZK_HOST"))
        .stdout(predicate::str::contains("AWS_REGION"))
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--keep-going"));
}
