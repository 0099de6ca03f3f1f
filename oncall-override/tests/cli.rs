// Integration tests for the oncall-override CLI

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

fn oncall_cmd() -> Command {
    cargo_bin_cmd!("oncall-override").into()
}

#[test]
fn test_help_flag() {
    oncall_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("on-call override"))
        .stdout(predicate::str::contains("--schedule"));
}

#[test]
fn test_schedule_is_required() {
    oncall_cmd().assert().failure();
}

#[test]
fn test_missing_token_is_a_clear_error() {
    let temp_dir = TempDir::new().unwrap();

    oncall_cmd()
        .env("HOME", temp_dir.path())
        .env_remove("PAGERDUTY_API_TOKEN")
        .args(["--schedule", "PSCHED1", "--user", "PUSR1", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("PAGERDUTY_API_TOKEN"));
}

#[test]
fn test_end_conflicts_with_hours() {
    oncall_cmd()
        .args([
            "--schedule",
            "PSCHED1",
            "--end",
            "2024-06-12T10:00:00Z",
            "--hours",
            "4",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot be used with"));
}
