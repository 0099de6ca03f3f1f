// Integration tests for the jira-ticket CLI

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

fn jira_ticket_cmd() -> Command {
    cargo_bin_cmd!("jira-ticket").into()
}

#[test]
fn test_help_flag() {
    jira_ticket_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Fetch Jira issues"));
}

#[test]
fn test_requires_issue_key() {
    jira_ticket_cmd().assert().failure();
}

#[test]
fn test_unconfigured_is_a_clear_error() {
    // Point HOME at an empty directory so no jira.toml is found
    let temp_dir = TempDir::new().unwrap();

    jira_ticket_cmd()
        .env("HOME", temp_dir.path())
        .arg("PROJ-1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Jira is not configured"));
}
