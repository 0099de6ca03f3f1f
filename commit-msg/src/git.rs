//! Git subprocess helpers for commit-msg

use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;
use std::process::Command;

/// Run a git command and return stdout
pub fn git(args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .output()
        .context("Failed to execute git command")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("git command failed: {}", stderr.trim());
    }

    String::from_utf8(output.stdout).context("Git output was not valid UTF-8")
}

pub fn is_git_repo() -> bool {
    git2::Repository::open(".").is_ok()
}

pub fn status_porcelain() -> Result<String> {
    git(&["status", "--porcelain"])
}

pub fn name_status() -> Result<String> {
    git(&["diff", "--staged", "--name-status", "--no-color"])
}

pub fn stage_all() -> Result<()> {
    git(&["add", "-A"])?;
    Ok(())
}

pub fn commit(message: &str) -> Result<()> {
    git(&["commit", "-m", message])?;
    Ok(())
}

pub fn push() -> Result<()> {
    git(&["push"])?;
    Ok(())
}

/// Staged diff trimmed down for prompting: minimal context, whitespace
/// noise suppressed, index/file-header metadata lines dropped.
pub fn staged_diff() -> Result<String> {
    let diff = git(&[
        "diff",
        "-U1",
        "--staged",
        "--no-color",
        "--no-prefix",
        "--minimal",
        "--ignore-all-space",
        "--ignore-blank-lines",
    ])?;

    let filtered: Vec<&str> = diff
        .lines()
        .filter(|line| {
            !line.starts_with("index ") && !line.starts_with("--- ") && !line.starts_with("+++ ")
        })
        .collect();

    Ok(filtered.join("\n"))
}

pub fn current_branch() -> Result<String> {
    // symbolic-ref handles unborn branches (initial commit)
    match git(&["symbolic-ref", "--short", "HEAD"]) {
        Ok(branch) => Ok(branch.trim().to_string()),
        Err(_) => git(&["rev-parse", "--abbrev-ref", "HEAD"]).map(|s| s.trim().to_string()),
    }
}

/// Detect the integration branch (main or master)
pub fn main_branch() -> Result<String> {
    if git(&["show-ref", "--verify", "--quiet", "refs/heads/main"]).is_ok() {
        return Ok("main".to_string());
    }
    if git(&["show-ref", "--verify", "--quiet", "refs/heads/master"]).is_ok() {
        return Ok("master".to_string());
    }
    Ok("main".to_string())
}

/// One-line log of commits on the branch since it left the main branch
pub fn branch_commits(current: &str, main: &str) -> Result<String> {
    match git(&["merge-base", main, current]) {
        Ok(base) => {
            let base = base.trim();
            let commits = git(&[
                "log",
                "--pretty=format:%ad - %s",
                "--date=short",
                &format!("{}..{}", base, current),
            ])?;
            if commits.trim().is_empty() {
                Ok(format!("No commits since branching from {}", main))
            } else {
                Ok(commits)
            }
        }
        // No merge base (fresh repo): fall back to recent history
        Err(_) => match git(&["log", "--pretty=format:%ad - %s", "--date=short", "-n", "5"]) {
            Ok(log) => Ok(log),
            Err(_) => Ok("Initial commit".to_string()),
        },
    }
}

/// Basenames of every tracked and untracked-but-not-ignored file in the repo
pub fn repo_filenames() -> Result<HashSet<String>> {
    let repo_root = git(&["rev-parse", "--show-toplevel"])?.trim().to_string();

    let mut listing = String::new();
    for args in [
        &["ls-files", "--cached"][..],
        &["ls-files", "--others", "--exclude-standard"][..],
    ] {
        let output = Command::new("git")
            .current_dir(&repo_root)
            .args(args)
            .output()
            .context("Failed to list repo files")?;
        listing.push_str(&String::from_utf8_lossy(&output.stdout));
    }

    Ok(listing
        .lines()
        .filter_map(|line| {
            Path::new(line.trim())
                .file_name()
                .and_then(|f| f.to_str())
                .map(String::from)
        })
        .collect())
}
