//! Git helpers and diff --numstat parsing for pr-describe

use anyhow::{Context, Result};
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
    Command::new("git")
        .args(["rev-parse", "--git-dir"])
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

pub fn current_branch() -> Result<String> {
    git(&["rev-parse", "--abbrev-ref", "HEAD"]).map(|s| s.trim().to_string())
}

/// Detect the integration branch (main or master)
pub fn main_branch() -> Result<String> {
    if git(&["show-ref", "--verify", "--quiet", "refs/heads/main"]).is_ok() {
        return Ok("main".to_string());
    }
    if git(&["show-ref", "--verify", "--quiet", "refs/heads/master"]).is_ok() {
        return Ok("master".to_string());
    }
    anyhow::bail!("Could not find a 'main' or 'master' branch; pass --base explicitly.")
}

pub fn merge_base(base: &str, branch: &str) -> Result<String> {
    git(&["merge-base", base, branch]).map(|s| s.trim().to_string())
}

/// Commit subjects on the branch since it left the base branch
pub fn branch_commits(base_rev: &str, branch: &str) -> Result<Vec<String>> {
    let log = git(&[
        "log",
        "--pretty=format:%s",
        &format!("{}..{}", base_rev, branch),
    ])?;
    Ok(log.lines().map(String::from).filter(|s| !s.is_empty()).collect())
}

pub fn diff_numstat(base_rev: &str, branch: &str) -> Result<String> {
    git(&["diff", "--numstat", &format!("{}..{}", base_rev, branch)])
}

/// Per-file change counts from `git diff --numstat`.
/// Binary files report `-` counts and parse as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: String,
    pub added: Option<u64>,
    pub deleted: Option<u64>,
}

impl FileChange {
    pub fn is_binary(&self) -> bool {
        self.added.is_none() && self.deleted.is_none()
    }
}

/// Parse `git diff --numstat` output.
///
/// Each line is `<added>\t<deleted>\t<path>`; renames keep git's
/// `old => new` form in the path. Malformed lines are skipped.
pub fn parse_numstat(output: &str) -> Vec<FileChange> {
    output
        .lines()
        .filter_map(|line| {
            let mut parts = line.splitn(3, '\t');
            let added = parts.next()?;
            let deleted = parts.next()?;
            let path = parts.next()?.trim();
            if path.is_empty() {
                return None;
            }

            let parse_count = |field: &str| -> Option<Option<u64>> {
                if field == "-" {
                    Some(None)
                } else {
                    field.parse::<u64>().ok().map(Some)
                }
            };

            Some(FileChange {
                path: path.to_string(),
                added: parse_count(added)?,
                deleted: parse_count(deleted)?,
            })
        })
        .collect()
}

/// Render parsed changes as a prompt-friendly block with a totals line
pub fn format_changes(changes: &[FileChange]) -> String {
    let mut lines = Vec::with_capacity(changes.len() + 1);
    let mut total_added = 0u64;
    let mut total_deleted = 0u64;

    for change in changes {
        if change.is_binary() {
            lines.push(format!("{} (binary)", change.path));
        } else {
            let added = change.added.unwrap_or(0);
            let deleted = change.deleted.unwrap_or(0);
            total_added += added;
            total_deleted += deleted;
            lines.push(format!("{} (+{} -{})", change.path, added, deleted));
        }
    }

    lines.push(format!(
        "Total: {} files changed, +{} -{}",
        changes.len(),
        total_added,
        total_deleted
    ));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numstat_basic() {
        let output = "12\t3\tsrc/main.rs\n0\t7\tREADME.md\n";
        let changes = parse_numstat(output);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].path, "src/main.rs");
        assert_eq!(changes[0].added, Some(12));
        assert_eq!(changes[0].deleted, Some(3));
        assert!(!changes[0].is_binary());
    }

    #[test]
    fn test_parse_numstat_binary() {
        let changes = parse_numstat("-\t-\tassets/logo.png\n");
        assert_eq!(changes.len(), 1);
        assert!(changes[0].is_binary());
        assert_eq!(changes[0].added, None);
    }

    #[test]
    fn test_parse_numstat_rename_path_kept_verbatim() {
        let changes = parse_numstat("5\t5\tsrc/{old.rs => new.rs}\n");
        assert_eq!(changes[0].path, "src/{old.rs => new.rs}");
    }

    #[test]
    fn test_parse_numstat_skips_malformed_lines() {
        let output = "garbage\n12\t3\tsrc/lib.rs\nnot\tnumstat\n";
        let changes = parse_numstat(output);
        // "not\tnumstat" has only two fields; "garbage" has one
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].path, "src/lib.rs");
    }

    #[test]
    fn test_parse_numstat_empty() {
        assert!(parse_numstat("").is_empty());
    }

    #[test]
    fn test_parse_numstat_path_with_tabs() {
        // splitn(3) keeps any further tabs inside the path field
        let changes = parse_numstat("1\t1\tweird\tname.txt\n");
        assert_eq!(changes[0].path, "weird\tname.txt");
    }

    #[test]
    fn test_format_changes_totals() {
        let changes = parse_numstat("10\t2\ta.rs\n-\t-\tb.png\n3\t0\tc.rs\n");
        let formatted = format_changes(&changes);
        assert!(formatted.contains("a.rs (+10 -2)"));
        assert!(formatted.contains("b.png (binary)"));
        assert!(formatted.contains("Total: 3 files changed, +13 -2"));
    }
}
