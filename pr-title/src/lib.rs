//! Conventional-commit title extraction
//!
//! Pulls a single-line, conventional-commit-style title out of a free-form
//! PR description (typically LLM-generated markdown). Honors bracketed
//! ticket tags like `[PROJ-123]` and an explicit `## PR Title:` heading.
//! Falls back to a caller-supplied default (usually the branch name) when
//! nothing in the text qualifies.

use once_cell::sync::Lazy;
use regex::Regex;

/// Recognized conventional commit types (case-sensitive)
pub const COMMIT_TYPES: &[&str] = &[
    "feat", "fix", "chore", "docs", "style", "refactor", "perf", "test",
];

/// Bracketed ticket tags, e.g. `[PROJ-123]` (non-greedy, empty allowed)
static TICKET_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[.*?\]").unwrap());

/// Explicit title heading: `## PR Title: <content>` with any number of `#`
static TITLE_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^#+\s*pr title:\s*(.*)$").unwrap());

/// A line that starts with a recognized type immediately followed by a colon
static TYPE_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*((?:feat|fix|chore|docs|style|refactor|perf|test):.*)$").unwrap()
});

/// Trailing non-word characters (stray punctuation the model tacks on)
static TRAILING_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\W+$").unwrap());

/// Check whether text starts with a recognized commit type followed by a colon
pub fn is_conventional(text: &str) -> bool {
    COMMIT_TYPES
        .iter()
        .any(|t| text.strip_prefix(t).is_some_and(|rest| rest.starts_with(':')))
}

/// Concatenate all bracketed ticket tags on a line, left to right
pub fn ticket_prefix(line: &str) -> String {
    TICKET_TAG
        .find_iter(line)
        .map(|m| m.as_str())
        .collect::<String>()
}

/// Extract a conventional-commit title from a free-form description.
///
/// Scans line by line, returning on the first qualifying match:
///
/// 1. A `#+ PR Title:` heading whose content starts with a recognized type
///    is returned verbatim. A heading with unrecognized content consumes
///    its line and scanning continues.
/// 2. A line whose body (ticket tags stripped) starts with `type:` is
///    returned with trailing punctuation removed, prefixed by the ticket
///    tags from the same line or, failing that, the most recent prior line
///    that carried any.
///
/// If no line qualifies, `default_title` is returned unchanged. Pure and
/// infallible: no I/O, no shared state, deterministic for a given input.
pub fn extract_title(description: &str, default_title: &str) -> String {
    let mut last_ticket_prefix = String::new();

    for line in description.lines() {
        let prefix = ticket_prefix(line);
        if !prefix.is_empty() {
            last_ticket_prefix = prefix;
        }

        // Heading check wins over the plain type check for the same line
        if let Some(caps) = TITLE_HEADING.captures(line.trim()) {
            let content = caps[1].trim();
            if is_conventional(content) {
                return content.to_string();
            }
            // Heading with unrecognized content: line is consumed
            continue;
        }

        let body = TICKET_TAG.replace_all(line, "");
        let body = body.trim();
        if let Some(caps) = TYPE_LINE.captures(body) {
            let title = TRAILING_PUNCT.replace(caps[1].trim(), "");
            if last_ticket_prefix.is_empty() {
                return title.to_string();
            }
            return format!("{} {}", last_ticket_prefix, title);
        }
    }

    default_title.to_string()
}
