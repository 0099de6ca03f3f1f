//! GitHub search API client for merged PRs

use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;

const SEARCH_URL: &str = "https://api.github.com/search/issues";
const PER_PAGE: usize = 100;
const MAX_PAGES: usize = 10;

/// Body text kept per PR when building the summary prompt
const MAX_BODY_CHARS: usize = 600;

#[derive(Debug, Clone, Deserialize)]
pub struct MergedPr {
    pub title: String,
    pub body: Option<String>,
    pub closed_at: Option<String>,
    pub repository_url: String,
}

impl MergedPr {
    /// `owner/name` from the API repository URL
    pub fn repo_name(&self) -> &str {
        match self.repository_url.find("/repos/") {
            Some(idx) => &self.repository_url[idx + "/repos/".len()..],
            None => &self.repository_url,
        }
    }

    /// Merge date (YYYY-MM-DD) when the API reported one
    pub fn merged_date(&self) -> &str {
        self.closed_at
            .as_deref()
            .map(|ts| ts.split('T').next().unwrap_or(ts))
            .unwrap_or("unknown")
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    items: Vec<MergedPr>,
}

/// Search query for merged PRs by an author in a date range
pub fn build_query(author: &str, repos: &[String], since: NaiveDate, until: NaiveDate) -> String {
    let mut query = format!("is:pr is:merged author:{} merged:{}..{}", author, since, until);
    for repo in repos {
        query.push_str(&format!(" repo:{}", repo));
    }
    query
}

/// Truncate text to a maximum number of characters on a char boundary
pub fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Fetch all matching PRs, paging until the API runs dry
pub async fn search_merged_prs(
    client: &Client,
    token: &str,
    query: &str,
    debug: bool,
) -> Result<Vec<MergedPr>> {
    let mut all = Vec::new();

    for page in 1..=MAX_PAGES {
        if debug {
            eprintln!("Fetching page {} of search results", page);
        }

        let per_page = PER_PAGE.to_string();
        let page_number = page.to_string();
        let response = client
            .get(SEARCH_URL)
            .query(&[
                ("q", query),
                ("per_page", per_page.as_str()),
                ("page", page_number.as_str()),
            ])
            .header("User-Agent", "pr-summary")
            .header("Accept", "application/vnd.github+json")
            .bearer_auth(token)
            .send()
            .await
            .context("Failed to call the GitHub search API")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("GitHub responded with {}: {}", status, body);
        }

        let payload: SearchResponse = response
            .json()
            .await
            .context("Failed to parse GitHub search response")?;

        let count = payload.items.len();
        all.extend(payload.items);
        if count < PER_PAGE {
            break;
        }
    }

    Ok(all)
}

/// One prompt block per PR: repo, date, title, truncated body
pub fn format_prs(prs: &[MergedPr]) -> String {
    prs.iter()
        .map(|pr| {
            let mut block = format!("- [{}] {} (merged {})", pr.repo_name(), pr.title, pr.merged_date());
            if let Some(body) = pr.body.as_deref().filter(|b| !b.trim().is_empty()) {
                block.push_str("\n  ");
                block.push_str(&truncate(body.trim(), MAX_BODY_CHARS).replace('\n', "\n  "));
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_build_query() {
        let query = build_query("octocat", &[], date("2024-01-01"), date("2024-12-31"));
        assert_eq!(query, "is:pr is:merged author:octocat merged:2024-01-01..2024-12-31");
    }

    #[test]
    fn test_build_query_with_repos() {
        let repos = vec!["org/a".to_string(), "org/b".to_string()];
        let query = build_query("octocat", &repos, date("2024-01-01"), date("2024-06-30"));
        assert!(query.ends_with(" repo:org/a repo:org/b"));
    }

    #[test]
    fn test_repo_name() {
        let pr = MergedPr {
            title: "t".to_string(),
            body: None,
            closed_at: None,
            repository_url: "https://api.github.com/repos/org/widget".to_string(),
        };
        assert_eq!(pr.repo_name(), "org/widget");
    }

    #[test]
    fn test_merged_date() {
        let pr = MergedPr {
            title: "t".to_string(),
            body: None,
            closed_at: Some("2024-03-05T12:34:56Z".to_string()),
            repository_url: String::new(),
        };
        assert_eq!(pr.merged_date(), "2024-03-05");
    }

    #[test]
    fn test_truncate_on_char_boundary() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 3), "hel");
        // Multibyte chars don't split
        assert_eq!(truncate("héllo", 2), "hé");
    }

    #[test]
    fn test_format_prs() {
        let prs = vec![MergedPr {
            title: "feat: add parser".to_string(),
            body: Some("Adds the parser.\nWith tests.".to_string()),
            closed_at: Some("2024-03-05T00:00:00Z".to_string()),
            repository_url: "https://api.github.com/repos/org/widget".to_string(),
        }];
        let formatted = format_prs(&prs);
        assert!(formatted.contains("[org/widget] feat: add parser (merged 2024-03-05)"));
        assert!(formatted.contains("  Adds the parser.\n  With tests."));
    }
}
