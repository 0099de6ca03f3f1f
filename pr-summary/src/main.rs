// pr-summary - summarize a year of merged PRs into performance-review prose

mod github;
mod prompts;

use anyhow::{Context, Result};
use chrono::{Duration, Local, NaiveDate};
use clap::Parser;
use llm_api::{Config, LlmProvider, LlmRequest, provider_for_preset};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

const EXAMPLES: &str = r#"
EXAMPLES:
    # Summarize your own merged PRs from the last 12 months
    pr-summary

    # A colleague's first half, limited to two repos, written to a file
    pr-summary --author somebody --repo org/api --repo org/web \
        --since 2024-01-01 --until 2024-06-30 --output review.md
"#;

#[derive(Parser, Debug)]
#[command(name = "pr-summary")]
#[command(about = "Summarize merged PRs into performance-review prose", long_about = None)]
#[command(version)]
#[command(after_help = EXAMPLES)]
struct Args {
    /// GitHub login to summarize (default: the gh CLI's logged-in user)
    #[arg(short, long)]
    author: Option<String>,

    /// Restrict to a repository (owner/name); repeatable
    #[arg(short, long)]
    repo: Vec<String>,

    /// Start date, YYYY-MM-DD (default: 12 months before --until)
    #[arg(long)]
    since: Option<String>,

    /// End date, YYYY-MM-DD (default: today)
    #[arg(long)]
    until: Option<String>,

    /// Write the summary to a file as well as stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also copy the summary to the clipboard (macOS)
    #[arg(long, default_value_t = false)]
    copy: bool,

    /// LLM preset to use (defaults to the pr-summary entry in llm.toml)
    #[arg(short, long)]
    preset: Option<String>,

    /// Enable debug output
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

fn parse_date(arg: &str) -> Result<NaiveDate> {
    arg.parse()
        .with_context(|| format!("'{}' is not a YYYY-MM-DD date", arg))
}

/// The gh CLI's logged-in user
fn gh_login() -> Result<String> {
    let output = Command::new("gh")
        .args(["api", "user", "--jq", ".login"])
        .output()
        .context("Failed to execute gh; pass --author or install the GitHub CLI")?;

    if !output.status.success() {
        anyhow::bail!("gh could not report the logged-in user; pass --author instead.");
    }

    let login = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if login.is_empty() {
        anyhow::bail!("gh reported an empty login; pass --author instead.");
    }
    Ok(login)
}

fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut child = Command::new("pbcopy")
        .stdin(Stdio::piped())
        .spawn()
        .context("Failed to spawn pbcopy")?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(text.as_bytes())
            .context("Failed to write to pbcopy")?;
    }

    let status = child.wait().context("Failed to wait for pbcopy")?;
    if !status.success() {
        anyhow::bail!("pbcopy failed");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let until = match &args.until {
        Some(arg) => parse_date(arg)?,
        None => Local::now().date_naive(),
    };
    let since = match &args.since {
        Some(arg) => parse_date(arg)?,
        None => until - Duration::days(365),
    };
    if since > until {
        anyhow::bail!("--since {} is after --until {}", since, until);
    }

    let token = std::env::var("GITHUB_TOKEN").context("GITHUB_TOKEN is not set")?;
    let author = match &args.author {
        Some(author) => author.clone(),
        None => gh_login()?,
    };

    let query = github::build_query(&author, &args.repo, since, until);
    if args.debug {
        eprintln!("Search query: {}", query);
    }

    println!("Fetching merged PRs for {} ({} to {})", author, since, until);
    let client = reqwest::Client::new();
    let prs = github::search_merged_prs(&client, &token, &query, args.debug).await?;

    if prs.is_empty() {
        println!("No merged PRs found in that range.");
        return Ok(());
    }
    println!("Found {} merged PRs", prs.len());

    let config = Config::load().context("Failed to load LLM configuration")?;
    let preset = args
        .preset
        .as_deref()
        .unwrap_or_else(|| config.default_for("pr-summary"));
    let provider = provider_for_preset(&config, preset)
        .with_context(|| format!("Failed to set up LLM preset '{}'", preset))?
        .with_debug(args.debug);

    println!("Summarizing with {}", provider.name());

    let prompt = prompts::summary_prompt(
        &author,
        &since.to_string(),
        &until.to_string(),
        &github::format_prs(&prs),
    );
    let request = LlmRequest::new(prompt).with_system_prompt(prompts::SYSTEM_PROMPT);
    let summary = provider
        .complete(request)
        .await
        .context("Failed to generate summary")?
        .content;

    if summary.trim().is_empty() {
        anyhow::bail!("LLM returned an empty summary.");
    }

    println!();
    println!("{}", summary);

    if let Some(path) = &args.output {
        std::fs::write(path, &summary)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("[INFO] Summary written to {}", path.display());
    }

    if args.copy {
        copy_to_clipboard(&summary)?;
        eprintln!("[INFO] Summary copied to clipboard");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-03-05").unwrap().to_string(), "2024-03-05");
        assert!(parse_date("03/05/2024").is_err());
        assert!(parse_date("2024-13-01").is_err());
    }
}
