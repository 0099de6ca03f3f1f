// pr-describe - open a pull request with an LLM-written title and description

mod git;
mod prompts;

use anyhow::{Context, Result};
use clap::Parser;
use llm_api::{Config, LlmProvider, LlmRequest, provider_for_preset};
use std::io::Write;
use std::process::{Command, Stdio};

const EXAMPLES: &str = r#"
EXAMPLES:
    # Describe the current branch and open a PR against main/master
    pr-describe

    # Preview the generated title and description without creating anything
    pr-describe --dry-run

    # Open a draft PR against a release branch, with extra context
    pr-describe --base release/2.4 --draft "backport of the parser fix"
"#;

#[derive(Parser, Debug)]
#[command(name = "pr-describe")]
#[command(about = "Create a pull request with an AI-generated description", long_about = None)]
#[command(version)]
#[command(after_help = EXAMPLES)]
struct Args {
    /// Base branch (defaults to main or master)
    #[arg(long)]
    base: Option<String>,

    /// Create the PR as a draft
    #[arg(long, default_value_t = false)]
    draft: bool,

    /// Print the title and description instead of creating a PR
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Also copy the description to the clipboard (macOS)
    #[arg(long, default_value_t = false)]
    copy: bool,

    /// Enable debug output
    #[arg(short, long, default_value_t = false)]
    debug: bool,

    /// LLM preset to use (defaults to the pr-describe entry in llm.toml)
    #[arg(short, long)]
    preset: Option<String>,

    /// Extra context to include in the prompt
    #[arg(trailing_var_arg = true)]
    hint: Vec<String>,
}

/// Create the PR with the gh CLI and return its stdout (the PR URL)
fn gh_pr_create(title: &str, body: &str, base: &str, draft: bool) -> Result<String> {
    let mut args = vec!["pr", "create", "--title", title, "--body", body, "--base", base];
    if draft {
        args.push("--draft");
    }

    let output = Command::new("gh")
        .args(&args)
        .output()
        .context("Failed to execute gh. Is the GitHub CLI installed?")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("gh pr create failed: {}", stderr.trim());
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
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

    if !git::is_git_repo() {
        anyhow::bail!("Not in a git repository.");
    }

    let branch = git::current_branch().context("Failed to get current branch")?;
    let base = match &args.base {
        Some(base) => base.clone(),
        None => git::main_branch()?,
    };

    if branch == base {
        anyhow::bail!(
            "Current branch is '{}'; check out a feature branch before opening a PR.",
            base
        );
    }

    let base_rev = git::merge_base(&base, &branch)
        .with_context(|| format!("Failed to find merge base of '{}' and '{}'", base, branch))?;
    let commits = git::branch_commits(&base_rev, &branch)?;
    if commits.is_empty() {
        anyhow::bail!("No commits on '{}' beyond '{}'; nothing to describe.", branch, base);
    }

    let numstat = git::diff_numstat(&base_rev, &branch)?;
    let changes = git::parse_numstat(&numstat);
    let changes_block = git::format_changes(&changes);

    if args.debug {
        eprintln!("{} commits, {} files changed", commits.len(), changes.len());
    }

    let config = Config::load().context("Failed to load LLM configuration")?;
    let preset = args
        .preset
        .as_deref()
        .unwrap_or_else(|| config.default_for("pr-describe"));
    let provider = provider_for_preset(&config, preset)
        .with_context(|| format!("Failed to set up LLM preset '{}'", preset))?
        .with_debug(args.debug);

    println!("Generating PR description ({})", provider.name());

    let prompt = prompts::description_prompt(
        &branch,
        &commits.join("\n"),
        &changes_block,
        &args.hint.join(" "),
    );
    let request = LlmRequest::new(prompt).with_system_prompt(prompts::SYSTEM_PROMPT);
    let description = provider
        .complete(request)
        .await
        .context("Failed to generate PR description")?
        .content;

    if description.trim().is_empty() {
        anyhow::bail!("LLM returned an empty description.");
    }

    let title = pr_title::extract_title(&description, &branch);

    if args.copy {
        copy_to_clipboard(&description)?;
        eprintln!("[INFO] Description copied to clipboard");
    }

    if args.dry_run {
        println!("--- title ---");
        println!("{}", title);
        println!("--- description ---");
        println!("{}", description);
        return Ok(());
    }

    let url = gh_pr_create(&title, &description, &base, args.draft)
        .context("Failed to create pull request")?;
    println!("Created {}", url);

    Ok(())
}
