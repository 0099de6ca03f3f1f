// commit-msg - commit staged changes with an LLM-written conventional commit message

mod git;
mod prompts;

use addr::parse_domain_name;
use anyhow::{Context, Result};
use clap::Parser;
use email_address::EmailAddress;
use git_conventional::Commit;
use llm_api::{Config, LlmProvider, LlmRequest, provider_for_preset};
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;
use url::Url;

const MAX_FORMAT_ATTEMPTS: usize = 3;
const MAX_SCRUB_ATTEMPTS: usize = 3;

#[derive(Parser, Debug)]
#[command(name = "commit-msg")]
#[command(about = "Commit with an AI-generated conventional commit message", long_about = None)]
#[command(version)]
struct Args {
    /// Enable debug output
    #[arg(short, long, default_value_t = false)]
    debug: bool,

    /// Only commit what is already staged (don't auto-stage)
    #[arg(long, default_value_t = false)]
    staged: bool,

    /// Skip pushing after the commit
    #[arg(long, default_value_t = false)]
    nopush: bool,

    /// LLM preset to use (defaults to the commit-msg entry in llm.toml)
    #[arg(short, long)]
    preset: Option<String>,

    /// High-level description of the changes to guide the message
    #[arg(trailing_var_arg = true)]
    hint: Vec<String>,
}

#[derive(Debug, Clone)]
struct DraftMessage {
    message: String,
    raw_response: String,
}

/// Extract content between <tag> and </tag>
fn extract_tag(text: &str, tag: &str) -> Option<String> {
    let open = format!("<{}>", tag);
    let close = format!("</{}>", tag);
    let start = text.find(&open)? + open.len();
    let len = text[start..].find(&close)?;
    Some(text[start..start + len].trim().to_string())
}

/// Parse the structured LLM reply into a draft message
fn parse_response(response: String) -> Result<DraftMessage> {
    extract_tag(&response, "thinking")
        .ok_or_else(|| anyhow::anyhow!("response missing <thinking> section"))?;

    let message = extract_tag(&response, "message")
        .ok_or_else(|| anyhow::anyhow!("response missing <message> section"))?;

    if message.is_empty() {
        anyhow::bail!("<message> section is empty");
    }

    Ok(DraftMessage {
        message,
        raw_response: response,
    })
}

/// Ask the LLM for a message, reprompting on malformed structure
async fn generate_message(
    provider: &dyn LlmProvider,
    prompt: &str,
    debug: bool,
) -> Result<DraftMessage> {
    let mut prompt = prompt.to_string();

    for attempt in 1..=MAX_FORMAT_ATTEMPTS {
        if debug {
            eprintln!("Attempt {}/{}", attempt, MAX_FORMAT_ATTEMPTS);
        }

        let request = LlmRequest::new(&prompt).with_system_prompt(prompts::SYSTEM_PROMPT);
        let response = provider.complete(request).await?;
        let content = response.content;

        if debug {
            eprintln!("Raw response:\n{}", content);
        }

        match parse_response(content.clone()) {
            Ok(draft) => return Ok(draft),
            Err(e) if attempt == MAX_FORMAT_ATTEMPTS => {
                anyhow::bail!(
                    "no properly formatted response after {} attempts: {}",
                    MAX_FORMAT_ATTEMPTS,
                    e
                );
            }
            Err(e) => {
                if debug {
                    eprintln!("Parse error: {}, reprompting...", e);
                }
                prompt = prompts::reformat_prompt(&prompt, &content);
            }
        }
    }

    unreachable!("loop returns or bails")
}

/// Policy violations a commit message must not carry
fn check_policy_violations(message: &str, repo_filenames: &HashSet<String>) -> Vec<String> {
    let mut violations = Vec::new();

    if message.split_whitespace().any(EmailAddress::is_valid) {
        violations.push("contains an email address".to_string());
    }

    let has_url = message.split_whitespace().any(|word| {
        // Trailing period is usually end-of-sentence punctuation
        let word = word.strip_suffix('.').unwrap_or(word);

        // Repo filenames like Cargo.toml look like domains; exempt them
        if repo_filenames.contains(word) {
            return false;
        }

        if let Ok(url) = Url::parse(word) {
            return url.has_host();
        }

        if word.contains('.') {
            if let Ok(domain) = parse_domain_name(word) {
                return domain.has_known_suffix();
            }
        }

        false
    });
    if has_url {
        violations.push("contains a URL".to_string());
    }

    let has_emoji = message
        .graphemes(true)
        .any(|grapheme| emojis::get(grapheme).is_some());
    if has_emoji {
        violations.push("contains emoji".to_string());
    }

    violations
}

fn is_conventional_format(message: &str) -> bool {
    Commit::parse(message).is_ok()
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if !git::is_git_repo() {
        anyhow::bail!("Not in a git repository. Run this from within a git repository.");
    }

    // Stage changes unless told to use the existing index
    if args.staged {
        if git::name_status()?.trim().is_empty() {
            println!("No staged changes. Stage files with 'git add' or drop --staged.");
            return Ok(());
        }
    } else {
        if git::status_porcelain()?.trim().is_empty() {
            println!("No changes detected.");
            return Ok(());
        }
        git::stage_all().context("Failed to stage changes")?;
        if git::name_status()?.trim().is_empty() {
            println!("Nothing was staged for commit.");
            return Ok(());
        }
    }

    println!("Gathering commit context");

    let current_branch = git::current_branch().context("Failed to get current branch")?;
    let main_branch = git::main_branch()?;
    let branch_commits = git::branch_commits(&current_branch, &main_branch)?;
    let diff = git::staged_diff().context("Failed to get staged diff")?;
    let files = git::name_status().context("Failed to get file status")?;

    let mut context = String::new();
    if !args.hint.is_empty() {
        context.push_str(&format!(
            "The author describes the change as: {}\n\n---\n\n",
            args.hint.join(" ")
        ));
    }
    context.push_str(&format!(
        "Current branch: {}\n\nCommits on {} since branching from {}:\n{}\n\nChanged files:\n{}\n\nStaged diff:\n{}",
        current_branch, current_branch, main_branch, branch_commits, files, diff
    ));

    let config = Config::load().context("Failed to load LLM configuration")?;
    let preset = args
        .preset
        .as_deref()
        .unwrap_or_else(|| config.default_for("commit-msg"));
    let provider = provider_for_preset(&config, preset)
        .with_context(|| format!("Failed to set up LLM preset '{}'", preset))?
        .with_debug(args.debug);

    println!("Generating commit message ({})", provider.name());

    let prompt = prompts::commit_message_prompt(&context);
    let mut draft = generate_message(&provider, &prompt, args.debug)
        .await
        .context("Failed to generate commit message")?;

    if !is_conventional_format(&draft.message) {
        if args.debug {
            eprintln!("Message is not a valid conventional commit, reprompting");
        }
        let fix_prompt = prompts::reformat_prompt(&prompt, &draft.raw_response);
        draft = generate_message(&provider, &fix_prompt, args.debug)
            .await
            .context("Failed to fix commit message format")?;
    }

    let repo_filenames = git::repo_filenames().unwrap_or_default();
    let mut message = draft.message;

    for attempt in 0..=MAX_SCRUB_ATTEMPTS {
        let violations = check_policy_violations(&message, &repo_filenames);
        if violations.is_empty() {
            break;
        }
        if attempt == MAX_SCRUB_ATTEMPTS {
            eprintln!("Final message:\n{}", message);
            anyhow::bail!(
                "message still violates policy after {} rewrites: {}",
                MAX_SCRUB_ATTEMPTS,
                violations.join(", ")
            );
        }

        eprintln!("Message violates policy ({}), rewriting...", violations.join(", "));
        let request =
            LlmRequest::new(prompts::scrub_prompt(&message)).with_system_prompt(prompts::SYSTEM_PROMPT);
        message = provider
            .complete(request)
            .await
            .context("Failed to rewrite commit message")?
            .content
            .trim()
            .to_string();
    }

    if message.is_empty() {
        anyhow::bail!("Final commit message is empty.");
    }

    println!("--- commit ---");
    println!("{}", message);
    println!("--------------");

    git::commit(&message).context("Failed to commit")?;

    if args.nopush {
        println!("Committed (push skipped due to --nopush)");
        return Ok(());
    }

    match git::push() {
        Ok(_) => println!("Pushed {} to origin", current_branch),
        Err(e) => {
            eprintln!("Warning: commit succeeded but push failed: {}", e);
            eprintln!("Push manually with: git push");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_files() -> HashSet<String> {
        HashSet::new()
    }

    #[test]
    fn test_extract_tag() {
        let text = "pre <message>\nfeat: add x\n</message> post";
        assert_eq!(extract_tag(text, "message").unwrap(), "feat: add x");
        assert!(extract_tag(text, "thinking").is_none());
        assert!(extract_tag("<message>unclosed", "message").is_none());
    }

    #[test]
    fn test_parse_response_requires_both_sections() {
        let full = "<thinking>ok</thinking>\n<message>fix: y</message>";
        assert_eq!(parse_response(full.to_string()).unwrap().message, "fix: y");

        let err = parse_response("<message>fix: y</message>".to_string()).unwrap_err();
        assert!(err.to_string().contains("<thinking>"));

        let err = parse_response("<thinking>ok</thinking>".to_string()).unwrap_err();
        assert!(err.to_string().contains("<message>"));

        assert!(parse_response("<thinking>a</thinking><message></message>".to_string()).is_err());
    }

    #[test]
    fn test_url_detection() {
        let violations = check_policy_violations("feat: see https://example.com", &no_files());
        assert!(violations.iter().any(|v| v.contains("URL")));

        let violations = check_policy_violations("fix: update example.com config", &no_files());
        assert!(violations.iter().any(|v| v.contains("URL")));

        let violations = check_policy_violations("feat: add a parser", &no_files());
        assert!(violations.is_empty());
    }

    #[test]
    fn test_repo_filenames_exempt_from_url_check() {
        let files: HashSet<String> = ["Cargo.toml".to_string(), "main.rs".to_string()].into();
        let violations = check_policy_violations("fix: update Cargo.toml deps", &files);
        assert!(violations.is_empty());

        // A domain-looking word that is a repo filename is exempt too
        let files: HashSet<String> = ["status.io".to_string()].into();
        let violations = check_policy_violations("docs: describe status.io", &files);
        assert!(violations.is_empty());
        let violations = check_policy_violations("docs: describe status.io", &no_files());
        assert!(violations.iter().any(|v| v.contains("URL")));
    }

    #[test]
    fn test_trailing_sentence_period_not_a_url() {
        let msg = "fix: resolve the root path. Previously relied on relative paths.";
        assert!(check_policy_violations(msg, &no_files()).is_empty());

        // An actual domain before end-of-sentence punctuation is still caught
        let msg = "fix: see docs at example.com.";
        assert!(!check_policy_violations(msg, &no_files()).is_empty());
    }

    #[test]
    fn test_email_detection() {
        let violations = check_policy_violations("feat: add user@example.com", &no_files());
        assert!(violations.iter().any(|v| v.contains("email")));
    }

    #[test]
    fn test_emoji_detection() {
        let violations = check_policy_violations("feat: add feature 🎉", &no_files());
        assert!(violations.iter().any(|v| v.contains("emoji")));

        let violations = check_policy_violations("chore: cleanup ✅", &no_files());
        assert!(violations.iter().any(|v| v.contains("emoji")));
    }

    #[test]
    fn test_conventional_format() {
        assert!(is_conventional_format("feat: add new feature"));
        assert!(is_conventional_format("fix(parser): handle empty input"));
        assert!(!is_conventional_format("Add new feature"));
    }
}
