// jira-ticket - fetch and print Jira issues from the command line

mod config;

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use clap::Parser;
use config::JiraConfig;
use reqwest::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;

#[derive(Parser, Debug)]
#[command(name = "jira-ticket")]
#[command(about = "Fetch Jira issues and print them", long_about = None)]
#[command(version)]
struct Args {
    /// Issue keys to fetch, e.g. PROJ-123
    #[arg(required = true, value_name = "KEY")]
    keys: Vec<String>,

    /// Print raw JSON instead of the human-readable format
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Enable debug output
    #[arg(short, long, default_value_t = false)]
    debug: bool,
}

#[derive(Debug, Deserialize)]
struct Issue {
    key: String,
    fields: Fields,
}

#[derive(Debug, Deserialize)]
struct Fields {
    summary: String,
    status: Named,
    issuetype: Named,
    assignee: Option<Assignee>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

#[derive(Debug, Deserialize)]
struct Assignee {
    #[serde(rename = "displayName")]
    display_name: String,
}

/// Basic auth header value for Jira: base64(email:token)
fn auth_header(email: &str, token: &str) -> String {
    let encoded = BASE64.encode(format!("{}:{}", email, token));
    format!("Basic {}", encoded)
}

/// REST endpoint for a single issue
fn issue_url(base_url: &str, key: &str) -> String {
    format!(
        "{}/rest/api/2/issue/{}?fields=summary,status,issuetype,assignee,description",
        base_url.trim_end_matches('/'),
        key
    )
}

fn browse_url(base_url: &str, key: &str) -> String {
    format!("{}/browse/{}", base_url.trim_end_matches('/'), key)
}

/// Wrap prose at the given width, preserving existing line breaks.
/// Words longer than the width (URLs, identifiers) are hard-broken.
fn wrap_text(text: &str, width: usize) -> String {
    let mut wrapped = Vec::new();
    for line in text.lines() {
        if line.len() <= width {
            wrapped.push(line.to_string());
            continue;
        }
        let mut current = String::new();
        for word in line.split_whitespace() {
            if !current.is_empty() && current.len() + word.len() + 1 > width {
                wrapped.push(std::mem::take(&mut current));
            }
            let mut rest = word;
            while rest.chars().count() > width {
                if !current.is_empty() {
                    wrapped.push(std::mem::take(&mut current));
                }
                let split = rest
                    .char_indices()
                    .nth(width)
                    .map(|(idx, _)| idx)
                    .unwrap_or(rest.len());
                wrapped.push(rest[..split].to_string());
                rest = &rest[split..];
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(rest);
        }
        if !current.is_empty() {
            wrapped.push(current);
        }
    }
    wrapped.join("\n")
}

async fn fetch_issue(client: &Client, config: &JiraConfig, token: &str, key: &str) -> Result<String> {
    let url = issue_url(&config.base_url, key);
    let response = client
        .get(&url)
        .header(AUTHORIZATION, auth_header(&config.email, token))
        .header(ACCEPT, "application/json")
        .send()
        .await
        .with_context(|| format!("Failed to call Jira for {}", key))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .with_context(|| format!("Failed to read Jira response for {}", key))?;

    if !status.is_success() {
        anyhow::bail!("Jira responded with {} for {}: {}", status, key, body);
    }

    Ok(body)
}

fn print_issue(config: &JiraConfig, body: &str) -> Result<()> {
    let issue: Issue = serde_json::from_str(body).context("Failed to parse Jira issue")?;

    let assignee = issue
        .fields
        .assignee
        .map(|a| a.display_name)
        .unwrap_or_else(|| "Unassigned".to_string());

    println!("{}  [{} / {}]", issue.key, issue.fields.issuetype.name, issue.fields.status.name);
    println!("Assignee: {}", assignee);
    println!("Summary:  {}", issue.fields.summary);
    if let Some(description) = issue.fields.description.filter(|d| !d.trim().is_empty()) {
        println!();
        println!("{}", wrap_text(description.trim(), 80));
    }
    println!();
    println!("{}", browse_url(&config.base_url, &issue.key));
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = JiraConfig::load()?;
    let token = JiraConfig::token()?;
    let client = Client::new();

    let mut first = true;
    for key in &args.keys {
        if args.debug {
            eprintln!("Fetching {}", issue_url(&config.base_url, key));
        }

        let body = fetch_issue(&client, &config, &token, key).await?;

        if !first {
            println!("{}", "-".repeat(60));
        }
        first = false;

        if args.json {
            let value: serde_json::Value =
                serde_json::from_str(&body).context("Jira returned invalid JSON")?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        } else {
            print_issue(&config, &body)?;
        }
    }

    Ok(())
}
