// oncall-override - post an on-call schedule override to PagerDuty

mod config;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDateTime, TimeZone, Utc};
use clap::Parser;
use config::OncallConfig;
use reqwest::Client;
use serde_json::{Value, json};
use std::io::{self, Write};

const API_BASE: &str = "https://api.pagerduty.com";

const EXAMPLES: &str = r#"
EXAMPLES:
    # Take the primary schedule for the next 8 hours (default window)
    oncall-override --schedule primary

    # Cover a colleague tomorrow morning, skipping the confirmation prompt
    oncall-override --schedule primary --user PUSR123 \
        --start 2024-06-12T09:00 --hours 4 --yes
"#;

#[derive(Parser, Debug)]
#[command(name = "oncall-override")]
#[command(about = "Post an on-call override to PagerDuty", long_about = None)]
#[command(version)]
#[command(after_help = EXAMPLES)]
struct Args {
    /// Schedule name from oncall.toml, or a raw PagerDuty schedule ID
    #[arg(short, long)]
    schedule: String,

    /// PagerDuty user ID taking the override (defaults to default_user)
    #[arg(short, long)]
    user: Option<String>,

    /// Override start, RFC 3339 or local YYYY-MM-DDTHH:MM (default: now)
    #[arg(long)]
    start: Option<String>,

    /// Override end, same formats as --start
    #[arg(long, conflicts_with = "hours")]
    end: Option<String>,

    /// Override duration in hours from the start
    #[arg(long, default_value_t = 8)]
    hours: i64,

    /// Skip the confirmation prompt
    #[arg(short, long, default_value_t = false)]
    yes: bool,
}

/// Parse a time argument: RFC 3339, or a naive timestamp read in the
/// configured time_zone offset (the process-local zone when unset)
fn parse_when(arg: &str, zone: Option<FixedOffset>) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(arg) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(arg, "%Y-%m-%dT%H:%M")
        .with_context(|| format!("'{}' is not RFC 3339 or YYYY-MM-DDTHH:MM", arg))?;
    if let Some(offset) = zone {
        let dt = offset
            .from_local_datetime(&naive)
            .single()
            .with_context(|| format!("'{}' is ambiguous in the configured time zone", arg))?;
        return Ok(dt.with_timezone(&Utc));
    }
    let local = Local
        .from_local_datetime(&naive)
        .single()
        .with_context(|| format!("'{}' is ambiguous in the local time zone", arg))?;
    Ok(local.with_timezone(&Utc))
}

fn build_payload(user: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Value {
    json!({
        "overrides": [{
            "start": start.to_rfc3339(),
            "end": end.to_rfc3339(),
            "user": {
                "id": user,
                "type": "user_reference"
            }
        }]
    })
}

/// Pull created override IDs out of the response. PagerDuty has returned
/// both bare override objects and {status, override} wrappers here.
fn created_override_ids(response: &Value) -> Vec<String> {
    response["overrides"]
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| {
                    entry["id"]
                        .as_str()
                        .or_else(|| entry["override"]["id"].as_str())
                        .map(String::from)
                })
                .collect()
        })
        .unwrap_or_default()
}

fn confirm(question: &str) -> Result<bool> {
    eprint!("{} [y/N] ", question);
    io::stderr().flush().ok();
    let mut answer = String::new();
    io::stdin()
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = OncallConfig::load()?;
    let token = OncallConfig::token()?;

    let schedule_id = config.resolve_schedule(&args.schedule).to_string();
    let user = args
        .user
        .clone()
        .or_else(|| config.default_user.clone())
        .context("No user given: pass --user or set default_user in oncall.toml")?;

    let zone = config.utc_offset()?;
    let start = match &args.start {
        Some(arg) => parse_when(arg, zone)?,
        None => Utc::now(),
    };
    let end = match &args.end {
        Some(arg) => parse_when(arg, zone)?,
        None => start + Duration::hours(args.hours),
    };
    if end <= start {
        anyhow::bail!("Override end {} is not after start {}", end, start);
    }

    println!("Override: schedule {} -> user {}", schedule_id, user);
    println!(
        "  {} to {} ({}h)",
        start.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
        end.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
        (end - start).num_minutes() as f64 / 60.0
    );

    if !args.yes && !confirm("Post this override?")? {
        println!("Aborted.");
        return Ok(());
    }

    let url = format!("{}/schedules/{}/overrides", API_BASE, schedule_id);
    let payload = build_payload(&user, start, end);
    log::debug!("POST {} {}", url, payload);

    let response = Client::new()
        .post(&url)
        .header("Authorization", format!("Token token={}", token))
        .header("Accept", "application/vnd.pagerduty+json;version=2")
        .json(&payload)
        .send()
        .await
        .context("Failed to call PagerDuty")?;

    let status = response.status();
    let body = response
        .text()
        .await
        .context("Failed to read PagerDuty response")?;

    if !status.is_success() {
        anyhow::bail!("PagerDuty responded with {}: {}", status, body);
    }

    let parsed: Value = serde_json::from_str(&body).context("PagerDuty returned invalid JSON")?;
    let ids = created_override_ids(&parsed);
    if ids.is_empty() {
        log::debug!("response body: {}", body);
        println!("Override posted.");
    } else {
        println!("Override posted: {}", ids.join(", "));
    }

    Ok(())
}
