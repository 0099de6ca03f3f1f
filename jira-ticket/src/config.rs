// jira-ticket configuration

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Environment variable holding the Jira API token
pub const TOKEN_ENV: &str = "JIRA_API_TOKEN";

#[derive(Debug, Clone, Deserialize)]
pub struct JiraConfig {
    /// Site base URL, e.g. https://yourcompany.atlassian.net
    pub base_url: String,
    /// Account email paired with the API token
    pub email: String,
}

impl JiraConfig {
    /// Config file path: ~/.config/dev-scripts/jira.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("HOME is not set")?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("dev-scripts")
            .join("jira.toml"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            anyhow::bail!(
                "Jira is not configured. Create {} with base_url and email.",
                path.display()
            );
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: JiraConfig =
            toml::from_str(&content).with_context(|| format!("Invalid TOML in {}", path.display()))?;
        Ok(config)
    }

    /// API token from the environment
    pub fn token() -> Result<String> {
        std::env::var(TOKEN_ENV)
            .with_context(|| format!("{} is not set", TOKEN_ENV))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let config: JiraConfig = toml::from_str(
            r#"
            base_url = "https://example.atlassian.net"
            email = "dev@example.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.base_url, "https://example.atlassian.net");
        assert_eq!(config.email, "dev@example.com");
    }
}
