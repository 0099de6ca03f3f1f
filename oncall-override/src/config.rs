// oncall-override configuration

use anyhow::{Context, Result};
use chrono::FixedOffset;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

/// Environment variable holding the PagerDuty API token
pub const TOKEN_ENV: &str = "PAGERDUTY_API_TOKEN";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OncallConfig {
    /// Friendly schedule names mapped to PagerDuty schedule IDs
    #[serde(default)]
    pub schedules: HashMap<String, String>,
    /// User ID used when --user is omitted
    #[serde(default)]
    pub default_user: Option<String>,
    /// UTC offset (e.g. "+02:00") naive --start/--end times are read in;
    /// the process-local zone when unset
    #[serde(default)]
    pub time_zone: Option<String>,
}

impl OncallConfig {
    /// Config file path: ~/.config/dev-scripts/oncall.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("HOME is not set")?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("dev-scripts")
            .join("oncall.toml"))
    }

    /// Load config, returning an empty default when the file doesn't exist
    /// (schedule and user can be passed as raw IDs).
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid TOML in {}", path.display()))
    }

    /// Resolve a schedule argument: a configured name wins, anything else is
    /// treated as a raw schedule ID.
    pub fn resolve_schedule<'a>(&'a self, arg: &'a str) -> &'a str {
        self.schedules.get(arg).map(String::as_str).unwrap_or(arg)
    }

    pub fn token() -> Result<String> {
        std::env::var(TOKEN_ENV).with_context(|| format!("{} is not set", TOKEN_ENV))
    }

    /// The configured time_zone as a parsed offset, None when unset
    pub fn utc_offset(&self) -> Result<Option<FixedOffset>> {
        self.time_zone
            .as_deref()
            .map(|tz| {
                tz.parse::<FixedOffset>()
                    .with_context(|| format!("time_zone '{}' is not a UTC offset like +02:00", tz))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let config: OncallConfig = toml::from_str(
            r#"
            default_user = "PUSR123"

            [schedules]
            primary = "PSCHED1"
            secondary = "PSCHED2"
            "#,
        )
        .unwrap();
        assert_eq!(config.default_user.as_deref(), Some("PUSR123"));
        assert_eq!(config.resolve_schedule("primary"), "PSCHED1");
    }

    #[test]
    fn test_unknown_schedule_passes_through_as_id() {
        let config = OncallConfig::default();
        assert_eq!(config.resolve_schedule("PXYZ999"), "PXYZ999");
    }

    #[test]
    fn test_time_zone_offset() {
        let config: OncallConfig = toml::from_str(r#"time_zone = "+02:00""#).unwrap();
        let offset = config.utc_offset().unwrap().unwrap();
        assert_eq!(offset.local_minus_utc(), 2 * 3600);

        let config: OncallConfig = toml::from_str(r#"time_zone = "-05:30""#).unwrap();
        let offset = config.utc_offset().unwrap().unwrap();
        assert_eq!(offset.local_minus_utc(), -(5 * 3600 + 30 * 60));

        assert!(OncallConfig::default().utc_offset().unwrap().is_none());
    }

    #[test]
    fn test_time_zone_rejects_names() {
        let config: OncallConfig = toml::from_str(r#"time_zone = "Mars/Olympus""#).unwrap();
        assert!(config.utc_offset().is_err());
    }
}
