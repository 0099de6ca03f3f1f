//! Preset configuration loaded from `~/.config/dev-scripts/llm.toml`
//!
//! Example:
//!
//! ```toml
//! [defaults]
//! commit-msg = "fast"
//! pr-summary = "anthropic"
//!
//! [presets.anthropic]
//! provider = "anthropic"
//! model = "claude-sonnet-4-5"
//!
//! [presets.fast]
//! provider = "openrouter"
//! model = "meta-llama/llama-3.3-70b-instruct"
//! fallback = "anthropic"
//! ```

use serde::Deserialize;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{LlmError, Result};

/// Preset used when no config file exists: Claude Code CLI, no API key needed
pub const BUILTIN_PRESET: &str = "claude-cli";

/// A named provider configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Preset {
    /// Provider kind: anthropic, claude-cli, openrouter, openai-compatible
    pub provider: String,
    /// Model identifier passed to the provider
    pub model: String,
    /// Override for the API key environment variable
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// Endpoint base URL (required for openai-compatible)
    #[serde(default)]
    pub base_url: Option<String>,
    /// Name of the preset to try when this one fails
    #[serde(default)]
    pub fallback: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    presets: HashMap<String, Preset>,
    /// Per-program default preset names
    #[serde(default)]
    defaults: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        let mut presets = HashMap::new();
        presets.insert(
            BUILTIN_PRESET.to_string(),
            Preset {
                provider: "claude-cli".to_string(),
                model: "sonnet".to_string(),
                api_key_env: None,
                base_url: None,
                fallback: None,
            },
        );
        Self {
            presets,
            defaults: HashMap::new(),
        }
    }
}

impl Config {
    /// Config file path: ~/.config/dev-scripts/llm.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .map_err(|_| LlmError::Config("HOME is not set".to_string()))?;
        Ok(PathBuf::from(home)
            .join(".config")
            .join("dev-scripts")
            .join("llm.toml"))
    }

    /// Load from the config file, falling back to the built-in default
    /// (Claude CLI) when the file does not exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path)
            .map_err(|e| LlmError::Config(format!("failed to read {}: {}", path.display(), e)))?;
        Self::parse(&content)
    }

    /// Parse config from a TOML string
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| LlmError::Config(format!("invalid llm.toml: {}", e)))?;
        if config.presets.is_empty() {
            return Err(LlmError::Config("llm.toml defines no presets".to_string()));
        }
        Ok(config)
    }

    /// Look up a preset by name
    pub fn get_preset(&self, name: &str) -> Result<&Preset> {
        self.presets
            .get(name)
            .ok_or_else(|| LlmError::Config(format!("unknown preset '{}'", name)))
    }

    /// The default preset name for a program, falling back to the global
    /// `default` entry and then the built-in preset.
    pub fn default_for(&self, program: &str) -> &str {
        if let Some(name) = self.defaults.get(program) {
            return name;
        }
        if let Some(name) = self.defaults.get("default") {
            return name;
        }
        BUILTIN_PRESET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_default() {
        let config = Config::default();
        let preset = config.get_preset(BUILTIN_PRESET).unwrap();
        assert_eq!(preset.provider, "claude-cli");
        assert_eq!(config.default_for("commit-msg"), BUILTIN_PRESET);
    }

    #[test]
    fn test_parse_presets_and_defaults() {
        let config = Config::parse(
            r#"
            [defaults]
            commit-msg = "fast"
            default = "anthropic"

            [presets.anthropic]
            provider = "anthropic"
            model = "claude-sonnet-4-5"

            [presets.fast]
            provider = "openrouter"
            model = "meta-llama/llama-3.3-70b-instruct"
            fallback = "anthropic"
            "#,
        )
        .unwrap();

        assert_eq!(config.default_for("commit-msg"), "fast");
        assert_eq!(config.default_for("pr-summary"), "anthropic");
        let fast = config.get_preset("fast").unwrap();
        assert_eq!(fast.fallback.as_deref(), Some("anthropic"));
    }

    #[test]
    fn test_empty_presets_rejected() {
        assert!(Config::parse("[defaults]\n").is_err());
    }

    #[test]
    fn test_unknown_preset_is_error() {
        let config = Config::default();
        assert!(config.get_preset("nope").is_err());
    }
}
