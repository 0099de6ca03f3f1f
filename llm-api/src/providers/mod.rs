//! Provider implementations and the preset -> provider dispatch

mod anthropic;
mod claude_cli;
mod openai_compat;

pub use anthropic::AnthropicProvider;
pub use claude_cli::ClaudeCliProvider;
pub use openai_compat::OpenAiCompatProvider;

use crate::config::Preset;
use crate::error::{LlmError, Result};
use crate::provider::LlmProvider;

/// Read an API key from the preset's override env var or the given default
fn api_key(preset: &Preset, provider: &str, default_env: &str) -> Result<String> {
    let env_var = preset.api_key_env.as_deref().unwrap_or(default_env);
    std::env::var(env_var).map_err(|_| LlmError::MissingApiKey {
        provider: provider.to_string(),
        env_var: env_var.to_string(),
    })
}

/// Instantiate the provider a preset names
pub fn get_provider(preset: &Preset) -> Result<Box<dyn LlmProvider>> {
    match preset.provider.as_str() {
        "anthropic" => {
            let key = api_key(preset, "Anthropic", "ANTHROPIC_API_KEY")?;
            Ok(Box::new(AnthropicProvider::new(&preset.model, key)))
        }
        "claude-cli" => Ok(Box::new(ClaudeCliProvider::new(&preset.model))),
        "openrouter" => {
            let key = api_key(preset, "OpenRouter", "OPENROUTER_API_KEY")?;
            Ok(Box::new(OpenAiCompatProvider::openrouter(&preset.model, key)))
        }
        "openai-compatible" => {
            let base_url = preset.base_url.as_deref().ok_or_else(|| {
                LlmError::Config(
                    "openai-compatible presets require a base_url".to_string(),
                )
            })?;
            // API key is optional for local endpoints
            let key = preset
                .api_key_env
                .as_deref()
                .map(|env_var| {
                    std::env::var(env_var).map_err(|_| LlmError::MissingApiKey {
                        provider: "OpenAI-compatible".to_string(),
                        env_var: env_var.to_string(),
                    })
                })
                .transpose()?;
            Ok(Box::new(OpenAiCompatProvider::new(
                &preset.model,
                base_url,
                key,
                "OpenAI-compatible",
            )))
        }
        other => Err(LlmError::Config(format!("unknown provider '{}'", other))),
    }
}
