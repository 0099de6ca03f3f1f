//! Shared LLM provider library for the dev-scripts workspace
//!
//! Gives each tool a uniform way to send a prompt to a language model
//! without caring which backend answers it. Backends are selected through
//! named presets in `~/.config/dev-scripts/llm.toml`; presets can chain
//! into fallbacks that are tried in order when a provider fails.
//!
//! Supported providers:
//! - `anthropic` - direct Anthropic Messages API
//! - `claude-cli` - Claude Code CLI as a subprocess
//! - `openrouter` - OpenRouter's OpenAI-compatible endpoint
//! - `openai-compatible` - any OpenAI-compatible endpoint (needs `base_url`)

mod config;
mod error;
mod fallback;
mod provider;
mod providers;

pub use config::{Config, Preset};
pub use error::{LlmError, Result};
pub use fallback::{FallbackProvider, provider_for_preset};
pub use provider::{LlmProvider, LlmRequest, LlmResponse, TokenUsage};
pub use providers::get_provider;
