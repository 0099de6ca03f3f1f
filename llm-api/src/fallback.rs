//! Fallback provider chains
//!
//! A preset can name a `fallback` preset; chains are followed until a
//! provider answers or every link has failed.

use async_trait::async_trait;
use std::collections::HashSet;

use crate::config::Config;
use crate::error::{LlmError, Result};
use crate::provider::{LlmProvider, LlmRequest, LlmResponse};
use crate::providers::get_provider;

/// Wraps an ordered chain of providers; the first success wins.
pub struct FallbackProvider {
    chain: Vec<(String, Box<dyn LlmProvider>)>,
    debug: bool,
}

impl std::fmt::Debug for FallbackProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackProvider")
            .field(
                "chain",
                &self.chain.iter().map(|(name, _)| name).collect::<Vec<_>>(),
            )
            .field("debug", &self.debug)
            .finish()
    }
}

impl FallbackProvider {
    /// Build directly from a chain. Mostly useful for tests; normal callers
    /// go through [`provider_for_preset`].
    pub fn from_chain(chain: Vec<(String, Box<dyn LlmProvider>)>) -> Self {
        Self { chain, debug: false }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn chain_len(&self) -> usize {
        self.chain.len()
    }

    pub fn primary_name(&self) -> &str {
        self.chain
            .first()
            .map(|(name, _)| name.as_str())
            .unwrap_or("unknown")
    }
}

#[async_trait]
impl LlmProvider for FallbackProvider {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        let mut last_error = None;

        for (preset_name, provider) in &self.chain {
            match provider.complete(request.clone()).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    if self.debug {
                        eprintln!("preset '{}' failed: {}", preset_name, e);
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Unavailable("empty fallback chain".to_string())))
    }

    fn name(&self) -> &'static str {
        self.chain
            .first()
            .map(|(_, p)| p.name())
            .unwrap_or("FallbackProvider")
    }

    fn is_available(&self) -> Result<()> {
        for (_, provider) in &self.chain {
            if provider.is_available().is_ok() {
                return Ok(());
            }
        }
        Err(LlmError::Unavailable(
            "no provider in the fallback chain is available".to_string(),
        ))
    }
}

/// Build the full fallback chain for a preset name.
///
/// Follows `fallback` links with cycle detection. Presets whose API key is
/// missing are skipped with a warning rather than failing the whole chain;
/// every other construction error is fatal.
pub fn provider_for_preset(config: &Config, preset_name: &str) -> Result<FallbackProvider> {
    let mut chain = Vec::new();
    let mut seen = HashSet::new();
    let mut current = Some(preset_name.to_string());

    while let Some(name) = current.take() {
        if !seen.insert(name.clone()) {
            return Err(LlmError::Config(format!(
                "circular fallback: preset '{}' appears twice in the chain",
                name
            )));
        }

        let preset = config.get_preset(&name)?;
        match get_provider(preset) {
            Ok(provider) => chain.push((name.clone(), provider)),
            Err(LlmError::MissingApiKey { provider, env_var }) => {
                eprintln!("Warning: skipping preset '{}' - {} key not set ({})", name, provider, env_var);
            }
            Err(e) => return Err(e),
        }

        current = preset.fallback.clone();
    }

    if chain.is_empty() {
        return Err(LlmError::Config(format!(
            "no usable provider for preset '{}' (all API keys missing?)",
            preset_name
        )));
    }

    Ok(FallbackProvider::from_chain(chain))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::TokenUsage;

    /// Provider that either always succeeds or always fails
    struct StubProvider {
        content: Option<String>,
    }

    impl StubProvider {
        fn ok(content: &str) -> Box<dyn LlmProvider> {
            Box::new(Self {
                content: Some(content.to_string()),
            })
        }

        fn failing() -> Box<dyn LlmProvider> {
            Box::new(Self { content: None })
        }
    }

    #[async_trait]
    impl LlmProvider for StubProvider {
        async fn complete(&self, _request: LlmRequest) -> Result<LlmResponse> {
            match &self.content {
                Some(content) => Ok(LlmResponse {
                    content: content.clone(),
                    model: "stub".to_string(),
                    usage: Some(TokenUsage {
                        input_tokens: 1,
                        output_tokens: 1,
                    }),
                }),
                None => Err(LlmError::Api {
                    message: "stub failure".to_string(),
                    status_code: Some(500),
                }),
            }
        }

        fn name(&self) -> &'static str {
            "Stub"
        }

        fn is_available(&self) -> Result<()> {
            match self.content {
                Some(_) => Ok(()),
                None => Err(LlmError::Unavailable("stub".to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_primary_success_short_circuits() {
        let chain = FallbackProvider::from_chain(vec![
            ("a".to_string(), StubProvider::ok("first")),
            ("b".to_string(), StubProvider::ok("second")),
        ]);
        let response = chain.complete(LlmRequest::new("hi")).await.unwrap();
        assert_eq!(response.content, "first");
    }

    #[tokio::test]
    async fn test_falls_back_after_failure() {
        let chain = FallbackProvider::from_chain(vec![
            ("a".to_string(), StubProvider::failing()),
            ("b".to_string(), StubProvider::ok("rescued")),
        ]);
        let response = chain.complete(LlmRequest::new("hi")).await.unwrap();
        assert_eq!(response.content, "rescued");
    }

    #[tokio::test]
    async fn test_all_failed_returns_last_error() {
        let chain = FallbackProvider::from_chain(vec![
            ("a".to_string(), StubProvider::failing()),
            ("b".to_string(), StubProvider::failing()),
        ]);
        let err = chain.complete(LlmRequest::new("hi")).await.unwrap_err();
        assert!(matches!(err, LlmError::Api { .. }));
    }

    #[test]
    fn test_availability_checks_whole_chain() {
        let chain = FallbackProvider::from_chain(vec![
            ("a".to_string(), StubProvider::failing()),
            ("b".to_string(), StubProvider::ok("x")),
        ]);
        assert!(chain.is_available().is_ok());

        let dead = FallbackProvider::from_chain(vec![("a".to_string(), StubProvider::failing())]);
        assert!(dead.is_available().is_err());
    }

    #[test]
    fn test_missing_api_key_skips_to_fallback() {
        let config = Config::parse(
            r#"
            [presets.api]
            provider = "openrouter"
            model = "meta-llama/llama-3.3-70b-instruct"
            api_key_env = "LLM_API_KEY_THAT_IS_NEVER_SET"
            fallback = "cli"

            [presets.cli]
            provider = "claude-cli"
            model = "sonnet"
            "#,
        )
        .unwrap();

        let chain = provider_for_preset(&config, "api").unwrap();
        assert_eq!(chain.chain_len(), 1);
        assert_eq!(chain.primary_name(), "cli");
    }

    #[test]
    fn test_all_keys_missing_is_fatal() {
        let config = Config::parse(
            r#"
            [presets.api]
            provider = "openrouter"
            model = "meta-llama/llama-3.3-70b-instruct"
            api_key_env = "LLM_API_KEY_THAT_IS_NEVER_SET"
            "#,
        )
        .unwrap();

        let err = provider_for_preset(&config, "api").unwrap_err();
        assert!(err.to_string().contains("no usable provider"));
    }

    #[test]
    fn test_cycle_detection() {
        let config = Config::parse(
            r#"
            [presets.a]
            provider = "claude-cli"
            model = "sonnet"
            fallback = "b"

            [presets.b]
            provider = "claude-cli"
            model = "sonnet"
            fallback = "a"
            "#,
        )
        .unwrap();
        let err = provider_for_preset(&config, "a").unwrap_err();
        assert!(err.to_string().contains("circular fallback"));
    }
}
