//! Provider trait and the request/response types shared by all backends

use async_trait::async_trait;

use crate::error::Result;

/// A completion request, provider-agnostic
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub prompt: String,
    pub system_prompt: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl LlmRequest {
    /// Build a request with just a prompt
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_prompt: None,
            max_tokens: None,
            temperature: None,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }
}

/// Token accounting, when the backend reports it
#[derive(Debug, Clone, Copy)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A completion response
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub model: String,
    pub usage: Option<TokenUsage>,
}

/// Interface every backend implements
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Send a completion request and wait for the full response
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse>;

    /// Human-readable provider name for diagnostics
    fn name(&self) -> &'static str;

    /// Cheap availability check (CLI on PATH, key present, ...)
    fn is_available(&self) -> Result<()>;
}
