//! Error types for the llm-api crate

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LlmError>;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("{provider} API key not found (set {env_var})")]
    MissingApiKey { provider: String, env_var: String },

    #[error("API request failed{status}: {message}", status = .status_code.map(|c| format!(" ({c})")).unwrap_or_default())]
    Api {
        message: String,
        status_code: Option<u16>,
    },

    #[error("CLI provider error: {0}")]
    Cli(String),

    #[error("provider unavailable: {0}")]
    Unavailable(String),
}
