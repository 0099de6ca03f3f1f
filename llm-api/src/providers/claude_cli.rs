//! Claude Code CLI provider (subprocess)

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::{LlmError, Result};
use crate::provider::{LlmProvider, LlmRequest, LlmResponse};

pub struct ClaudeCliProvider {
    model: String,
}

impl ClaudeCliProvider {
    pub fn new(model: &str) -> Self {
        Self {
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl LlmProvider for ClaudeCliProvider {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        let cli = which::which("claude").map_err(|_| {
            LlmError::Unavailable(
                "Claude CLI not found on PATH. Install from https://docs.anthropic.com/en/docs/claude-code".to_string(),
            )
        })?;

        let mut cmd = Command::new(cli);
        cmd.args(["--model", &self.model]);
        if let Some(system) = &request.system_prompt {
            cmd.args(["--system-prompt", system]);
        }
        cmd.arg("--print").arg(&request.prompt);

        let output = cmd
            .output()
            .await
            .map_err(|e| LlmError::Cli(format!("failed to execute claude: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LlmError::Cli(format!("claude exited with error: {}", stderr)));
        }

        let content = String::from_utf8(output.stdout)
            .map_err(|e| LlmError::Cli(format!("invalid UTF-8 in claude output: {}", e)))?
            .trim()
            .to_string();

        if content.is_empty() {
            return Err(LlmError::Cli("claude produced no output".to_string()));
        }

        Ok(LlmResponse {
            content,
            model: self.model.clone(),
            usage: None,
        })
    }

    fn name(&self) -> &'static str {
        "Claude CLI"
    }

    fn is_available(&self) -> Result<()> {
        which::which("claude").map(|_| ()).map_err(|_| {
            LlmError::Unavailable("Claude CLI not found on PATH".to_string())
        })
    }
}
