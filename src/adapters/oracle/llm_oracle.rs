//! LLM-backed diagnostic oracle.
//!
//! Composes the triage prompt from the complaint and rendered transcript,
//! sends it through any [`AIProvider`], and hands back the raw reply.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::interview::prompts::{triage_turn_prompt, TRIAGE_SYSTEM_PROMPT};
use crate::ports::{AIProvider, CompletionRequest, DiagnosticOracle, MessageRole, OracleError};

/// Sampling temperature for triage turns.
pub const DEFAULT_TRIAGE_TEMPERATURE: f32 = 0.2;

/// Oracle that asks a chat model for its next move.
pub struct LlmOracle<P: AIProvider> {
    provider: P,
    system_prompt: String,
    temperature: f32,
}

impl<P: AIProvider> LlmOracle<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            system_prompt: TRIAGE_SYSTEM_PROMPT.to_string(),
            temperature: DEFAULT_TRIAGE_TEMPERATURE,
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    fn build_request(&self, complaint: &str, transcript: &str) -> CompletionRequest {
        CompletionRequest::new()
            .with_system_prompt(self.system_prompt.clone())
            .with_message(MessageRole::User, triage_turn_prompt(complaint, transcript))
            .with_temperature(self.temperature)
            .with_json_output()
    }
}

#[async_trait]
impl<P: AIProvider> DiagnosticOracle for LlmOracle<P> {
    async fn invoke(&self, complaint: &str, transcript: &str) -> Result<String, OracleError> {
        let request = self.build_request(complaint, transcript);
        let response = self.provider.complete(request).await?;

        debug!(
            model = %response.model,
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            "oracle replied"
        );

        Ok(response.content)
    }
}
