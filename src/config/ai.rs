//! AI provider configuration

use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::ai::{DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL};

const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_OPENAI_URL: &str = "https://api.openai.com/v1";

/// AI provider configuration
#[derive(Clone, Deserialize)]
pub struct AiConfig {
    /// Which backend serves the model
    #[serde(default)]
    pub provider: AiProvider,

    /// Model name; provider default when unset
    pub model: Option<String>,

    /// Server base URL; provider default when unset
    pub base_url: Option<String>,

    /// API key (OpenAI-compatible servers only)
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Sampling temperature for interview turns
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

/// AI provider type
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AiProvider {
    #[default]
    Ollama,
    OpenAI,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Configured model or the provider's default
    pub fn model(&self) -> &str {
        match (&self.model, self.provider) {
            (Some(model), _) if !model.trim().is_empty() => model.as_str(),
            (_, AiProvider::Ollama) => DEFAULT_OLLAMA_MODEL,
            (_, AiProvider::OpenAI) => DEFAULT_OPENAI_MODEL,
        }
    }

    /// Configured base URL or the provider's default
    pub fn base_url(&self) -> &str {
        match (&self.base_url, self.provider) {
            (Some(url), _) if !url.trim().is_empty() => url.as_str(),
            (_, AiProvider::Ollama) => DEFAULT_OLLAMA_URL,
            (_, AiProvider::OpenAI) => DEFAULT_OPENAI_URL,
        }
    }

    /// Check if an API key is present
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidTemperature);
        }

        let url = self.base_url();
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl(url.to_string()));
        }

        if self.provider == AiProvider::OpenAI && !self.has_api_key() {
            return Err(ValidationError::MissingRequired("CANISCAN__AI__API_KEY"));
        }

        Ok(())
    }
}

impl fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("temperature", &self.temperature)
            .finish()
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: AiProvider::default(),
            model: None,
            base_url: None,
            api_key: None,
            timeout_secs: default_timeout(),
            temperature: default_temperature(),
        }
    }
}

fn default_timeout() -> u64 {
    120
}

fn default_temperature() -> f32 {
    0.2
}
