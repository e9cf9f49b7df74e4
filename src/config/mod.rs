//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CANISCAN` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use caniscan_triage::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Using model {}", config.ai.model());
//! ```

mod ai;
mod error;
mod interview;

pub use ai::{AiConfig, AiProvider};
pub use error::{ConfigError, ValidationError};
pub use interview::InterviewConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a working
/// setup against a local Ollama server.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// AI provider configuration (Ollama/OpenAI)
    #[serde(default)]
    pub ai: AiConfig,

    /// Interview loop configuration
    #[serde(default)]
    pub interview: InterviewConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CANISCAN` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CANISCAN__AI__MODEL=llama3.2` -> `ai.model = "llama3.2"`
    /// - `CANISCAN__INTERVIEW__MAX_TURNS=10` -> `interview.max_turns = 10`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CANISCAN")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.ai.validate()?;
        self.interview.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "CANISCAN__AI__PROVIDER",
        "CANISCAN__AI__MODEL",
        "CANISCAN__AI__API_KEY",
        "CANISCAN__INTERVIEW__MAX_TURNS",
        "CANISCAN__INTERVIEW__TRANSPORT_FAILURES_CONSUME_TURNS",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_defaults_from_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();

        let config = AppConfig::load().unwrap();

        assert_eq!(config.ai.provider, AiProvider::Ollama);
        assert_eq!(config.interview.max_turns, 30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("CANISCAN__AI__MODEL", "mistral");
        env::set_var("CANISCAN__INTERVIEW__MAX_TURNS", "12");
        env::set_var("CANISCAN__INTERVIEW__TRANSPORT_FAILURES_CONSUME_TURNS", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.ai.model(), "mistral");
        assert_eq!(config.interview.max_turns, 12);
        assert!(config.interview.transport_failures_consume_turns);
    }

    #[test]
    fn test_validate_openai_without_key() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("CANISCAN__AI__PROVIDER", "openai");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.ai.provider, AiProvider::OpenAI);
        assert!(config.validate().is_err());
    }
}
