//! Interview loop configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::interview::DEFAULT_MAX_TURNS;

/// Interview loop configuration
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct InterviewConfig {
    /// Turn budget per session
    #[serde(default = "default_max_turns")]
    pub max_turns: u32,

    /// Consecutive oracle transport failures tolerated
    #[serde(default = "default_retry_limit")]
    pub oracle_retry_limit: u32,

    /// Pause between transport retries, in milliseconds
    #[serde(default = "default_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Charge transport failures against the turn budget
    #[serde(default)]
    pub transport_failures_consume_turns: bool,

    /// Abort if the owner does not answer within this many seconds
    pub answer_timeout_secs: Option<u64>,
}

impl InterviewConfig {
    /// Validate interview configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_turns == 0 {
            return Err(ValidationError::InvalidMaxTurns);
        }
        if self.answer_timeout_secs == Some(0) {
            return Err(ValidationError::InvalidAnswerTimeout);
        }
        Ok(())
    }
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            max_turns: default_max_turns(),
            oracle_retry_limit: default_retry_limit(),
            retry_backoff_ms: default_backoff_ms(),
            transport_failures_consume_turns: false,
            answer_timeout_secs: None,
        }
    }
}

fn default_max_turns() -> u32 {
    DEFAULT_MAX_TURNS
}

fn default_retry_limit() -> u32 {
    2
}

fn default_backoff_ms() -> u64 {
    500
}
