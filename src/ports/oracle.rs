//! Diagnostic Oracle Port - the language model that drives an interview.
//!
//! The oracle is an opaque, possibly slow, possibly noisy function from
//! complaint and transcript to raw text. Adapters stay trivial: they compose
//! the prompt and return whatever came back. All parsing and recovery
//! happens in the domain.

use async_trait::async_trait;
use thiserror::Error;

use super::AIError;

/// Port for asking the oracle for its next move.
#[async_trait]
pub trait DiagnosticOracle: Send + Sync {
    /// Sends the complaint and rendered transcript; returns the raw reply.
    ///
    /// Failures must surface as [`OracleError`], never as empty text.
    async fn invoke(&self, complaint: &str, transcript: &str) -> Result<String, OracleError>;
}

/// Transport-level oracle failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum OracleError {
    /// The oracle could not be reached or returned an error.
    #[error("oracle unavailable: {message}")]
    Unavailable {
        message: String,
        /// Whether another attempt might succeed.
        retryable: bool,
    },
}

impl OracleError {
    /// A failure worth retrying (network blip, overload).
    pub fn transient(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
            retryable: true,
        }
    }

    /// A failure that will not clear by retrying (bad credentials, unknown model).
    pub fn permanent(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
            retryable: false,
        }
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Unavailable { retryable, .. } => *retryable,
        }
    }
}

impl From<AIError> for OracleError {
    fn from(err: AIError) -> Self {
        Self::Unavailable {
            retryable: err.is_retryable(),
            message: err.to_string(),
        }
    }
}
