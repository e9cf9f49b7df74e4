//! User I/O Port - the owner's side of an interview.
//!
//! `ask` is the interview's suspension point: the engine awaits it and does
//! nothing else until an answer arrives. Modelling it as a future lets the
//! same engine run against a terminal, a socket, or a test harness.

use async_trait::async_trait;
use thiserror::Error;

/// Port for presenting questions and results to the owner.
#[async_trait]
pub trait UserIo: Send + Sync {
    /// Presents a question and waits for the owner's free-text answer.
    async fn ask(&self, question: &str) -> Result<String, UserIoError>;

    /// Shows a final message (diagnosis summary or exhaustion notice).
    async fn notify(&self, message: &str) -> Result<(), UserIoError>;
}

/// Failures on the owner's channel.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIoError {
    /// The owner's side went away (EOF, dropped channel).
    #[error("user channel closed")]
    Closed,

    /// Reading or writing failed.
    #[error("user I/O failed: {0}")]
    Io(String),
}

impl From<std::io::Error> for UserIoError {
    fn from(err: std::io::Error) -> Self {
        UserIoError::Io(err.to_string())
    }
}
