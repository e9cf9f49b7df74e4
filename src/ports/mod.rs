//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `AIProvider` - Chat-completion calls to an LLM provider
//! - `DiagnosticOracle` - Raw-text oracle turn for an interview
//! - `UserIo` - Questions to, and answers from, the pet owner

mod ai_provider;
mod oracle;
mod user_io;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, TokenUsage,
};
pub use oracle::{DiagnosticOracle, OracleError};
pub use user_io::{UserIo, UserIoError};
