//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - LLM providers (Ollama, OpenAI-compatible, mock)
//! - `oracle` - Diagnostic oracles built on those providers
//! - `user_io` - Terminal, channel and scripted owner front ends

pub mod ai;
pub mod oracle;
pub mod user_io;

pub use ai::{MockAIProvider, OllamaProvider, OpenAIProvider};
pub use oracle::{LlmOracle, ScriptedOracle};
pub use user_io::{ChannelUserIo, ConsoleUserIo, InterviewFrontend, ScriptedUserIo};
