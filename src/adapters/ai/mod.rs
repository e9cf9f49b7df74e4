//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port for various LLM providers.
//!
//! ## Available Adapters
//!
//! - `OllamaProvider` - Native Ollama `/api/chat` (local models)
//! - `OpenAIProvider` - OpenAI and OpenAI-compatible servers
//! - `MockAIProvider` - Configurable mock for testing

mod mock_provider;
mod ollama_provider;
mod openai_provider;

pub use mock_provider::{MockAIProvider, MockResponse, DEFAULT_MOCK_CONTENT};
pub use ollama_provider::{OllamaConfig, OllamaProvider, DEFAULT_OLLAMA_MODEL, DEFAULT_OLLAMA_URL};
pub use openai_provider::{OpenAIConfig, OpenAIProvider};
