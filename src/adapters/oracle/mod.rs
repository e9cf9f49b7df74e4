//! Diagnostic oracle adapters.
//!
//! - `LlmOracle` - Triage prompts over any `AIProvider`
//! - `ScriptedOracle` - Canned replies for tests and demos

mod llm_oracle;
mod scripted;

pub use llm_oracle::{LlmOracle, DEFAULT_TRIAGE_TEMPERATURE};
pub use scripted::{OracleCall, ScriptedOracle};
