//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machines)
//! - `interview` - Diagnostic interview: message contract, transcript, session lifecycle

pub mod foundation;
pub mod interview;
