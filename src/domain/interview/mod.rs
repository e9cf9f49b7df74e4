//! Diagnostic interview domain module.
//!
//! Pure logic for the turn-based triage dialogue: the oracle message
//! contract, response recovery, the turn budget, and the session aggregate.
//! No I/O lives here; the application layer drives a session through ports.

mod budget;
mod complaint;
mod extractor;
mod message;
pub mod prompts;
mod result;
mod session;
mod state;
mod transcript;

pub use budget::{TurnBudget, DEFAULT_MAX_TURNS};
pub use complaint::Complaint;
pub use extractor::extract_json_object;
pub use message::{
    interpret_response, validate_message, Diagnosis, MessageRejection, OracleMessage,
    ACTION_ASK, ACTION_DIAGNOSE, UNKNOWN_DIAGNOSIS,
};
pub use result::{SessionResult, CONSULT_VET_NOTICE, TURN_LIMIT_NOTICE};
pub use session::{InterviewSession, Step};
pub use state::InterviewState;
pub use transcript::{Speaker, Transcript, TranscriptEntry};
