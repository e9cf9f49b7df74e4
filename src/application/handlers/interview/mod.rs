//! Interview handlers.

mod run_interview;

pub use run_interview::{
    InterviewError, InterviewOutcome, InterviewSettings, RunInterviewCommand, RunInterviewHandler,
};
