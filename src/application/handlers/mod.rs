//! Application handlers.
//!
//! Command handlers that drive the domain through ports.

pub mod care;
pub mod interview;

pub use care::{clean_response, CareAdvice, CareAdviceStatus, CareAdvisor};
pub use interview::{
    InterviewError, InterviewOutcome, InterviewSettings, RunInterviewCommand, RunInterviewHandler,
};
