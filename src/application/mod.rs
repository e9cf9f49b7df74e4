//! Application layer - Commands and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;

pub use handlers::{
    // Interview
    InterviewError, InterviewOutcome, InterviewSettings, RunInterviewCommand, RunInterviewHandler,
    // Care advice
    CareAdvice, CareAdviceStatus, CareAdvisor,
};
