//! Care advice handlers.

mod care_advice;

pub use care_advice::{clean_response, CareAdvice, CareAdviceStatus, CareAdvisor};
