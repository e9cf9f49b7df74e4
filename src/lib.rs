//! CaniScan Triage - Diagnostic interview engine for canine skin complaints
//!
//! This crate drives a language model through a strict JSON ask/diagnose
//! contract: the model asks the owner follow-up questions until it commits
//! to a diagnosis or the turn budget runs out.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
