//! Care advice for a finished diagnosis.
//!
//! Free-text recommendations from a chat model, shown to the owner after
//! (or outside) an interview. Provider trouble never surfaces as an error:
//! the owner always gets something to read, at worst a referral to a vet.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::domain::interview::prompts::{
    care_question_prompt, initial_care_prompt, CARE_ADVISOR_SYSTEM_PROMPT,
};
use crate::ports::{AIProvider, CompletionRequest, MessageRole};

const FENCE: &str = "```";

/// Whether the advice came from the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CareAdviceStatus {
    Success,
    /// The provider failed; the text is a canned referral.
    Fallback,
}

/// Advice text ready to show the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareAdvice {
    pub recommendation: String,
    pub status: CareAdviceStatus,
}

impl CareAdvice {
    fn success(text: String) -> Self {
        Self {
            recommendation: text,
            status: CareAdviceStatus::Success,
        }
    }

    fn fallback(text: String) -> Self {
        Self {
            recommendation: text,
            status: CareAdviceStatus::Fallback,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.status == CareAdviceStatus::Fallback
    }
}

/// Asks a chat model for care recommendations.
pub struct CareAdvisor<A: AIProvider> {
    provider: Arc<A>,
    temperature: f32,
}

impl<A: AIProvider> CareAdvisor<A> {
    pub fn new(provider: Arc<A>) -> Self {
        Self {
            provider,
            temperature: 0.7,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Short first recommendation shown right after a diagnosis.
    pub async fn initial_recommendation(&self, diagnosis: &str, confidence_pct: f64) -> CareAdvice {
        let prompt = initial_care_prompt(diagnosis, confidence_pct);
        match self.ask(prompt).await {
            Some(text) => CareAdvice::success(text),
            None => CareAdvice::fallback(format!(
                "Analysis complete: {} detected with {:.1}% confidence. \
                 Please consult a veterinarian for proper treatment.",
                diagnosis, confidence_pct
            )),
        }
    }

    /// Answers an owner question about a diagnosis.
    ///
    /// A blank question asks for general care recommendations.
    pub async fn recommend(&self, diagnosis: &str, confidence_pct: f64, question: &str) -> CareAdvice {
        let prompt = care_question_prompt(diagnosis, confidence_pct, question);
        match self.ask(prompt).await {
            Some(text) => CareAdvice::success(text),
            None => CareAdvice::fallback(format!(
                "I'm having trouble processing your request right now. \
                 Please consult a veterinarian for professional advice about {}.",
                diagnosis
            )),
        }
    }

    async fn ask(&self, prompt: String) -> Option<String> {
        let request = CompletionRequest::new()
            .with_system_prompt(CARE_ADVISOR_SYSTEM_PROMPT)
            .with_message(MessageRole::User, prompt)
            .with_temperature(self.temperature);

        match self.provider.complete(request).await {
            Ok(response) => {
                let cleaned = clean_response(&response.content);
                if cleaned.is_empty() {
                    warn!(model = %response.model, "care advice was empty after cleaning");
                    return None;
                }
                debug!(model = %response.model, chars = cleaned.len(), "care advice received");
                Some(cleaned)
            }
            Err(err) => {
                warn!(error = %err, retryable = err.is_retryable(), "care advice request failed");
                None
            }
        }
    }
}

/// Tidies model prose for display.
///
/// Drops fenced code blocks, unwraps inline code, collapses runs of blank
/// lines to one, trims, and ends the text with terminal punctuation.
pub fn clean_response(raw: &str) -> String {
    let text = strip_fenced_blocks(raw);
    let text = unwrap_inline_code(&text);
    let text = collapse_blank_lines(&text);
    let mut text = text.trim().to_string();

    if !text.is_empty() && !text.ends_with(&['.', '!', '?'][..]) {
        text.push('.');
    }
    text
}

fn strip_fenced_blocks(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find(FENCE) {
        let after_open = &rest[open + FENCE.len()..];
        match after_open.find(FENCE) {
            Some(close) => {
                out.push_str(&rest[..open]);
                rest = &after_open[close + FENCE.len()..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}

fn unwrap_inline_code(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('`') {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 1..];
        match after_open.find('`') {
            Some(0) => {
                // Empty pair: keep the first backtick, rescan from the second.
                out.push('`');
                rest = after_open;
            }
            Some(close) => {
                out.push_str(&after_open[..close]);
                rest = &after_open[close + 1..];
            }
            None => {
                out.push('`');
                rest = after_open;
            }
        }
    }
    out.push_str(rest);
    out
}

fn collapse_blank_lines(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut previous_blank = false;

    for line in text.split('\n') {
        let blank = line.trim().is_empty();
        if blank {
            if !previous_blank {
                lines.push("");
            }
        } else {
            lines.push(line);
        }
        previous_blank = blank;
    }
    lines.join("\n")
}
