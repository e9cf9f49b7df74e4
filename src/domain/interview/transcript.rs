//! Append-only record of the questions asked and the owner's answers.
//!
//! The oracle keeps no memory between turns, so the rendered transcript is
//! resent on every call.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Who produced a transcript line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    /// The oracle, speaking through the interviewer.
    Assistant,
    /// The pet owner.
    User,
}

impl Speaker {
    /// Label used when rendering the transcript for the oracle.
    pub fn label(&self) -> &'static str {
        match self {
            Speaker::Assistant => "Assistant",
            Speaker::User => "User",
        }
    }
}

/// One line of the transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub speaker: Speaker,
    pub text: String,
    pub recorded_at: Timestamp,
}

/// Ordered question/answer history for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an assistant question followed by the owner's answer.
    ///
    /// Entries are only ever appended in pairs, so the transcript never ends
    /// on an unanswered question.
    pub fn record_exchange(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        let recorded_at = Timestamp::now();
        self.entries.push(TranscriptEntry {
            speaker: Speaker::Assistant,
            text: question.into(),
            recorded_at,
        });
        self.entries.push(TranscriptEntry {
            speaker: Speaker::User,
            text: answer.into(),
            recorded_at,
        });
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of question/answer pairs recorded.
    pub fn exchange_count(&self) -> usize {
        self.entries.len() / 2
    }

    /// Renders the transcript as `Speaker: text` lines for prompting.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|entry| format!("{}: {}", entry.speaker.label(), entry.text))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_transcript_renders_empty_string() {
        let transcript = Transcript::new();
        assert!(transcript.is_empty());
        assert_eq!(transcript.render(), "");
    }

    #[test]
    fn records_exchange_in_order() {
        let mut transcript = Transcript::new();
        transcript.record_exchange("Is the dog scratching?", "yes, constantly");

        let entries = transcript.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].speaker, Speaker::Assistant);
        assert_eq!(entries[0].text, "Is the dog scratching?");
        assert_eq!(entries[1].speaker, Speaker::User);
        assert_eq!(entries[1].text, "yes, constantly");
        assert_eq!(transcript.exchange_count(), 1);
    }

    #[test]
    fn renders_speaker_labelled_lines() {
        let mut transcript = Transcript::new();
        transcript.record_exchange("Where are the lesions?", "ears");
        transcript.record_exchange("Any odor?", "");

        assert_eq!(
            transcript.render(),
            "Assistant: Where are the lesions?\nUser: ears\nAssistant: Any odor?\nUser: "
        );
    }

    #[test]
    fn speaker_serializes_lowercase() {
        let json = serde_json::to_string(&Speaker::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }
}
