//! Terminal outcome of an interview.

use serde::{Deserialize, Serialize};

use super::message::Diagnosis;

/// Advice appended to every diagnosis shown to an owner.
pub const CONSULT_VET_NOTICE: &str =
    "Please consult a veterinarian for confirmation and treatment.";

/// Notice shown when the turn budget ran out.
pub const TURN_LIMIT_NOTICE: &str =
    "Stopped due to turn limit. Consider providing more details.";

/// Exactly one of these ends every session that is not aborted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SessionResult {
    /// The oracle committed to a diagnosis.
    Diagnosed(Diagnosis),
    /// The turn budget ran out first. Not an error.
    TurnLimitExceeded { turns_used: u32 },
}

impl SessionResult {
    pub fn is_diagnosis(&self) -> bool {
        matches!(self, Self::Diagnosed(_))
    }

    pub fn diagnosis(&self) -> Option<&Diagnosis> {
        match self {
            Self::Diagnosed(d) => Some(d),
            Self::TurnLimitExceeded { .. } => None,
        }
    }

    /// Owner-facing summary text.
    pub fn summary(&self) -> String {
        match self {
            Self::Diagnosed(d) => {
                let mut lines = vec![format!(
                    "Likely diagnosis: {} (confidence {:.2})",
                    d.diagnosis, d.confidence
                )];
                if !d.rationale.is_empty() {
                    lines.push(format!("Why: {}", d.rationale));
                }
                if !d.differentials.is_empty() {
                    lines.push(format!("Differentials: {}", d.differentials.join(", ")));
                }
                lines.push(CONSULT_VET_NOTICE.to_string());
                lines.join("\n")
            }
            Self::TurnLimitExceeded { .. } => TURN_LIMIT_NOTICE.to_string(),
        }
    }
}
