//! Oracle message contract and its validator.
//!
//! Each oracle turn must carry exactly one JSON object of one of two shapes:
//!
//! ```text
//! {"action":"ask","question":"<string>"}
//! {"action":"diagnose","diagnosis":"<string>","confidence":<0..1>,"rationale":"<string>","differentials":["<string>", ...]}
//! ```
//!
//! Only `action` selects the branch. Extra fields are ignored.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use super::extractor::extract_json_object;

/// Action tag for a follow-up question.
pub const ACTION_ASK: &str = "ask";

/// Action tag for the terminal diagnosis.
pub const ACTION_DIAGNOSE: &str = "diagnose";

/// Diagnosis reported when the oracle omits one.
pub const UNKNOWN_DIAGNOSIS: &str = "Unknown";

/// A validated oracle message.
#[derive(Debug, Clone, PartialEq)]
pub enum OracleMessage {
    /// Ask the owner a follow-up question. `question` is never blank.
    Ask { question: String },
    /// Terminal diagnosis.
    Diagnose(Diagnosis),
}

/// Final diagnosis produced by the oracle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnosis {
    pub diagnosis: String,
    /// Always within `[0.0, 1.0]`.
    pub confidence: f64,
    pub rationale: String,
    pub differentials: Vec<String>,
}

impl Diagnosis {
    /// Builds a diagnosis from a decoded `diagnose` object.
    ///
    /// Missing or ill-typed fields fall back to defaults instead of failing:
    /// the diagnosis ends the session and must not be lost to a bad
    /// `confidence` value.
    fn from_fields(fields: &Map<String, Value>) -> Self {
        let diagnosis = fields
            .get("diagnosis")
            .and_then(Value::as_str)
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(UNKNOWN_DIAGNOSIS)
            .to_string();

        let confidence = fields
            .get("confidence")
            .and_then(Value::as_f64)
            .map(|c| c.clamp(0.0, 1.0))
            .unwrap_or(0.0);

        let rationale = fields
            .get("rationale")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let differentials = fields
            .get("differentials")
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            diagnosis,
            confidence,
            rationale,
            differentials,
        }
    }
}

/// Recoverable reasons an oracle response was discarded.
///
/// None of these end a session; the engine spends a turn and asks again.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MessageRejection {
    #[error("no JSON object found in oracle response")]
    NoCandidate,

    #[error("oracle response is not a JSON object: {0}")]
    ParseFailed(String),

    #[error("oracle asked an empty question")]
    EmptyQuestion,

    #[error("unrecognized action: {}", .0.as_deref().unwrap_or("<missing>"))]
    UnrecognizedAction(Option<String>),
}

impl MessageRejection {
    /// True when the response could not be decoded at all.
    pub fn is_parse_failure(&self) -> bool {
        matches!(self, Self::NoCandidate | Self::ParseFailed(_))
    }

    /// Short machine label for structured logging.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NoCandidate => "no_candidate",
            Self::ParseFailed(_) => "parse_failed",
            Self::EmptyQuestion => "empty_question",
            Self::UnrecognizedAction(_) => "unrecognized_action",
        }
    }
}

/// Strictly parses a candidate object and classifies it.
pub fn validate_message(candidate: &str) -> Result<OracleMessage, MessageRejection> {
    let value: Value = serde_json::from_str(candidate)
        .map_err(|e| MessageRejection::ParseFailed(e.to_string()))?;

    let Value::Object(fields) = value else {
        return Err(MessageRejection::ParseFailed(
            "expected a JSON object".to_string(),
        ));
    };

    match fields.get("action").and_then(Value::as_str) {
        Some(ACTION_ASK) => {
            let question = fields
                .get("question")
                .and_then(Value::as_str)
                .map(str::trim)
                .unwrap_or_default();
            if question.is_empty() {
                Err(MessageRejection::EmptyQuestion)
            } else {
                Ok(OracleMessage::Ask {
                    question: question.to_string(),
                })
            }
        }
        Some(ACTION_DIAGNOSE) => Ok(OracleMessage::Diagnose(Diagnosis::from_fields(&fields))),
        other => Err(MessageRejection::UnrecognizedAction(other.map(str::to_string))),
    }
}

/// Extracts and validates a raw oracle response in one step.
pub fn interpret_response(raw: &str) -> Result<OracleMessage, MessageRejection> {
    let candidate = extract_json_object(raw).ok_or(MessageRejection::NoCandidate)?;
    validate_message(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    mod ask {
        use super::*;

        #[test]
        fn accepts_question() {
            let msg = validate_message(r#"{"action":"ask","question":"Is it itchy?"}"#);
            assert_eq!(
                msg,
                Ok(OracleMessage::Ask {
                    question: "Is it itchy?".to_string()
                })
            );
        }

        #[test]
        fn trims_question() {
            let msg = validate_message(r#"{"action":"ask","question":"  Any odor?\n"}"#);
            assert_eq!(
                msg,
                Ok(OracleMessage::Ask {
                    question: "Any odor?".to_string()
                })
            );
        }

        #[test]
        fn rejects_whitespace_question() {
            let msg = validate_message(r#"{"action":"ask","question":"   "}"#);
            assert_eq!(msg, Err(MessageRejection::EmptyQuestion));
        }

        #[test]
        fn rejects_missing_question() {
            let msg = validate_message(r#"{"action":"ask"}"#);
            assert_eq!(msg, Err(MessageRejection::EmptyQuestion));
        }

        #[test]
        fn rejects_non_string_question() {
            let msg = validate_message(r#"{"action":"ask","question":42}"#);
            assert_eq!(msg, Err(MessageRejection::EmptyQuestion));
        }
    }

    mod diagnose {
        use super::*;

        #[test]
        fn defaults_every_missing_field() {
            let msg = validate_message(r#"{"action":"diagnose"}"#).unwrap();
            assert_eq!(
                msg,
                OracleMessage::Diagnose(Diagnosis {
                    diagnosis: "Unknown".to_string(),
                    confidence: 0.0,
                    rationale: String::new(),
                    differentials: vec![],
                })
            );
        }

        #[test]
        fn keeps_supplied_fields() {
            let msg = validate_message(
                r#"{"action":"diagnose","diagnosis":"Flea allergy dermatitis","confidence":0.82,"rationale":"Tail-base pruritus","differentials":["Atopy","Sarcoptic mange"]}"#,
            )
            .unwrap();
            let OracleMessage::Diagnose(d) = msg else {
                panic!("expected diagnosis");
            };
            assert_eq!(d.diagnosis, "Flea allergy dermatitis");
            assert_eq!(d.confidence, 0.82);
            assert_eq!(d.rationale, "Tail-base pruritus");
            assert_eq!(d.differentials, vec!["Atopy", "Sarcoptic mange"]);
        }

        #[test]
        fn malformed_confidence_falls_back_to_zero() {
            let msg = validate_message(
                r#"{"action":"diagnose","diagnosis":"Ringworm","confidence":"high"}"#,
            )
            .unwrap();
            let OracleMessage::Diagnose(d) = msg else {
                panic!("expected diagnosis");
            };
            assert_eq!(d.diagnosis, "Ringworm");
            assert_eq!(d.confidence, 0.0);
        }

        #[test]
        fn out_of_range_confidence_is_clamped() {
            let high = validate_message(r#"{"action":"diagnose","confidence":85}"#).unwrap();
            let low = validate_message(r#"{"action":"diagnose","confidence":-0.3}"#).unwrap();
            assert!(matches!(high, OracleMessage::Diagnose(ref d) if d.confidence == 1.0));
            assert!(matches!(low, OracleMessage::Diagnose(ref d) if d.confidence == 0.0));
        }

        #[test]
        fn integer_confidence_is_accepted() {
            let msg = validate_message(r#"{"action":"diagnose","confidence":1}"#).unwrap();
            assert!(matches!(msg, OracleMessage::Diagnose(ref d) if d.confidence == 1.0));
        }

        #[test]
        fn blank_diagnosis_becomes_unknown() {
            let msg = validate_message(r#"{"action":"diagnose","diagnosis":"  "}"#).unwrap();
            assert!(matches!(msg, OracleMessage::Diagnose(ref d) if d.diagnosis == "Unknown"));
        }

        #[test]
        fn null_differentials_become_empty() {
            let msg =
                validate_message(r#"{"action":"diagnose","differentials":null}"#).unwrap();
            assert!(matches!(msg, OracleMessage::Diagnose(ref d) if d.differentials.is_empty()));
        }

        #[test]
        fn non_string_differentials_are_skipped() {
            let msg = validate_message(
                r#"{"action":"diagnose","differentials":["Pyoderma",7,null,"Demodicosis"]}"#,
            )
            .unwrap();
            assert!(matches!(
                msg,
                OracleMessage::Diagnose(ref d) if d.differentials == vec!["Pyoderma", "Demodicosis"]
            ));
        }
    }

    mod rejections {
        use super::*;

        #[test]
        fn unparseable_candidate_is_parse_failure() {
            let err = validate_message(r#"{"action":"ask",}"#).unwrap_err();
            assert!(matches!(err, MessageRejection::ParseFailed(_)));
            assert!(err.is_parse_failure());
        }

        #[test]
        fn missing_action_is_unrecognized() {
            let err = validate_message(r#"{"question":"Q?"}"#).unwrap_err();
            assert_eq!(err, MessageRejection::UnrecognizedAction(None));
            assert!(!err.is_parse_failure());
        }

        #[test]
        fn unknown_action_is_unrecognized() {
            let err = validate_message(r#"{"action":"treat","question":"Q?"}"#).unwrap_err();
            assert_eq!(
                err,
                MessageRejection::UnrecognizedAction(Some("treat".to_string()))
            );
        }

        #[test]
        fn action_alone_decides_mixed_payload() {
            let msg = validate_message(
                r#"{"action":"ask","question":"Any hair loss?","diagnosis":"Mange","confidence":0.9}"#,
            )
            .unwrap();
            assert!(matches!(msg, OracleMessage::Ask { .. }));

            let err = validate_message(r#"{"question":"Q?","diagnosis":"Mange"}"#).unwrap_err();
            assert!(matches!(err, MessageRejection::UnrecognizedAction(None)));
        }

        #[test]
        fn rejection_reasons_are_stable() {
            assert_eq!(MessageRejection::NoCandidate.reason(), "no_candidate");
            assert_eq!(MessageRejection::EmptyQuestion.reason(), "empty_question");
            assert_eq!(
                MessageRejection::UnrecognizedAction(None).to_string(),
                "unrecognized action: <missing>"
            );
        }
    }

    mod interpret {
        use super::*;

        #[test]
        fn reads_fenced_question() {
            let raw = "```json\n{\"action\":\"ask\",\"question\":\"Q?\"}\n```";
            assert_eq!(
                interpret_response(raw),
                Ok(OracleMessage::Ask {
                    question: "Q?".to_string()
                })
            );
        }

        #[test]
        fn reads_object_wrapped_in_prose() {
            let raw = "Based on the answers so far: {\"action\":\"diagnose\",\"diagnosis\":\"Hot spot\"} Hope this helps!";
            let msg = interpret_response(raw).unwrap();
            assert!(matches!(msg, OracleMessage::Diagnose(ref d) if d.diagnosis == "Hot spot"));
        }

        #[test]
        fn prose_only_is_no_candidate() {
            assert_eq!(
                interpret_response("Could you tell me more about the rash?"),
                Err(MessageRejection::NoCandidate)
            );
        }
    }
}
