//! RunInterview command handler.
//!
//! Drives one [`InterviewSession`] to completion: calls the oracle,
//! interprets each reply, relays questions to the owner and records the
//! answers, until a diagnosis arrives or the turn budget runs out.
//!
//! Malformed oracle replies are retried silently; they spend a turn and
//! are only visible in the logs. Oracle transport failures get their own
//! consecutive-failure cap so a dead server cannot burn the whole budget
//! (or, with budget charging disabled, loop forever).

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::InterviewConfig;
use crate::domain::foundation::{SessionId, ValidationError};
use crate::domain::interview::{
    interpret_response, Complaint, InterviewSession, OracleMessage, SessionResult, Step,
    Transcript, TurnBudget, DEFAULT_MAX_TURNS,
};
use crate::ports::{DiagnosticOracle, OracleError, UserIo, UserIoError};

/// Tunables for one interview run.
#[derive(Debug, Clone, PartialEq)]
pub struct InterviewSettings {
    /// Turn budget; every interpreted oracle reply spends one.
    pub max_turns: u32,
    /// Consecutive retryable transport failures tolerated before aborting.
    pub oracle_retry_limit: u32,
    /// Charge transport failures against the turn budget too.
    pub transport_failures_consume_turns: bool,
    /// Pause before retrying after a transport failure.
    pub retry_backoff: Duration,
    /// Abort if the owner takes longer than this to answer.
    pub answer_timeout: Option<Duration>,
}

impl Default for InterviewSettings {
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
            oracle_retry_limit: 2,
            transport_failures_consume_turns: false,
            retry_backoff: Duration::from_millis(500),
            answer_timeout: None,
        }
    }
}

impl From<&InterviewConfig> for InterviewSettings {
    fn from(config: &InterviewConfig) -> Self {
        Self {
            max_turns: config.max_turns,
            oracle_retry_limit: config.oracle_retry_limit,
            transport_failures_consume_turns: config.transport_failures_consume_turns,
            retry_backoff: Duration::from_millis(config.retry_backoff_ms),
            answer_timeout: config.answer_timeout_secs.map(Duration::from_secs),
        }
    }
}

/// Command to run a diagnostic interview.
#[derive(Debug, Clone)]
pub struct RunInterviewCommand {
    /// The owner's initial free-text complaint.
    pub complaint: String,
}

impl RunInterviewCommand {
    pub fn new(complaint: impl Into<String>) -> Self {
        Self {
            complaint: complaint.into(),
        }
    }
}

/// A finished interview.
#[derive(Debug, Clone)]
pub struct InterviewOutcome {
    pub session_id: SessionId,
    pub result: SessionResult,
    pub transcript: Transcript,
    /// Whether the owner was shown the result summary.
    pub notified: bool,
}

/// Errors that end an interview without a result.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InterviewError {
    /// The complaint or settings were rejected before the session began.
    #[error("invalid input: {0}")]
    InvalidInput(ValidationError),

    /// The oracle kept failing (or failed permanently).
    #[error("oracle unavailable after {attempts} attempt(s): {message}")]
    OracleUnavailable { attempts: u32, message: String },

    /// The owner did not answer in time.
    #[error("no answer within {timeout:?}")]
    AnswerTimedOut { timeout: Duration },

    /// The owner's channel failed or closed.
    #[error(transparent)]
    UserIo(#[from] UserIoError),

    /// A session operation was attempted in the wrong state.
    #[error("interview state error: {0}")]
    InvalidState(#[from] ValidationError),
}

/// Handler that runs interviews against an oracle and an owner.
pub struct RunInterviewHandler<O, U>
where
    O: DiagnosticOracle,
    U: UserIo,
{
    oracle: Arc<O>,
    user_io: Arc<U>,
    settings: InterviewSettings,
}

impl<O, U> RunInterviewHandler<O, U>
where
    O: DiagnosticOracle,
    U: UserIo,
{
    pub fn new(oracle: Arc<O>, user_io: Arc<U>, settings: InterviewSettings) -> Self {
        Self {
            oracle,
            user_io,
            settings,
        }
    }

    pub fn settings(&self) -> &InterviewSettings {
        &self.settings
    }

    /// Runs the interview to a result.
    ///
    /// The owner is sent the result summary before this returns; a failed
    /// delivery is logged and reported through `notified`, never as an
    /// error. Errors leave the session aborted and nothing is shown.
    pub async fn handle(&self, cmd: RunInterviewCommand) -> Result<InterviewOutcome, InterviewError> {
        let complaint = Complaint::new(cmd.complaint).map_err(InterviewError::InvalidInput)?;
        let budget = TurnBudget::new(self.settings.max_turns).map_err(InterviewError::InvalidInput)?;

        let mut session = InterviewSession::new(complaint, budget);
        let session_id = session.id();
        info!(%session_id, max_turns = budget.bound(), "interview started");

        let result = match self.drive(&mut session).await {
            Ok(result) => result,
            Err(err) => {
                if let Err(abort_err) = session.abort() {
                    debug!(%session_id, error = %abort_err, "session already finished");
                }
                warn!(%session_id, error = %err, "interview aborted");
                return Err(err);
            }
        };

        info!(
            %session_id,
            turns_used = session.budget().used(),
            diagnosed = result.is_diagnosis(),
            elapsed_ms = session.started_at().elapsed().as_millis() as u64,
            "interview finished"
        );

        let notified = match self.user_io.notify(&result.summary()).await {
            Ok(()) => true,
            Err(err) => {
                warn!(%session_id, error = %err, "could not deliver result summary");
                false
            }
        };

        Ok(InterviewOutcome {
            session_id,
            result,
            transcript: session.transcript().clone(),
            notified,
        })
    }

    async fn drive(&self, session: &mut InterviewSession) -> Result<SessionResult, InterviewError> {
        let session_id = session.id();
        let mut consecutive_failures: u32 = 0;

        loop {
            let turn = session.begin_oracle_call()?;
            let transcript = session.transcript().render();

            let reply = self
                .oracle
                .invoke(session.complaint().as_str(), &transcript)
                .await;

            let step = match reply {
                Ok(raw) => {
                    consecutive_failures = 0;
                    match interpret_response(&raw) {
                        Ok(OracleMessage::Ask { question }) => {
                            debug!(%session_id, turn, "oracle asked a question");
                            session.receive_question(question.clone())?;
                            let answer = self.ask_owner(&question).await?;
                            session.record_answer(&answer)?
                        }
                        Ok(OracleMessage::Diagnose(diagnosis)) => {
                            debug!(%session_id, turn, diagnosis = %diagnosis.diagnosis, "oracle diagnosed");
                            session.conclude(diagnosis)?
                        }
                        Err(rejection) => {
                            warn!(
                                %session_id,
                                turn,
                                reason = rejection.reason(),
                                detail = %rejection,
                                "discarding oracle reply"
                            );
                            session.reject_response(&rejection)?
                        }
                    }
                }
                Err(err) => {
                    consecutive_failures += 1;
                    self.check_transport_failure(session_id, turn, consecutive_failures, &err)?;

                    let step = session
                        .record_transport_failure(self.settings.transport_failures_consume_turns)?;
                    if step == Step::Continue && !self.settings.retry_backoff.is_zero() {
                        tokio::time::sleep(self.settings.retry_backoff).await;
                    }
                    step
                }
            };

            if let Step::Done(result) = step {
                return Ok(result);
            }
        }
    }

    /// Decides whether a transport failure may be retried.
    fn check_transport_failure(
        &self,
        session_id: SessionId,
        turn: u32,
        consecutive_failures: u32,
        err: &OracleError,
    ) -> Result<(), InterviewError> {
        let exhausted = consecutive_failures > self.settings.oracle_retry_limit;
        if !err.is_retryable() || exhausted {
            return Err(InterviewError::OracleUnavailable {
                attempts: consecutive_failures,
                message: err.to_string(),
            });
        }

        warn!(
            %session_id,
            turn,
            attempt = consecutive_failures,
            error = %err,
            "oracle call failed, retrying"
        );
        Ok(())
    }

    async fn ask_owner(&self, question: &str) -> Result<String, InterviewError> {
        match self.settings.answer_timeout {
            Some(limit) => tokio::time::timeout(limit, self.user_io.ask(question))
                .await
                .map_err(|_| InterviewError::AnswerTimedOut { timeout: limit })?
                .map_err(InterviewError::from),
            None => Ok(self.user_io.ask(question).await?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::oracle::ScriptedOracle;
    use crate::adapters::user_io::ScriptedUserIo;
    use crate::domain::interview::{Diagnosis, TURN_LIMIT_NOTICE};
    use async_trait::async_trait;

    const ASK: &str = r#"{"action":"ask","question":"How long has it been itchy?"}"#;
    const DIAGNOSE: &str = r#"{"action":"diagnose","diagnosis":"Flea allergy dermatitis","confidence":0.8,"rationale":"Itching near tail base","differentials":["Atopy"]}"#;

    fn settings(max_turns: u32) -> InterviewSettings {
        InterviewSettings {
            max_turns,
            retry_backoff: Duration::ZERO,
            ..InterviewSettings::default()
        }
    }

    fn handler(
        oracle: ScriptedOracle,
        user: ScriptedUserIo,
        settings: InterviewSettings,
    ) -> RunInterviewHandler<ScriptedOracle, ScriptedUserIo> {
        RunInterviewHandler::new(Arc::new(oracle), Arc::new(user), settings)
    }

    #[test]
    fn default_settings_match_documented_values() {
        let s = InterviewSettings::default();
        assert_eq!(s.max_turns, 30);
        assert_eq!(s.oracle_retry_limit, 2);
        assert!(!s.transport_failures_consume_turns);
        assert_eq!(s.retry_backoff, Duration::from_millis(500));
        assert_eq!(s.answer_timeout, None);
    }

    #[test]
    fn config_defaults_convert_to_handler_defaults() {
        assert_eq!(
            InterviewSettings::from(&InterviewConfig::default()),
            InterviewSettings::default()
        );
    }

    #[test]
    fn config_conversion_applies_units() {
        let config = InterviewConfig {
            max_turns: 5,
            retry_backoff_ms: 50,
            answer_timeout_secs: Some(90),
            transport_failures_consume_turns: true,
            ..Default::default()
        };

        let settings = InterviewSettings::from(&config);

        assert_eq!(settings.max_turns, 5);
        assert_eq!(settings.retry_backoff, Duration::from_millis(50));
        assert_eq!(settings.answer_timeout, Some(Duration::from_secs(90)));
        assert!(settings.transport_failures_consume_turns);
    }

    #[tokio::test]
    async fn ask_then_diagnose_records_one_exchange() {
        let oracle = ScriptedOracle::new().with_reply(ASK).with_reply(DIAGNOSE);
        let user = ScriptedUserIo::new().with_answer("  two weeks  ");
        let handler = handler(oracle.clone(), user.clone(), settings(30));

        let outcome = handler
            .handle(RunInterviewCommand::new("scratching a lot"))
            .await
            .unwrap();

        assert_eq!(outcome.transcript.exchange_count(), 1);
        assert_eq!(
            outcome.transcript.render(),
            "Assistant: How long has it been itchy?\nUser: two weeks"
        );
        assert_eq!(
            outcome.result.diagnosis(),
            Some(&Diagnosis {
                diagnosis: "Flea allergy dermatitis".to_string(),
                confidence: 0.8,
                rationale: "Itching near tail base".to_string(),
                differentials: vec!["Atopy".to_string()],
            })
        );
        assert_eq!(user.questions(), vec!["How long has it been itchy?"]);
        assert_eq!(user.notices(), vec![outcome.result.summary()]);
        assert!(outcome.notified);

        let calls = oracle.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].transcript, "");
        assert_eq!(calls[1].transcript, outcome.transcript.render());
    }

    #[tokio::test]
    async fn immediate_diagnosis_never_asks_the_owner() {
        let oracle = ScriptedOracle::new().with_reply(DIAGNOSE);
        let user = ScriptedUserIo::new();
        let handler = handler(oracle, user.clone(), settings(30));

        let outcome = handler.handle(RunInterviewCommand::new("itchy")).await.unwrap();

        assert!(outcome.result.is_diagnosis());
        assert!(outcome.transcript.is_empty());
        assert!(user.questions().is_empty());
    }

    #[tokio::test]
    async fn malformed_replies_are_retried_silently() {
        let oracle = ScriptedOracle::new()
            .with_reply("I think it might be allergies.")
            .with_reply(r#"{"action":"ask","question":"   "}"#)
            .with_reply(r#"{"action":"wander"}"#)
            .with_reply(DIAGNOSE);
        let user = ScriptedUserIo::new();
        let handler = handler(oracle.clone(), user.clone(), settings(30));

        let outcome = handler.handle(RunInterviewCommand::new("itchy")).await.unwrap();

        assert!(outcome.result.is_diagnosis());
        assert_eq!(oracle.call_count(), 4);
        assert!(user.questions().is_empty());
        assert_eq!(user.notices().len(), 1);
    }

    #[tokio::test]
    async fn always_asking_oracle_stops_at_bound() {
        let oracle = ScriptedOracle::always(ASK);
        let user = ScriptedUserIo::new().with_fallback("not sure");
        let handler = handler(oracle.clone(), user.clone(), settings(3));

        let outcome = handler.handle(RunInterviewCommand::new("itchy")).await.unwrap();

        assert_eq!(outcome.result, SessionResult::TurnLimitExceeded { turns_used: 3 });
        assert_eq!(oracle.call_count(), 3);
        assert_eq!(outcome.transcript.exchange_count(), 3);
        assert_eq!(user.notices(), vec![TURN_LIMIT_NOTICE]);
    }

    #[tokio::test]
    async fn always_malformed_oracle_stops_at_bound() {
        let oracle = ScriptedOracle::always("no json here");
        let handler = handler(oracle.clone(), ScriptedUserIo::new(), settings(4));

        let outcome = handler.handle(RunInterviewCommand::new("itchy")).await.unwrap();

        assert_eq!(outcome.result, SessionResult::TurnLimitExceeded { turns_used: 4 });
        assert_eq!(oracle.call_count(), 4);
    }

    #[tokio::test]
    async fn transient_failures_within_cap_are_free() {
        let oracle = ScriptedOracle::new()
            .with_failure(OracleError::transient("reset"))
            .with_failure(OracleError::transient("reset"))
            .with_reply(DIAGNOSE);
        let handler = handler(oracle.clone(), ScriptedUserIo::new(), settings(1));

        let outcome = handler.handle(RunInterviewCommand::new("itchy")).await.unwrap();

        assert!(outcome.result.is_diagnosis());
        assert_eq!(oracle.call_count(), 3);
    }

    #[tokio::test]
    async fn too_many_consecutive_failures_abort() {
        let oracle = ScriptedOracle::new().with_fallback_failure(OracleError::transient("down"));
        let user = ScriptedUserIo::new();
        let handler = handler(oracle.clone(), user.clone(), settings(30));

        let err = handler.handle(RunInterviewCommand::new("itchy")).await.unwrap_err();

        assert!(matches!(err, InterviewError::OracleUnavailable { attempts: 3, .. }));
        assert_eq!(oracle.call_count(), 3);
        assert!(user.notices().is_empty());
    }

    #[tokio::test]
    async fn permanent_failure_aborts_immediately() {
        let oracle = ScriptedOracle::new()
            .with_failure(OracleError::permanent("model not found"))
            .with_reply(DIAGNOSE);
        let handler = handler(oracle.clone(), ScriptedUserIo::new(), settings(30));

        let err = handler.handle(RunInterviewCommand::new("itchy")).await.unwrap_err();

        assert!(matches!(err, InterviewError::OracleUnavailable { attempts: 1, .. }));
        assert_eq!(oracle.call_count(), 1);
    }

    #[tokio::test]
    async fn charged_transport_failures_can_exhaust_budget() {
        let oracle = ScriptedOracle::new()
            .with_failure(OracleError::transient("reset"))
            .with_failure(OracleError::transient("reset"))
            .with_reply(DIAGNOSE);
        let settings = InterviewSettings {
            transport_failures_consume_turns: true,
            ..settings(2)
        };
        let handler = handler(oracle.clone(), ScriptedUserIo::new(), settings);

        let outcome = handler.handle(RunInterviewCommand::new("itchy")).await.unwrap();

        assert_eq!(outcome.result, SessionResult::TurnLimitExceeded { turns_used: 2 });
        assert_eq!(oracle.call_count(), 2);
    }

    #[tokio::test]
    async fn success_resets_failure_streak() {
        let oracle = ScriptedOracle::new()
            .with_failure(OracleError::transient("a"))
            .with_failure(OracleError::transient("b"))
            .with_reply(ASK)
            .with_failure(OracleError::transient("c"))
            .with_failure(OracleError::transient("d"))
            .with_reply(DIAGNOSE);
        let user = ScriptedUserIo::new().with_answer("a week");
        let handler = handler(oracle.clone(), user, settings(30));

        let outcome = handler.handle(RunInterviewCommand::new("itchy")).await.unwrap();

        assert!(outcome.result.is_diagnosis());
        assert_eq!(oracle.call_count(), 6);
    }

    #[tokio::test]
    async fn closed_user_channel_aborts() {
        let oracle = ScriptedOracle::new().with_reply(ASK);
        let handler = handler(oracle, ScriptedUserIo::new(), settings(30));

        let err = handler.handle(RunInterviewCommand::new("itchy")).await.unwrap_err();

        assert_eq!(err, InterviewError::UserIo(UserIoError::Closed));
    }

    #[tokio::test]
    async fn slow_owner_times_out() {
        let oracle = ScriptedOracle::new().with_reply(ASK);
        let user = ScriptedUserIo::new()
            .with_answer("eventually")
            .with_delay(Duration::from_millis(200));
        let settings = InterviewSettings {
            answer_timeout: Some(Duration::from_millis(20)),
            ..settings(30)
        };
        let handler = handler(oracle, user, settings);

        let err = handler.handle(RunInterviewCommand::new("itchy")).await.unwrap_err();

        assert_eq!(
            err,
            InterviewError::AnswerTimedOut {
                timeout: Duration::from_millis(20)
            }
        );
        assert_eq!(err.to_string(), "no answer within 20ms");
    }

    /// Answers every question but cannot show the final summary.
    struct MuteUserIo;

    #[async_trait]
    impl UserIo for MuteUserIo {
        async fn ask(&self, _question: &str) -> Result<String, UserIoError> {
            Ok("yes".to_string())
        }

        async fn notify(&self, _message: &str) -> Result<(), UserIoError> {
            Err(UserIoError::Closed)
        }
    }

    #[tokio::test]
    async fn undeliverable_summary_keeps_the_diagnosis() {
        let oracle = ScriptedOracle::new().with_reply(ASK).with_reply(
            r#"{"action":"diagnose","diagnosis":"Mange","confidence":0.6,"rationale":"Crusting on ears","differentials":[]}"#,
        );
        let handler = RunInterviewHandler::new(Arc::new(oracle), Arc::new(MuteUserIo), settings(30));

        let outcome = handler.handle(RunInterviewCommand::new("itchy")).await.unwrap();

        assert_eq!(outcome.result.diagnosis().map(|d| d.diagnosis.as_str()), Some("Mange"));
        assert_eq!(outcome.transcript.exchange_count(), 1);
        assert!(!outcome.notified);
    }

    #[tokio::test]
    async fn blank_complaint_is_rejected_before_any_call() {
        let oracle = ScriptedOracle::always(DIAGNOSE);
        let handler = handler(oracle.clone(), ScriptedUserIo::new(), settings(30));

        let err = handler.handle(RunInterviewCommand::new("   ")).await.unwrap_err();

        assert!(matches!(err, InterviewError::InvalidInput(_)));
        assert_eq!(oracle.call_count(), 0);
    }

    #[tokio::test]
    async fn zero_turn_budget_is_rejected() {
        let oracle = ScriptedOracle::always(DIAGNOSE);
        let handler = handler(oracle.clone(), ScriptedUserIo::new(), settings(0));

        let err = handler.handle(RunInterviewCommand::new("itchy")).await.unwrap_err();

        assert!(matches!(err, InterviewError::InvalidInput(_)));
        assert_eq!(oracle.call_count(), 0);
    }
}
