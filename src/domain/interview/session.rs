//! Interview session aggregate.
//!
//! Owns the complaint, transcript, turn budget and lifecycle state for one
//! interview. It performs no I/O: a driver calls the oracle and the owner,
//! then reports what happened here. Each report returns a [`Step`] telling
//! the driver whether to call the oracle again or stop.
//!
//! # Turn accounting
//!
//! Every oracle response that reaches interpretation consumes one turn:
//! a question (charged once the answer is recorded), a diagnosis, or a
//! recoverable rejection. Transport failures are charged only when the
//! driver asks for it.

use crate::domain::foundation::{SessionId, StateMachine, Timestamp, ValidationError};

use super::budget::TurnBudget;
use super::complaint::Complaint;
use super::message::{Diagnosis, MessageRejection};
use super::result::SessionResult;
use super::state::InterviewState;
use super::transcript::Transcript;

/// What the driver should do after reporting an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Call the oracle again.
    Continue,
    /// The session is over with this result.
    Done(SessionResult),
}

/// One diagnostic interview.
#[derive(Debug, Clone)]
pub struct InterviewSession {
    id: SessionId,
    complaint: Complaint,
    transcript: Transcript,
    budget: TurnBudget,
    state: InterviewState,
    pending_question: Option<String>,
    result: Option<SessionResult>,
    started_at: Timestamp,
}

impl InterviewSession {
    /// Starts a session in `Collecting` with an empty transcript.
    pub fn new(complaint: Complaint, budget: TurnBudget) -> Self {
        Self {
            id: SessionId::new(),
            complaint,
            transcript: Transcript::new(),
            budget,
            state: InterviewState::default(),
            pending_question: None,
            result: None,
            started_at: Timestamp::now(),
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn complaint(&self) -> &Complaint {
        &self.complaint
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn budget(&self) -> &TurnBudget {
        &self.budget
    }

    pub fn state(&self) -> InterviewState {
        self.state
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    /// The question currently waiting on the owner, if any.
    pub fn pending_question(&self) -> Option<&str> {
        self.pending_question.as_deref()
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Marks an oracle call as issued.
    ///
    /// Valid from `Collecting`, or from `AwaitingOracle` when retrying.
    /// Returns the 1-based number of the turn being attempted.
    pub fn begin_oracle_call(&mut self) -> Result<u32, ValidationError> {
        self.transition(InterviewState::AwaitingOracle)?;
        Ok(self.budget.used() + 1)
    }

    /// Discards a malformed oracle response, spending one turn.
    pub fn reject_response(&mut self, _rejection: &MessageRejection) -> Result<Step, ValidationError> {
        self.require(InterviewState::AwaitingOracle)?;
        self.spend_turn_or_retry()
    }

    /// Records an oracle transport failure.
    ///
    /// The turn is only spent when `consume_turn` is set.
    pub fn record_transport_failure(&mut self, consume_turn: bool) -> Result<Step, ValidationError> {
        self.require(InterviewState::AwaitingOracle)?;
        if consume_turn {
            self.spend_turn_or_retry()
        } else {
            self.transition(InterviewState::AwaitingOracle)?;
            Ok(Step::Continue)
        }
    }

    /// Accepts a validated question; the driver must now wait on the owner.
    pub fn receive_question(&mut self, question: impl Into<String>) -> Result<(), ValidationError> {
        self.transition(InterviewState::AwaitingUser)?;
        self.pending_question = Some(question.into());
        Ok(())
    }

    /// Records the owner's answer to the pending question.
    ///
    /// The answer is trimmed; a blank answer is still recorded. Spends one
    /// turn and finishes the session if the budget is gone.
    pub fn record_answer(&mut self, answer: &str) -> Result<Step, ValidationError> {
        self.require(InterviewState::AwaitingUser)?;
        let question = self
            .pending_question
            .take()
            .ok_or_else(|| ValidationError::empty_field("pending_question"))?;

        self.transcript.record_exchange(question, answer.trim());
        self.budget.consume();

        if self.budget.is_exhausted() {
            self.exhaust()
        } else {
            self.transition(InterviewState::Collecting)?;
            Ok(Step::Continue)
        }
    }

    /// Ends the session with the oracle's diagnosis.
    pub fn conclude(&mut self, diagnosis: Diagnosis) -> Result<Step, ValidationError> {
        self.transition(InterviewState::Diagnosed)?;
        self.budget.consume();
        Ok(self.finish(SessionResult::Diagnosed(diagnosis)))
    }

    /// Ends the session without a result.
    pub fn abort(&mut self) -> Result<(), ValidationError> {
        self.pending_question = None;
        self.transition(InterviewState::Aborted)
    }

    /// Consumes the session, yielding its result if it finished with one.
    pub fn into_result(self) -> Option<SessionResult> {
        self.result
    }

    fn spend_turn_or_retry(&mut self) -> Result<Step, ValidationError> {
        self.budget.consume();
        if self.budget.is_exhausted() {
            self.exhaust()
        } else {
            self.transition(InterviewState::AwaitingOracle)?;
            Ok(Step::Continue)
        }
    }

    fn exhaust(&mut self) -> Result<Step, ValidationError> {
        self.transition(InterviewState::Exhausted)?;
        Ok(self.finish(SessionResult::TurnLimitExceeded {
            turns_used: self.budget.used(),
        }))
    }

    fn finish(&mut self, result: SessionResult) -> Step {
        self.result = Some(result.clone());
        Step::Done(result)
    }

    fn require(&self, expected: InterviewState) -> Result<(), ValidationError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ValidationError::invalid_format(
                "interview_state",
                format!("expected {:?}, found {:?}", expected, self.state),
            ))
        }
    }

    fn transition(&mut self, target: InterviewState) -> Result<(), ValidationError> {
        self.state = self.state.transition_to(target)?;
        Ok(())
    }
}
