//! Interview lifecycle states.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Where an interview session currently stands.
///
/// - `Collecting`: transcript updated, next oracle call not yet issued
/// - `AwaitingOracle`: an oracle call is in flight (or being retried)
/// - `AwaitingUser`: a question is out to the owner
/// - `Diagnosed`, `Exhausted`: terminal with a session result
/// - `Aborted`: terminal without a result; the failure went to the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InterviewState {
    #[default]
    Collecting,
    AwaitingOracle,
    AwaitingUser,
    Diagnosed,
    Exhausted,
    Aborted,
}

impl InterviewState {
    /// True once the session has a result or has been aborted.
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Diagnosed | Self::Exhausted | Self::Aborted)
    }
}

impl StateMachine for InterviewState {
    fn can_transition_to(&self, target: &Self) -> bool {
        use InterviewState::*;
        matches!(
            (self, target),
            (Collecting, AwaitingOracle)
                // Retry after a discarded response or transport failure
                | (AwaitingOracle, AwaitingOracle)
                | (AwaitingOracle, AwaitingUser)
                | (AwaitingOracle, Diagnosed)
                | (AwaitingOracle, Exhausted)
                | (AwaitingOracle, Aborted)
                | (AwaitingUser, Collecting)
                | (AwaitingUser, Exhausted)
                | (AwaitingUser, Aborted)
                | (Collecting, Aborted)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use InterviewState::*;
        match self {
            Collecting => vec![AwaitingOracle, Aborted],
            AwaitingOracle => vec![AwaitingOracle, AwaitingUser, Diagnosed, Exhausted, Aborted],
            AwaitingUser => vec![Collecting, Exhausted, Aborted],
            Diagnosed | Exhausted | Aborted => vec![],
        }
    }
}
