//! State machine trait for lifecycle enums.

use super::ValidationError;

/// Lifecycle enum with an explicit transition table.
///
/// Implementors list their legal edges once; `transition_to` then refuses
/// anything outside that table so callers cannot skip a state by accident.
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if moving from self to target is a legal edge.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Returns all legal targets from the current state.
    fn valid_transitions(&self) -> Vec<Self>;

    /// Performs a checked transition.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid_format(
                "state_transition",
                format!("cannot move from {:?} to {:?}", self, target),
            ))
        }
    }

    /// A state with no outgoing edges.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
