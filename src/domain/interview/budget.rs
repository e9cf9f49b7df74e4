//! Turn budget that guarantees every interview terminates.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;

/// Default number of oracle turns per session.
pub const DEFAULT_MAX_TURNS: u32 = 30;

/// Bounded turn counter.
///
/// One unit is consumed per completed oracle round trip whose text reached
/// interpretation, whether it produced a question, a diagnosis, or a
/// recoverable rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnBudget {
    used: u32,
    bound: u32,
}

impl TurnBudget {
    /// Creates a budget allowing `bound` turns. The bound must be at least one.
    pub fn new(bound: u32) -> Result<Self, ValidationError> {
        if bound == 0 {
            return Err(ValidationError::out_of_range(
                "max_turns",
                1,
                i64::from(u32::MAX),
                0,
            ));
        }
        Ok(Self { used: 0, bound })
    }

    /// Spends one turn and returns the number used so far.
    pub fn consume(&mut self) -> u32 {
        self.used = self.used.saturating_add(1).min(self.bound);
        self.used
    }

    pub fn is_exhausted(&self) -> bool {
        self.used >= self.bound
    }

    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn bound(&self) -> u32 {
        self.bound
    }

    pub fn remaining(&self) -> u32 {
        self.bound - self.used
    }
}

impl Default for TurnBudget {
    fn default() -> Self {
        Self {
            used: 0,
            bound: DEFAULT_MAX_TURNS,
        }
    }
}
