//! Turn phase of a try-on session.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Where a session is within the current chat turn.
///
/// The machine cycles; there is no terminal phase during normal operation.
/// Teardown happens at the orchestrator level, not as a phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    /// No turn in flight.
    #[default]
    Idle,
    /// A conversational-model call is outstanding.
    AwaitingModelResponse,
    /// A dispatched function call (image synthesis) is outstanding.
    AwaitingFunctionResult,
}

impl StateMachine for TurnPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use TurnPhase::*;
        matches!(
            (self, target),
            (Idle, AwaitingModelResponse)
                | (AwaitingModelResponse, Idle)
                | (AwaitingModelResponse, AwaitingFunctionResult)
                | (AwaitingFunctionResult, Idle)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use TurnPhase::*;
        match self {
            Idle => vec![AwaitingModelResponse],
            AwaitingModelResponse => vec![Idle, AwaitingFunctionResult],
            AwaitingFunctionResult => vec![Idle],
        }
    }
}

impl fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TurnPhase::Idle => "Idle",
            TurnPhase::AwaitingModelResponse => "AwaitingModelResponse",
            TurnPhase::AwaitingFunctionResult => "AwaitingFunctionResult",
        };
        write!(f, "{}", s)
    }
}
