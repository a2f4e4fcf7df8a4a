//! State machine for tracking a single publish workflow
//!
//! The workflow is a linear sequence with early-exit failure states; the
//! machine records timestamped transitions so a report can show where a
//! failed publish stopped. State is request-scoped and in-memory only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Publishing state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PublishState {
    Initial,
    Validating,
    Verifying,
    ResolvingOutput,
    Running,
    Succeeded,
    Failed,
}

impl PublishState {
    /// Terminal states accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Initial => "INITIAL",
            Self::Validating => "VALIDATING",
            Self::Verifying => "VERIFYING",
            Self::ResolvingOutput => "RESOLVING_OUTPUT",
            Self::Running => "RUNNING",
            Self::Succeeded => "SUCCEEDED",
            Self::Failed => "FAILED",
        }
    }
}

/// A single recorded transition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StateTransition {
    pub from: PublishState,
    pub to: PublishState,
    pub timestamp: DateTime<Utc>,
}

/// Tracks the state of one publish invocation
pub struct PublishStateMachine {
    current_state: PublishState,
    transitions: Vec<StateTransition>,
}

impl Default for PublishStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl PublishStateMachine {
    pub fn new() -> Self {
        Self {
            current_state: PublishState::Initial,
            transitions: Vec::new(),
        }
    }

    /// Transition to a new state, recording the step
    ///
    /// Transitions out of a terminal state are ignored rather than panicking;
    /// the orchestrator never attempts one, but a buggy caller must not be
    /// able to corrupt a finished report.
    pub fn transition(&mut self, to: PublishState) {
        if self.current_state.is_terminal() {
            return;
        }

        self.transitions.push(StateTransition {
            from: self.current_state,
            to,
            timestamp: Utc::now(),
        });
        self.current_state = to;
    }

    pub fn state(&self) -> PublishState {
        self.current_state
    }

    /// Transition history in order of occurrence
    pub fn history(&self) -> &[StateTransition] {
        &self.transitions
    }

    /// Consume the machine, yielding its transition history for a report
    pub fn into_history(self) -> Vec<StateTransition> {
        self.transitions
    }
}
