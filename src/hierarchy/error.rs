//! Errors raised while building or resolving a state hierarchy.

use thiserror::Error;

/// Errors that can occur when configuring a hierarchy or running its
/// entry/exit sequences.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum HsmError {
    #[error(
        "Multiple permitted exit transitions are configured from state '{state}' for trigger '{trigger}'. Guard clauses must be mutually exclusive"
    )]
    MultipleGuardsSatisfied { state: String, trigger: String },

    #[error("Action failed: {message}")]
    ActionFailed { message: String },

    #[error("State '{state}' is already configured in this hierarchy")]
    DuplicateState { state: String },

    #[error("Making '{superstate}' the superstate of '{state}' would create a cycle")]
    CyclicHierarchy { state: String, superstate: String },

    #[error("State '{state}' already has a superstate")]
    SuperstateAlreadySet { state: String },
}

impl HsmError {
    /// Build an [`HsmError::ActionFailed`] from any message.
    pub fn action_failed(message: impl Into<String>) -> Self {
        Self::ActionFailed {
            message: message.into(),
        }
    }
}

/// Result returned by entry and exit actions, and by `enter` / `exit`.
pub type ActionResult = Result<(), HsmError>;
