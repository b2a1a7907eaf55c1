//! The transition value passed to entry and exit actions.

use super::state::{State, Trigger};
use serde::{Deserialize, Serialize};

/// One resolved state change.
///
/// Transitions are immutable values built by the caller once a handler has
/// produced a destination. The hierarchy uses them to decide how far to
/// walk when exiting the source and entering the destination.
///
/// # Example
///
/// ```rust
/// use strata::{state_enum, trigger_enum};
/// use strata::core::Transition;
///
/// state_enum! {
///     enum Light { Off, On }
/// }
///
/// trigger_enum! {
///     enum Switch { Flip, Refresh }
/// }
///
/// let flip = Transition::new(Light::Off, Light::On, Switch::Flip);
/// assert!(!flip.is_reentry());
///
/// let refresh = Transition::new(Light::On, Light::On, Switch::Refresh);
/// assert!(refresh.is_reentry());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Transition<S: State, T: Trigger> {
    source: S,
    destination: S,
    trigger: T,
}

impl<S: State, T: Trigger> Transition<S, T> {
    pub fn new(source: S, destination: S, trigger: T) -> Self {
        Self {
            source,
            destination,
            trigger,
        }
    }

    /// The state being left.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// The state being entered.
    pub fn destination(&self) -> &S {
        &self.destination
    }

    /// The trigger that caused the transition.
    pub fn trigger(&self) -> &T {
        &self.trigger
    }

    /// True when source and destination are the same state.
    pub fn is_reentry(&self) -> bool {
        self.source == self.destination
    }
}
