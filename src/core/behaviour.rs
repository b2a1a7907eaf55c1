//! Trigger behaviours: the guarded candidate transitions a state registers.

use super::guard::Guard;
use super::state::{State, Trigger};
use serde_json::Value;
use std::fmt;

/// Destination selector for dynamic behaviours. Receives the arguments the
/// trigger was fired with.
pub type DestinationSelector<S> = Box<dyn Fn(&[Value]) -> S + Send + Sync>;

/// A candidate reaction of one state to one trigger.
///
/// The variant set is closed: a behaviour either moves to a fixed
/// destination, computes its destination from the fire arguments, or
/// swallows the trigger without a state change. Every variant carries a
/// guard; unconditional behaviours use [`Guard::always`].
///
/// # Example
///
/// ```rust
/// use strata::{state_enum, trigger_enum};
/// use strata::core::{Guard, TriggerBehaviour};
///
/// state_enum! {
///     enum Door { Open, Closed }
/// }
///
/// trigger_enum! {
///     enum Action { Close, Knock }
/// }
///
/// let close = TriggerBehaviour::permit(Action::Close, Door::Closed);
/// assert_eq!(close.results_in_transition_from(&Door::Open, &[]), Some(Door::Closed));
///
/// let knock = TriggerBehaviour::<Door, Action>::ignore(Action::Knock);
/// assert!(knock.is_guard_condition_met());
/// assert_eq!(knock.results_in_transition_from(&Door::Open, &[]), None);
/// ```
pub enum TriggerBehaviour<S: State, T: Trigger> {
    /// Move to a fixed destination.
    Transitioning {
        trigger: T,
        destination: S,
        guard: Guard,
    },

    /// Move to a destination chosen from the fire arguments.
    Dynamic {
        trigger: T,
        selector: DestinationSelector<S>,
        guard: Guard,
    },

    /// Handle the trigger without changing state.
    Ignored { trigger: T, guard: Guard },
}

impl<S: State, T: Trigger> TriggerBehaviour<S, T> {
    /// Unconditional transition to `destination`.
    pub fn permit(trigger: T, destination: S) -> Self {
        Self::permit_if(trigger, destination, Guard::always())
    }

    /// Transition to `destination` while `guard` holds.
    pub fn permit_if(trigger: T, destination: S, guard: Guard) -> Self {
        Self::Transitioning {
            trigger,
            destination,
            guard,
        }
    }

    /// Unconditional transition to whatever `selector` returns.
    pub fn permit_dynamic<F>(trigger: T, selector: F) -> Self
    where
        F: Fn(&[Value]) -> S + Send + Sync + 'static,
    {
        Self::permit_dynamic_if(trigger, selector, Guard::always())
    }

    pub fn permit_dynamic_if<F>(trigger: T, selector: F, guard: Guard) -> Self
    where
        F: Fn(&[Value]) -> S + Send + Sync + 'static,
    {
        Self::Dynamic {
            trigger,
            selector: Box::new(selector),
            guard,
        }
    }

    /// Swallow the trigger.
    pub fn ignore(trigger: T) -> Self {
        Self::ignore_if(trigger, Guard::always())
    }

    pub fn ignore_if(trigger: T, guard: Guard) -> Self {
        Self::Ignored { trigger, guard }
    }

    /// The trigger this behaviour reacts to.
    pub fn trigger(&self) -> &T {
        match self {
            Self::Transitioning { trigger, .. }
            | Self::Dynamic { trigger, .. }
            | Self::Ignored { trigger, .. } => trigger,
        }
    }

    /// Evaluate the guard now.
    pub fn is_guard_condition_met(&self) -> bool {
        match self {
            Self::Transitioning { guard, .. }
            | Self::Dynamic { guard, .. }
            | Self::Ignored { guard, .. } => guard.check(),
        }
    }

    /// The destination reached when firing from `source`, or `None` when the
    /// behaviour does not change state.
    pub fn results_in_transition_from(&self, _source: &S, args: &[Value]) -> Option<S> {
        match self {
            Self::Transitioning { destination, .. } => Some(destination.clone()),
            Self::Dynamic { selector, .. } => Some(selector(args)),
            Self::Ignored { .. } => None,
        }
    }
}

impl<S: State, T: Trigger> fmt::Debug for TriggerBehaviour<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transitioning {
                trigger,
                destination,
                ..
            } => f
                .debug_struct("Transitioning")
                .field("trigger", trigger)
                .field("destination", destination)
                .finish_non_exhaustive(),
            Self::Dynamic { trigger, .. } => f
                .debug_struct("Dynamic")
                .field("trigger", trigger)
                .finish_non_exhaustive(),
            Self::Ignored { trigger, .. } => f
                .debug_struct("Ignored")
                .field("trigger", trigger)
                .finish_non_exhaustive(),
        }
    }
}
