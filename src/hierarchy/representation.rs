//! A single node of the state hierarchy.

use crate::core::{State, Transition, Trigger, TriggerBehaviour};
use crate::hierarchy::error::{ActionResult, HsmError};
use crate::hierarchy::graph::StateId;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use tracing::{trace, warn};

/// Entry action: receives the transition and the arguments the trigger was
/// fired with.
pub type EntryAction<S, T> =
    Box<dyn Fn(&Transition<S, T>, &[Value]) -> ActionResult + Send + Sync>;

/// Exit action: receives the transition.
pub type ExitAction<S, T> = Box<dyn Fn(&Transition<S, T>) -> ActionResult + Send + Sync>;

/// One state in the hierarchy together with everything configured on it.
///
/// A representation only knows about itself: its local trigger behaviours,
/// its entry and exit actions, and the ids of its direct substates and of
/// its superstate. Walking the hierarchy needs the owning
/// [`StateGraph`](crate::hierarchy::StateGraph); see
/// [`StateRef`](crate::hierarchy::StateRef).
pub struct StateRepresentation<S: State, T: Trigger> {
    state: S,
    trigger_behaviours: HashMap<T, Vec<TriggerBehaviour<S, T>>>,
    entry_actions: Vec<EntryAction<S, T>>,
    exit_actions: Vec<ExitAction<S, T>>,
    substates: Vec<StateId>,
    superstate: Option<StateId>,
}

impl<S: State, T: Trigger> StateRepresentation<S, T> {
    pub fn new(state: S) -> Self {
        Self {
            state,
            trigger_behaviours: HashMap::new(),
            entry_actions: Vec::new(),
            exit_actions: Vec::new(),
            substates: Vec::new(),
            superstate: None,
        }
    }

    pub fn underlying_state(&self) -> &S {
        &self.state
    }

    /// Behaviours registered on this state only, keyed by trigger.
    pub fn trigger_behaviours(&self) -> &HashMap<T, Vec<TriggerBehaviour<S, T>>> {
        &self.trigger_behaviours
    }

    /// Direct substates, in the order they were attached.
    pub fn substates(&self) -> &[StateId] {
        &self.substates
    }

    pub fn superstate(&self) -> Option<StateId> {
        self.superstate
    }

    pub fn add_trigger_behaviour(&mut self, behaviour: TriggerBehaviour<S, T>) {
        self.trigger_behaviours
            .entry(behaviour.trigger().clone())
            .or_default()
            .push(behaviour);
    }

    /// Append an entry action.
    pub fn add_entry_action<F>(&mut self, action: F)
    where
        F: Fn(&Transition<S, T>, &[Value]) -> ActionResult + Send + Sync + 'static,
    {
        self.entry_actions.push(Box::new(action));
    }

    /// Append an entry action that only runs when the state is entered
    /// through `trigger`.
    pub fn add_entry_action_for<F>(&mut self, trigger: T, action: F)
    where
        F: Fn(&Transition<S, T>, &[Value]) -> ActionResult + Send + Sync + 'static,
    {
        self.entry_actions
            .push(Box::new(move |transition: &Transition<S, T>, args: &[Value]| {
                if *transition.trigger() == trigger {
                    action(transition, args)
                } else {
                    Ok(())
                }
            }));
    }

    /// Put an entry action in front of those already registered.
    pub fn insert_entry_action<F>(&mut self, action: F)
    where
        F: Fn(&Transition<S, T>, &[Value]) -> ActionResult + Send + Sync + 'static,
    {
        self.entry_actions.insert(0, Box::new(action));
    }

    pub fn add_exit_action<F>(&mut self, action: F)
    where
        F: Fn(&Transition<S, T>) -> ActionResult + Send + Sync + 'static,
    {
        self.exit_actions.push(Box::new(action));
    }

    pub(crate) fn add_substate(&mut self, substate: StateId) {
        self.substates.push(substate);
    }

    pub(crate) fn set_superstate(&mut self, superstate: StateId) {
        self.superstate = Some(superstate);
    }

    /// Find the single behaviour for `trigger` on this state whose guard is
    /// currently satisfied.
    ///
    /// Returns `Ok(None)` when the trigger is unknown here or every guard
    /// blocks it. More than one satisfied guard is a configuration error.
    pub fn try_find_local_handler(
        &self,
        trigger: &T,
    ) -> Result<Option<&TriggerBehaviour<S, T>>, HsmError> {
        let Some(possible) = self.trigger_behaviours.get(trigger) else {
            return Ok(None);
        };

        let mut actual = possible.iter().filter(|b| b.is_guard_condition_met());
        let first = actual.next();
        if first.is_some() && actual.next().is_some() {
            warn!(
                state = self.state.name(),
                trigger = trigger.name(),
                "more than one guard satisfied"
            );
            return Err(HsmError::MultipleGuardsSatisfied {
                state: self.state.name().to_string(),
                trigger: trigger.name().to_string(),
            });
        }

        Ok(first)
    }

    /// Local triggers with at least one satisfied guard.
    pub(crate) fn locally_permitted_triggers(&self) -> impl Iterator<Item = &T> + '_ {
        self.trigger_behaviours
            .iter()
            .filter(|(_, behaviours)| behaviours.iter().any(|b| b.is_guard_condition_met()))
            .map(|(trigger, _)| trigger)
    }

    /// Run every entry action in order. Stops at the first failure.
    pub fn execute_entry_actions(
        &self,
        transition: &Transition<S, T>,
        args: &[Value],
    ) -> ActionResult {
        trace!(
            state = self.state.name(),
            count = self.entry_actions.len(),
            "running entry actions"
        );
        for action in &self.entry_actions {
            action(transition, args)?;
        }
        Ok(())
    }

    /// Run every exit action in order. Stops at the first failure.
    pub fn execute_exit_actions(&self, transition: &Transition<S, T>) -> ActionResult {
        trace!(
            state = self.state.name(),
            count = self.exit_actions.len(),
            "running exit actions"
        );
        for action in &self.exit_actions {
            action(transition)?;
        }
        Ok(())
    }
}

impl<S: State, T: Trigger> fmt::Debug for StateRepresentation<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateRepresentation")
            .field("state", &self.state)
            .field("trigger_behaviours", &self.trigger_behaviours)
            .field("entry_actions", &self.entry_actions.len())
            .field("exit_actions", &self.exit_actions.len())
            .field("substates", &self.substates)
            .field("superstate", &self.superstate)
            .finish()
    }
}
