//! Arena holding every state of one hierarchy, and the hierarchy-walking
//! algorithms that run over it.

use crate::core::{State, Transition, Trigger, TriggerBehaviour};
use crate::hierarchy::error::{ActionResult, HsmError};
use crate::hierarchy::representation::StateRepresentation;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, trace};

/// Stable handle to a state inside one [`StateGraph`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StateId(usize);

impl StateId {
    /// Position of the state in its graph.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Owner of all states in one hierarchy.
///
/// States are added once and never removed, so every [`StateId`] stays valid
/// for the lifetime of the graph. Parents reference children and children
/// reference their parent by id only.
///
/// All mutation goes through `&mut self` and happens while configuring. The
/// runtime queries on [`StateRef`] borrow the graph immutably.
///
/// # Example
///
/// ```rust
/// use strata::{state_enum, trigger_enum};
/// use strata::core::TriggerBehaviour;
/// use strata::hierarchy::StateGraph;
///
/// state_enum! {
///     enum Phase { Idle, Active }
/// }
///
/// trigger_enum! {
///     enum Signal { Go, Stop }
/// }
///
/// let mut graph = StateGraph::new();
/// let idle = graph.add_state(Phase::Idle).unwrap();
/// let active = graph.add_state(Phase::Active).unwrap();
/// graph.set_superstate(active, idle).unwrap();
///
/// graph
///     .representation_mut(idle)
///     .add_trigger_behaviour(TriggerBehaviour::permit(Signal::Go, Phase::Active));
///
/// // Active inherits Go from its superstate.
/// assert!(graph.state(active).can_handle(&Signal::Go).unwrap());
/// assert!(!graph.state(active).can_handle(&Signal::Stop).unwrap());
/// assert!(graph.state(idle).includes(&Phase::Active));
/// ```
pub struct StateGraph<S: State, T: Trigger> {
    nodes: Vec<StateRepresentation<S, T>>,
}

impl<S: State, T: Trigger> StateGraph<S, T> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Add a state with no behaviours, actions or relatives.
    pub fn add_state(&mut self, state: S) -> Result<StateId, HsmError> {
        if self.find(&state).is_some() {
            return Err(HsmError::DuplicateState {
                state: state.name().to_string(),
            });
        }

        let id = StateId(self.nodes.len());
        trace!(state = state.name(), index = id.0, "state added");
        self.nodes.push(StateRepresentation::new(state));
        Ok(id)
    }

    /// Look a state up by value.
    pub fn find(&self, state: &S) -> Option<StateId> {
        self.nodes
            .iter()
            .position(|node| node.underlying_state() == state)
            .map(StateId)
    }

    /// Read view of a state, by value.
    pub fn get(&self, state: &S) -> Option<StateRef<'_, S, T>> {
        self.find(state).map(|id| self.state(id))
    }

    /// Read view of a state.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this graph.
    pub fn state(&self, id: StateId) -> StateRef<'_, S, T> {
        assert!(id.0 < self.nodes.len(), "state id {id:?} is not in this graph");
        StateRef { graph: self, id }
    }

    /// Mutable access for configuring a state.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this graph.
    pub fn representation_mut(&mut self, id: StateId) -> &mut StateRepresentation<S, T> {
        &mut self.nodes[id.0]
    }

    /// Make `superstate` the parent of `substate`.
    ///
    /// Sets the child's back reference and appends the child to the parent's
    /// substates. A state can be linked to one superstate only, and never
    /// below itself.
    ///
    /// # Panics
    ///
    /// Panics if either id was not issued by this graph.
    pub fn set_superstate(
        &mut self,
        substate: StateId,
        superstate: StateId,
    ) -> Result<(), HsmError> {
        let child = self.state(substate);
        let parent = self.state(superstate);

        if child.representation().superstate().is_some() {
            return Err(HsmError::SuperstateAlreadySet {
                state: child.underlying_state().name().to_string(),
            });
        }
        if child.includes(parent.underlying_state()) {
            return Err(HsmError::CyclicHierarchy {
                state: child.underlying_state().name().to_string(),
                superstate: parent.underlying_state().name().to_string(),
            });
        }

        self.nodes[substate.0].set_superstate(superstate);
        self.nodes[superstate.0].add_substate(substate);
        Ok(())
    }

    pub fn states(&self) -> impl Iterator<Item = StateRef<'_, S, T>> + '_ {
        (0..self.nodes.len()).map(move |index| StateRef {
            graph: self,
            id: StateId(index),
        })
    }
}

impl<S: State, T: Trigger> Default for StateGraph<S, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State, T: Trigger> fmt::Debug for StateGraph<S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.nodes).finish()
    }
}

/// A state seen in the context of its graph.
///
/// This is where the hierarchy is walked: handler lookup climbs through
/// superstates, containment looks up or down the tree, and `enter` / `exit`
/// cross exactly the boundary between a transition's source and
/// destination.
pub struct StateRef<'g, S: State, T: Trigger> {
    graph: &'g StateGraph<S, T>,
    id: StateId,
}

impl<'g, S: State, T: Trigger> Clone for StateRef<'g, S, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'g, S: State, T: Trigger> Copy for StateRef<'g, S, T> {}

impl<'g, S: State, T: Trigger> StateRef<'g, S, T> {
    pub fn id(&self) -> StateId {
        self.id
    }

    pub fn representation(&self) -> &'g StateRepresentation<S, T> {
        &self.graph.nodes[self.id.0]
    }

    pub fn underlying_state(&self) -> &'g S {
        self.representation().underlying_state()
    }

    pub fn superstate(&self) -> Option<StateRef<'g, S, T>> {
        self.representation()
            .superstate()
            .map(|id| self.graph.state(id))
    }

    pub fn substates(&self) -> impl Iterator<Item = StateRef<'g, S, T>> + 'g {
        let graph = self.graph;
        self.representation()
            .substates()
            .iter()
            .map(move |&id| graph.state(id))
    }

    /// Whether this state or one of its ancestors can currently handle
    /// `trigger`.
    pub fn can_handle(&self, trigger: &T) -> Result<bool, HsmError> {
        Ok(self.try_find_handler(trigger)?.is_some())
    }

    /// Find the behaviour that handles `trigger`, searching this state first
    /// and then each superstate in turn.
    ///
    /// The nearest state with a satisfied guard wins, so a substate's
    /// behaviour shadows any ancestor's behaviour for the same trigger.
    pub fn try_find_handler(
        &self,
        trigger: &T,
    ) -> Result<Option<&'g TriggerBehaviour<S, T>>, HsmError> {
        if let Some(handler) = self.representation().try_find_local_handler(trigger)? {
            debug!(
                state = self.underlying_state().name(),
                trigger = trigger.name(),
                "handler resolved"
            );
            return Ok(Some(handler));
        }

        match self.superstate() {
            Some(superstate) => {
                trace!(
                    state = self.underlying_state().name(),
                    superstate = superstate.underlying_state().name(),
                    trigger = trigger.name(),
                    "no local handler, deferring to superstate"
                );
                superstate.try_find_handler(trigger)
            }
            None => Ok(None),
        }
    }

    /// True if `state` is this state or any state below it.
    pub fn includes(&self, state: &S) -> bool {
        self.underlying_state() == state || self.substates().any(|sub| sub.includes(state))
    }

    /// True if `state` is this state or any state above it.
    pub fn is_included_in(&self, state: &S) -> bool {
        self.underlying_state() == state
            || self
                .superstate()
                .is_some_and(|superstate| superstate.is_included_in(state))
    }

    /// Triggers that can be handled from here right now, including those
    /// inherited from superstates.
    pub fn permitted_triggers(&self) -> HashSet<T> {
        let mut result: HashSet<T> = self
            .representation()
            .locally_permitted_triggers()
            .cloned()
            .collect();

        if let Some(superstate) = self.superstate() {
            result.extend(superstate.permitted_triggers());
        }

        result
    }

    /// Run entry actions for the destination side of `transition`.
    ///
    /// Call on the destination state. Superstates that do not already
    /// contain the source are entered first, outermost to innermost. A
    /// reentry runs this state's entry actions only.
    pub fn enter(&self, transition: &Transition<S, T>, args: &[Value]) -> ActionResult {
        let representation = self.representation();

        if transition.is_reentry() {
            trace!(state = self.underlying_state().name(), "reentering");
            representation.execute_entry_actions(transition, args)
        } else if !self.includes(transition.source()) {
            if let Some(superstate) = self.superstate() {
                superstate.enter(transition, args)?;
            }
            trace!(state = self.underlying_state().name(), "entering");
            representation.execute_entry_actions(transition, args)
        } else {
            Ok(())
        }
    }

    /// Run exit actions for the source side of `transition`.
    ///
    /// Call on the source state. Exits climb outward until reaching a
    /// superstate that contains the destination. A reentry runs this state's
    /// exit actions only.
    pub fn exit(&self, transition: &Transition<S, T>) -> ActionResult {
        let representation = self.representation();

        if transition.is_reentry() {
            trace!(state = self.underlying_state().name(), "exiting for reentry");
            representation.execute_exit_actions(transition)
        } else if !self.includes(transition.destination()) {
            trace!(state = self.underlying_state().name(), "exiting");
            representation.execute_exit_actions(transition)?;
            match self.superstate() {
                Some(superstate) => superstate.exit(transition),
                None => Ok(()),
            }
        } else {
            Ok(())
        }
    }
}

impl<'g, S: State, T: Trigger> fmt::Debug for StateRef<'g, S, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateRef")
            .field("id", &self.id)
            .field("state", self.underlying_state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Guard;
    use serde::{Deserialize, Serialize};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
    enum TestState {
        Root,
        Left,
        LeftLeaf,
        Right,
    }

    impl State for TestState {
        fn name(&self) -> &str {
            match self {
                Self::Root => "Root",
                Self::Left => "Left",
                Self::LeftLeaf => "LeftLeaf",
                Self::Right => "Right",
            }
        }
    }

    #[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
    enum TestTrigger {
        Jump,
        Reset,
        Unused,
    }

    impl Trigger for TestTrigger {
        fn name(&self) -> &str {
            match self {
                Self::Jump => "Jump",
                Self::Reset => "Reset",
                Self::Unused => "Unused",
            }
        }
    }

    struct Fixture {
        graph: StateGraph<TestState, TestTrigger>,
        root: StateId,
        left: StateId,
        leaf: StateId,
        right: StateId,
        log: Arc<Mutex<Vec<String>>>,
    }

    /// Root ⊃ {Left ⊃ {LeftLeaf}, Right}, each logging its entry and exit.
    fn fixture() -> Fixture {
        let mut graph = StateGraph::new();
        let root = graph.add_state(TestState::Root).unwrap();
        let left = graph.add_state(TestState::Left).unwrap();
        let leaf = graph.add_state(TestState::LeftLeaf).unwrap();
        let right = graph.add_state(TestState::Right).unwrap();
        graph.set_superstate(left, root).unwrap();
        graph.set_superstate(leaf, left).unwrap();
        graph.set_superstate(right, root).unwrap();

        let log = Arc::new(Mutex::new(Vec::new()));
        for id in [root, left, leaf, right] {
            let name = graph.state(id).underlying_state().name().to_string();
            let rep = graph.representation_mut(id);
            let entry_log = Arc::clone(&log);
            let entry_name = name.clone();
            rep.add_entry_action(move |_, _| {
                entry_log.lock().unwrap().push(format!("enter {entry_name}"));
                Ok(())
            });
            let exit_log = Arc::clone(&log);
            rep.add_exit_action(move |_| {
                exit_log.lock().unwrap().push(format!("exit {name}"));
                Ok(())
            });
        }

        Fixture {
            graph,
            root,
            left,
            leaf,
            right,
            log,
        }
    }

    fn run(f: &Fixture, from: StateId, to: StateId) -> Vec<String> {
        let source = f.graph.state(from);
        let destination = f.graph.state(to);
        let transition = Transition::new(
            source.underlying_state().clone(),
            destination.underlying_state().clone(),
            TestTrigger::Jump,
        );
        source.exit(&transition).unwrap();
        destination.enter(&transition, &[]).unwrap();
        f.log.lock().unwrap().clone()
    }

    #[test]
    fn duplicate_state_is_rejected() {
        let mut graph = StateGraph::<TestState, TestTrigger>::new();
        graph.add_state(TestState::Root).unwrap();

        assert_eq!(
            graph.add_state(TestState::Root),
            Err(HsmError::DuplicateState {
                state: "Root".to_string()
            })
        );
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn cyclic_link_is_rejected() {
        let mut f = fixture();

        let result = f.graph.set_superstate(f.root, f.leaf);
        assert_eq!(
            result,
            Err(HsmError::CyclicHierarchy {
                state: "Root".to_string(),
                superstate: "LeftLeaf".to_string(),
            })
        );
    }

    #[test]
    fn self_link_is_rejected() {
        let mut graph = StateGraph::<TestState, TestTrigger>::new();
        let root = graph.add_state(TestState::Root).unwrap();

        assert!(matches!(
            graph.set_superstate(root, root),
            Err(HsmError::CyclicHierarchy { .. })
        ));
    }

    #[test]
    fn second_superstate_is_rejected() {
        let mut f = fixture();

        assert_eq!(
            f.graph.set_superstate(f.leaf, f.right),
            Err(HsmError::SuperstateAlreadySet {
                state: "LeftLeaf".to_string()
            })
        );
        assert_eq!(f.graph.state(f.right).substates().count(), 0);
    }

    #[test]
    fn find_and_get_look_up_by_value() {
        let f = fixture();

        assert_eq!(f.graph.find(&TestState::Right), Some(f.right));
        assert_eq!(
            f.graph.get(&TestState::Left).map(|s| s.id()),
            Some(f.left)
        );
        assert_eq!(f.graph.states().count(), 4);
    }

    #[test]
    fn superstate_and_substates_are_linked() {
        let f = fixture();

        let leaf = f.graph.state(f.leaf);
        assert_eq!(leaf.superstate().map(|s| s.id()), Some(f.left));
        let children: Vec<_> = f.graph.state(f.root).substates().map(|s| s.id()).collect();
        assert_eq!(children, vec![f.left, f.right]);
        assert!(f.graph.state(f.root).superstate().is_none());
    }

    #[test]
    fn includes_looks_down_the_tree() {
        let f = fixture();
        let root = f.graph.state(f.root);
        let left = f.graph.state(f.left);

        assert!(root.includes(&TestState::LeftLeaf));
        assert!(root.includes(&TestState::Root));
        assert!(left.includes(&TestState::LeftLeaf));
        assert!(!left.includes(&TestState::Right));
        assert!(!left.includes(&TestState::Root));
    }

    #[test]
    fn is_included_in_looks_up_the_tree() {
        let f = fixture();
        let leaf = f.graph.state(f.leaf);

        assert!(leaf.is_included_in(&TestState::LeftLeaf));
        assert!(leaf.is_included_in(&TestState::Left));
        assert!(leaf.is_included_in(&TestState::Root));
        assert!(!leaf.is_included_in(&TestState::Right));
    }

    #[test]
    fn handler_is_inherited_from_ancestor() {
        let mut f = fixture();
        f.graph
            .representation_mut(f.root)
            .add_trigger_behaviour(TriggerBehaviour::permit(TestTrigger::Reset, TestState::Root));

        let handler = f
            .graph
            .state(f.leaf)
            .try_find_handler(&TestTrigger::Reset)
            .unwrap()
            .unwrap();
        assert_eq!(
            handler.results_in_transition_from(&TestState::LeftLeaf, &[]),
            Some(TestState::Root)
        );
        assert!(!f.graph.state(f.leaf).can_handle(&TestTrigger::Unused).unwrap());
    }

    #[test]
    fn substate_handler_shadows_ancestor() {
        let mut f = fixture();
        f.graph
            .representation_mut(f.root)
            .add_trigger_behaviour(TriggerBehaviour::permit(TestTrigger::Jump, TestState::Right));
        f.graph
            .representation_mut(f.left)
            .add_trigger_behaviour(TriggerBehaviour::ignore(TestTrigger::Jump));

        let handler = f
            .graph
            .state(f.leaf)
            .try_find_handler(&TestTrigger::Jump)
            .unwrap()
            .unwrap();
        assert!(matches!(handler, TriggerBehaviour::Ignored { .. }));
    }

    #[test]
    fn blocked_local_guard_falls_back_to_ancestor() {
        let mut f = fixture();
        f.graph
            .representation_mut(f.root)
            .add_trigger_behaviour(TriggerBehaviour::permit(TestTrigger::Jump, TestState::Right));
        f.graph.representation_mut(f.leaf).add_trigger_behaviour(
            TriggerBehaviour::permit_if(TestTrigger::Jump, TestState::Left, Guard::new(|| false)),
        );

        let handler = f
            .graph
            .state(f.leaf)
            .try_find_handler(&TestTrigger::Jump)
            .unwrap()
            .unwrap();
        assert_eq!(
            handler.results_in_transition_from(&TestState::LeftLeaf, &[]),
            Some(TestState::Right)
        );
    }

    #[test]
    fn ambiguity_in_ancestor_surfaces_from_substate() {
        let mut f = fixture();
        let rep = f.graph.representation_mut(f.left);
        rep.add_trigger_behaviour(TriggerBehaviour::permit(TestTrigger::Jump, TestState::Right));
        rep.add_trigger_behaviour(TriggerBehaviour::permit(TestTrigger::Jump, TestState::Root));

        assert!(matches!(
            f.graph.state(f.leaf).can_handle(&TestTrigger::Jump),
            Err(HsmError::MultipleGuardsSatisfied { .. })
        ));
    }

    #[test]
    fn permitted_triggers_union_with_ancestors() {
        let mut f = fixture();
        f.graph
            .representation_mut(f.root)
            .add_trigger_behaviour(TriggerBehaviour::permit(TestTrigger::Reset, TestState::Root));
        f.graph
            .representation_mut(f.left)
            .add_trigger_behaviour(TriggerBehaviour::permit(TestTrigger::Reset, TestState::Left));
        f.graph
            .representation_mut(f.leaf)
            .add_trigger_behaviour(TriggerBehaviour::permit(TestTrigger::Jump, TestState::Right));
        f.graph.representation_mut(f.leaf).add_trigger_behaviour(
            TriggerBehaviour::permit_if(TestTrigger::Unused, TestState::Root, Guard::new(|| false)),
        );

        let permitted = f.graph.state(f.leaf).permitted_triggers();
        let expected: HashSet<_> = [TestTrigger::Jump, TestTrigger::Reset].into_iter().collect();
        assert_eq!(permitted, expected);
    }

    #[test]
    fn reentry_runs_only_own_actions() {
        let f = fixture();

        assert_eq!(run(&f, f.leaf, f.leaf), vec!["exit LeftLeaf", "enter LeftLeaf"]);
    }

    #[test]
    fn sibling_transition_leaves_shared_superstate_alone() {
        let f = fixture();

        assert_eq!(run(&f, f.left, f.right), vec!["exit Left", "enter Right"]);
    }

    #[test]
    fn cousin_transition_unwinds_to_common_ancestor() {
        let f = fixture();

        assert_eq!(
            run(&f, f.leaf, f.right),
            vec!["exit LeftLeaf", "exit Left", "enter Right"]
        );
    }

    #[test]
    fn entering_nested_state_runs_outside_in() {
        let f = fixture();

        assert_eq!(
            run(&f, f.right, f.leaf),
            vec!["exit Right", "enter Left", "enter LeftLeaf"]
        );
    }

    #[test]
    fn moving_up_to_ancestor_skips_its_entry() {
        let f = fixture();

        assert_eq!(run(&f, f.leaf, f.root), vec!["exit LeftLeaf", "exit Left"]);
    }

    #[test]
    fn moving_down_from_ancestor_skips_its_exit() {
        let f = fixture();

        assert_eq!(run(&f, f.root, f.leaf), vec!["enter Left", "enter LeftLeaf"]);
    }

    #[test]
    fn failing_superstate_entry_aborts_inner_entry() {
        let mut f = fixture();
        f.graph
            .representation_mut(f.left)
            .add_entry_action(|_, _| Err(HsmError::action_failed("left refused")));

        let transition = Transition::new(TestState::Right, TestState::LeftLeaf, TestTrigger::Jump);
        let result = f.graph.state(f.leaf).enter(&transition, &[]);

        assert_eq!(result, Err(HsmError::action_failed("left refused")));
        assert_eq!(*f.log.lock().unwrap(), vec!["enter Left"]);
    }

    #[test]
    #[should_panic(expected = "is not in this graph")]
    fn foreign_id_panics() {
        let f = fixture();
        let other = StateGraph::<TestState, TestTrigger>::new();

        other.state(f.leaf);
    }
}
