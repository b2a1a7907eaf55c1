//! Strata: the resolution engine of a hierarchical state machine
//!
//! Given the current state, a fired trigger and the guards configured on
//! the hierarchy, strata decides which trigger behaviour applies and runs
//! the exit and entry actions for exactly the states a transition leaves
//! and enters.
//!
//! # Core Concepts
//!
//! - **State / Trigger**: value-comparable identities via the `State` and
//!   `Trigger` traits
//! - **Guards**: zero-argument predicates that enable trigger behaviours
//! - **Hierarchy**: an arena of states with superstate/substate links,
//!   where substates inherit the triggers of their ancestors
//!
//! Holding the current state and driving a fire loop is left to the
//! caller.
//!
//! # Example
//!
//! ```rust
//! use strata::{state_enum, trigger_enum};
//! use strata::core::{Transition, TriggerBehaviour};
//! use strata::hierarchy::StateGraph;
//!
//! state_enum! {
//!     enum Player { Stopped, Playing, Paused }
//! }
//!
//! trigger_enum! {
//!     enum Button { Play, Pause, Stop }
//! }
//!
//! let mut graph = StateGraph::new();
//! let stopped = graph.add_state(Player::Stopped).unwrap();
//! let playing = graph.add_state(Player::Playing).unwrap();
//! let paused = graph.add_state(Player::Paused).unwrap();
//! graph.set_superstate(paused, playing).unwrap();
//!
//! graph
//!     .representation_mut(stopped)
//!     .add_trigger_behaviour(TriggerBehaviour::permit(Button::Play, Player::Playing));
//! graph
//!     .representation_mut(playing)
//!     .add_trigger_behaviour(TriggerBehaviour::permit(Button::Stop, Player::Stopped));
//! graph
//!     .representation_mut(playing)
//!     .add_trigger_behaviour(TriggerBehaviour::permit(Button::Pause, Player::Paused));
//!
//! // Paused inherits Stop from Playing.
//! let current = graph.state(paused);
//! let handler = current.try_find_handler(&Button::Stop).unwrap().unwrap();
//! let destination = handler
//!     .results_in_transition_from(current.underlying_state(), &[])
//!     .unwrap();
//!
//! let transition = Transition::new(Player::Paused, destination, Button::Stop);
//! current.exit(&transition).unwrap();
//! graph.state(stopped).enter(&transition, &[]).unwrap();
//! ```

pub mod core;
pub mod hierarchy;
mod macros;

// Re-export commonly used types
pub use crate::core::{Guard, State, Transition, Trigger, TriggerBehaviour};
pub use hierarchy::{HsmError, StateGraph, StateId, StateRef, StateRepresentation};
