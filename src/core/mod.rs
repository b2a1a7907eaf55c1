//! Identity traits and the values the hierarchy consumes.
//!
//! - State and trigger identities via the `State` and `Trigger` traits
//! - Guard predicates for trigger behaviours
//! - The closed `TriggerBehaviour` variant type
//! - The immutable `Transition` value handed to entry and exit actions

mod behaviour;
mod guard;
mod state;
mod transition;

pub use behaviour::{DestinationSelector, TriggerBehaviour};
pub use guard::Guard;
pub use state::{State, Trigger};
pub use transition::Transition;
