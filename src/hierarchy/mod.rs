//! The state hierarchy and its resolution algorithms.
//!
//! A [`StateGraph`] owns one [`StateRepresentation`] per state. Parents
//! hold the ids of their substates, children hold the id of their
//! superstate. Everything that walks the tree lives on [`StateRef`]:
//!
//! - trigger lookup that climbs from a state through its superstates
//! - containment queries up (`is_included_in`) and down (`includes`)
//! - `exit` / `enter` sequencing across the boundary of a transition
//! - permitted-trigger aggregation

mod error;
mod graph;
mod representation;

pub use error::{ActionResult, HsmError};
pub use graph::{StateGraph, StateId, StateRef};
pub use representation::{EntryAction, ExitAction, StateRepresentation};
