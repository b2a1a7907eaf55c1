//! Identity traits for states and triggers.
//!
//! The hierarchy never looks inside a state or trigger. It only compares
//! them by value, hashes triggers to key the behaviour table, and asks for
//! a display name when reporting configuration errors.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state identities.
///
/// # Required Traits
///
/// - `Clone`: transitions carry owned copies of their source and destination
/// - `PartialEq`: containment queries compare states by value
/// - `Debug`: states must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: transitions can be recorded by the caller
///
/// # Example
///
/// ```rust
/// use strata::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum Phone {
///     OffHook,
///     Ringing,
///     Connected,
/// }
///
/// impl State for Phone {
///     fn name(&self) -> &str {
///         match self {
///             Self::OffHook => "OffHook",
///             Self::Ringing => "Ringing",
///             Self::Connected => "Connected",
///         }
///     }
/// }
///
/// assert_eq!(Phone::Ringing.name(), "Ringing");
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;
}

/// Trait for trigger identities.
///
/// Triggers key each state's behaviour table, so on top of the [`State`]
/// requirements they must be `Eq + Hash`.
pub trait Trigger:
    Clone + Eq + Hash + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Get the trigger's name for display/logging.
    fn name(&self) -> &str;
}
