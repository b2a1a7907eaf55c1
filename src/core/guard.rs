//! Guard predicates for trigger behaviours.
//!
//! A guard is a zero-argument boolean function captured when the graph is
//! configured. It is evaluated every time a trigger is resolved, so it can
//! read whatever shared state the caller closes over.

use std::fmt;

/// Predicate that enables or disables a trigger behaviour.
///
/// # Example
///
/// ```rust
/// use strata::core::Guard;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
///
/// let door_closed = Arc::new(AtomicBool::new(false));
/// let flag = Arc::clone(&door_closed);
/// let guard = Guard::new(move || flag.load(Ordering::SeqCst));
///
/// assert!(!guard.check());
/// door_closed.store(true, Ordering::SeqCst);
/// assert!(guard.check());
/// ```
pub struct Guard {
    predicate: Box<dyn Fn() -> bool + Send + Sync>,
}

impl Guard {
    /// Create a guard from a predicate function.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
        }
    }

    /// A guard that is always satisfied. Used for unconditional behaviours.
    pub fn always() -> Self {
        Self::new(|| true)
    }

    /// Evaluate the predicate.
    pub fn check(&self) -> bool {
        (self.predicate)()
    }
}

impl Default for Guard {
    fn default() -> Self {
        Self::always()
    }
}

impl fmt::Debug for Guard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}
