//! Guard predicates for controlling state transitions.

/// Predicate deciding whether a transition may fire.
///
/// A guard is evaluated against the caller-supplied payload before anything
/// else happens. If it returns `false` the transition is rejected: no action
/// runs, no entry or exit callback runs, and the machine's current state is
/// left untouched.
///
/// # Example
///
/// ```rust
/// use substate::core::Guard;
///
/// let positive = Guard::new(|amount: &i64| *amount > 0);
///
/// assert!(positive.check(&10));
/// assert!(!positive.check(&-3));
/// ```
pub struct Guard<P> {
    predicate: Box<dyn Fn(&P) -> bool + Send + Sync>,
}

impl<P> Guard<P> {
    /// Create a guard from a predicate over the payload.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&P) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Box::new(predicate),
        }
    }

    /// Evaluate the guard against the payload.
    pub fn check(&self, payload: &P) -> bool {
        (self.predicate)(payload)
    }
}
