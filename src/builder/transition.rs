//! Builder for transition definitions.

use crate::builder::error::BuildError;
use crate::core::{Callback, Guard, TransitionKind};

/// A named transition description, resolved against the machine's members by
/// [`MachineBuilder::build`](crate::builder::MachineBuilder::build).
pub struct TransitionDef<P> {
    pub(crate) kind: TransitionKind,
    pub(crate) source: String,
    pub(crate) destination: String,
    pub(crate) event: String,
    pub(crate) guard: Option<Guard<P>>,
    pub(crate) action: Option<Callback<P>>,
}

/// Fluent builder for [`TransitionDef`]s.
///
/// `from` and `on` are required; `to` is required for normal transitions and
/// ignored by the `reentering`/`internal` variants, which loop on the source
/// state.
pub struct TransitionBuilder<P> {
    kind: TransitionKind,
    source: Option<String>,
    destination: Option<String>,
    event: Option<String>,
    guard: Option<Guard<P>>,
    action: Option<Callback<P>>,
}

impl<P> TransitionBuilder<P> {
    /// Create a builder for a normal transition.
    pub fn new() -> Self {
        Self {
            kind: TransitionKind::Normal,
            source: None,
            destination: None,
            event: None,
            guard: None,
            action: None,
        }
    }

    /// Set the source state by name (required).
    pub fn from(mut self, name: impl Into<String>) -> Self {
        self.source = Some(name.into());
        self
    }

    /// Set the target state by name (required for normal transitions).
    pub fn to(mut self, name: impl Into<String>) -> Self {
        self.destination = Some(name.into());
        self
    }

    /// Set the triggering event by name (required).
    pub fn on(mut self, name: impl Into<String>) -> Self {
        self.event = Some(name.into());
        self
    }

    /// Make this a re-entry transition: the source state is exited and
    /// entered again, re-running its callbacks.
    pub fn reentering(mut self) -> Self {
        self.kind = TransitionKind::Reentry;
        self
    }

    /// Make this an internal transition: only the guard and action run; the
    /// machine does not move.
    pub fn internal(mut self) -> Self {
        self.kind = TransitionKind::Null;
        self
    }

    /// Add a guard predicate (optional).
    pub fn when<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&P) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(predicate));
        self
    }

    /// Add an action (optional).
    pub fn then<F>(mut self, action: F) -> Self
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        self.action = Some(Callback::new(action));
        self
    }

    /// Build the definition.
    pub fn build(self) -> Result<TransitionDef<P>, BuildError> {
        let source = self.source.ok_or(BuildError::MissingSourceState)?;
        let event = self.event.ok_or(BuildError::MissingEvent)?;
        let destination = match self.kind {
            TransitionKind::Normal => self.destination.ok_or(BuildError::MissingTargetState)?,
            TransitionKind::Reentry | TransitionKind::Null => source.clone(),
        };

        Ok(TransitionDef {
            kind: self.kind,
            source,
            destination,
            event,
            guard: self.guard,
            action: self.action,
        })
    }
}

impl<P> Default for TransitionBuilder<P> {
    fn default() -> Self {
        Self::new()
    }
}
