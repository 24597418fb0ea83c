//! Transitions: guarded, optionally-actioned edges between states.

use crate::core::callback::Callback;
use crate::core::event::Event;
use crate::core::guard::Guard;
use crate::core::state::StateId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle to a transition registered in a machine.
///
/// Issued by the `add_transition` family on
/// [`StateMachine`](crate::core::StateMachine); only meaningful for the
/// machine that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TransitionId(pub(crate) usize);

/// How a fired transition moves the machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransitionKind {
    /// Exit the source state, enter the destination state.
    Normal,
    /// Exit and re-enter the same state, re-running its callbacks.
    Reentry,
    /// Run only the guard and action; no entry or exit callbacks, no
    /// observable state movement.
    Null,
}

/// A guarded edge from a source state to a destination state, fired by an
/// event.
///
/// The (event, source, destination) triple is fixed at registration; the
/// guard and action can be attached afterwards through
/// [`StateMachine::transition_mut`](crate::core::StateMachine::transition_mut).
/// The event is matched by name, which is what lets propagated events resolve
/// against a nested machine's own event registrations.
pub struct Transition<P> {
    kind: TransitionKind,
    event: Event,
    source: StateId,
    destination: StateId,
    guard: Option<Guard<P>>,
    action: Option<Callback<P>>,
}

impl<P> Transition<P> {
    pub(crate) fn new(
        kind: TransitionKind,
        event: Event,
        source: StateId,
        destination: StateId,
    ) -> Self {
        Self {
            kind,
            event,
            source,
            destination,
            guard: None,
            action: None,
        }
    }

    /// The transition's behavior variant.
    pub fn kind(&self) -> TransitionKind {
        self.kind
    }

    /// The event that fires this transition.
    pub fn event(&self) -> &Event {
        &self.event
    }

    /// Handle of the source state.
    pub fn source(&self) -> StateId {
        self.source
    }

    /// Handle of the destination state.
    pub fn destination(&self) -> StateId {
        self.destination
    }

    /// Set the guard predicate, replacing any previous one.
    pub fn add_condition<F>(&mut self, predicate: F)
    where
        F: Fn(&P) -> bool + Send + Sync + 'static,
    {
        self.guard = Some(Guard::new(predicate));
    }

    /// Set the action, replacing any previous one. The action runs after the
    /// guard passes and before any exit/entry callbacks.
    pub fn add_action<F>(&mut self, action: F)
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        self.action = Some(Callback::new(action));
    }

    /// Install an already-built guard.
    pub fn set_guard(&mut self, guard: Guard<P>) {
        self.guard = Some(guard);
    }

    /// Install an already-built action.
    pub fn set_action(&mut self, action: Callback<P>) {
        self.action = Some(action);
    }

    pub(crate) fn permitted(&self, payload: &P) -> bool {
        self.guard.as_ref().map_or(true, |guard| guard.check(payload))
    }

    pub(crate) fn run_action(&self, payload: &P) {
        if let Some(action) = &self.action {
            action.call(payload);
        }
    }
}

impl<P> fmt::Debug for Transition<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("kind", &self.kind)
            .field("event", &self.event)
            .field("source", &self.source)
            .field("destination", &self.destination)
            .field("guard", &self.guard.is_some())
            .field("action", &self.action.is_some())
            .finish()
    }
}
