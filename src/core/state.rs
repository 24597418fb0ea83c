//! States: named nodes with lifecycle callbacks and optional nested machines.

use crate::core::callback::Callback;
use crate::core::error::MachineError;
use crate::core::machine::StateMachine;
use std::fmt;

/// Opaque handle to a state registered in a machine.
///
/// Handles are issued by [`StateMachine::add_state`] and are only meaningful
/// for the machine that issued them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StateId(pub(crate) usize);

#[derive(Clone, Debug, PartialEq, Eq)]
enum StateKind {
    Normal,
    Exit { status: String },
}

/// A named node in a state machine graph.
///
/// A state carries ordered entry and exit callback lists and may own a nested
/// child machine. The child machine is started and stopped in lock-step with
/// the state and can receive propagated events while the state is current.
///
/// Equality is name-based, like [`Event`](crate::core::Event) equality.
///
/// # Example
///
/// ```rust
/// use substate::core::State;
///
/// let mut idle: State<u32> = State::new("idle");
/// idle.on_entry(|ticks| println!("idle after {ticks} ticks"));
///
/// assert_eq!(idle.name(), "idle");
/// assert!(!idle.has_child());
/// ```
pub struct State<P> {
    name: String,
    kind: StateKind,
    entry_callbacks: Vec<Callback<P>>,
    exit_callbacks: Vec<Callback<P>>,
    child: Option<StateMachine<P>>,
}

impl<P> State<P> {
    /// Create a state with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: StateKind::Normal,
            entry_callbacks: Vec::new(),
            exit_callbacks: Vec::new(),
            child: None,
        }
    }

    /// Create an exit sentinel named `"<status>ExitState"`.
    ///
    /// A machine arriving at any exit sentinel is considered exited. Every
    /// machine registers its own `State::exit("Normal")` at construction;
    /// additional sentinels with other status labels can be registered to
    /// model distinct exit reasons.
    pub fn exit(status: impl Into<String>) -> Self {
        let status = status.into();
        Self {
            name: format!("{status}ExitState"),
            kind: StateKind::Exit { status },
            entry_callbacks: Vec::new(),
            exit_callbacks: Vec::new(),
            child: None,
        }
    }

    /// The state's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True for exit sentinels created with [`State::exit`].
    pub fn is_exit(&self) -> bool {
        matches!(self.kind, StateKind::Exit { .. })
    }

    /// The status label of an exit sentinel, if this is one.
    pub fn exit_status(&self) -> Option<&str> {
        match &self.kind {
            StateKind::Exit { status } => Some(status),
            StateKind::Normal => None,
        }
    }

    /// Append an entry callback. Callbacks run in registration order and are
    /// not de-duplicated.
    pub fn on_entry<F>(&mut self, callback: F)
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        self.entry_callbacks.push(Callback::new(callback));
    }

    /// Append an exit callback. Callbacks run in registration order and are
    /// not de-duplicated.
    pub fn on_exit<F>(&mut self, callback: F)
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        self.exit_callbacks.push(Callback::new(callback));
    }

    /// Install a nested child machine, replacing any previous one.
    pub fn set_child(&mut self, machine: StateMachine<P>) {
        self.child = Some(machine);
    }

    /// Builder-style variant of [`State::set_child`].
    pub fn with_child(mut self, machine: StateMachine<P>) -> Self {
        self.child = Some(machine);
        self
    }

    /// True if a child machine is installed.
    pub fn has_child(&self) -> bool {
        self.child.is_some()
    }

    /// The nested child machine, if any.
    pub fn child(&self) -> Option<&StateMachine<P>> {
        self.child.as_ref()
    }

    /// Mutable access to the nested child machine, if any.
    pub fn child_mut(&mut self) -> Option<&mut StateMachine<P>> {
        self.child.as_mut()
    }

    /// Enter the state: run entry callbacks in order, then start the child
    /// machine if one is installed.
    pub fn start(&mut self, payload: &P) -> Result<(), MachineError> {
        tracing::debug!("entering state '{}'", self.name);
        for callback in &self.entry_callbacks {
            callback.call(payload);
        }
        if let Some(child) = &mut self.child {
            child.start(payload)?;
        }
        Ok(())
    }

    /// Leave the state: run exit callbacks in order, then stop the child
    /// machine if one is installed.
    pub fn stop(&mut self, payload: &P) -> Result<(), MachineError> {
        tracing::debug!("exiting state '{}'", self.name);
        for callback in &self.exit_callbacks {
            callback.call(payload);
        }
        if let Some(child) = &mut self.child {
            child.stop(payload)?;
        }
        Ok(())
    }
}

impl<P> PartialEq for State<P> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<P> Eq for State<P> {}

impl<P> fmt::Debug for State<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("entry_callbacks", &self.entry_callbacks.len())
            .field("exit_callbacks", &self.exit_callbacks.len())
            .field("child", &self.child.as_ref().map(|machine| machine.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn equality_is_name_based() {
        let first: State<u32> = State::new("idle");
        let second: State<u32> = State::new("idle");
        let other: State<u32> = State::new("busy");

        assert_eq!(first, second);
        assert_ne!(first, other);
    }

    #[test]
    fn exit_sentinel_name_is_status_qualified() {
        let normal: State<u32> = State::exit("Normal");
        let error: State<u32> = State::exit("Error");

        assert_eq!(normal.name(), "NormalExitState");
        assert_eq!(error.name(), "ErrorExitState");
        assert!(error.is_exit());
        assert_eq!(error.exit_status(), Some("Error"));
    }

    #[test]
    fn plain_states_are_not_exit_sentinels() {
        let state: State<u32> = State::new("idle");
        assert!(!state.is_exit());
        assert_eq!(state.exit_status(), None);
    }

    #[test]
    fn entry_callbacks_run_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut state: State<String> = State::new("idle");

        for label in ["first", "second", "third"] {
            let sink = Arc::clone(&order);
            state.on_entry(move |_| sink.lock().unwrap().push(label));
        }

        state.start(&String::from("data")).unwrap();

        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn exit_callbacks_receive_the_payload() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut state: State<String> = State::new("idle");
        state.on_exit(move |payload| sink.lock().unwrap().push(payload.clone()));

        state.stop(&String::from("data")).unwrap();

        assert_eq!(*seen.lock().unwrap(), vec![String::from("data")]);
    }

    #[test]
    fn duplicate_callbacks_are_not_deduplicated() {
        let count = Arc::new(Mutex::new(0));
        let mut state: State<u32> = State::new("idle");
        for _ in 0..2 {
            let counter = Arc::clone(&count);
            state.on_entry(move |_| *counter.lock().unwrap() += 1);
        }

        state.start(&0).unwrap();

        assert_eq!(*count.lock().unwrap(), 2);
    }

    #[test]
    fn child_machine_accessors() {
        let child: StateMachine<u32> = StateMachine::new("child");
        let state = State::new("parent").with_child(child);

        assert!(state.has_child());
        assert_eq!(state.child().unwrap().name(), "child");
    }
}
