//! The state machine container and its dispatch loop.

use crate::core::callback::ExitCallback;
use crate::core::error::MachineError;
use crate::core::event::Event;
use crate::core::history::{History, TransitionRecord};
use crate::core::state::{State, StateId};
use crate::core::transition::{Transition, TransitionId, TransitionKind};
use chrono::Utc;
use std::fmt;

/// Outcome of a single [`StateMachine::trigger_event`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Dispatch {
    /// A transition matched the event and ran.
    Fired,
    /// A transition matched but its guard declined; the machine is unchanged.
    Rejected,
    /// No transition matched; the event was discarded.
    Ignored,
}

/// A state machine owning its states, events, and transitions.
///
/// States are registered by value and addressed through the
/// [`StateId`] handles that registration returns. A machine created with
/// [`StateMachine::new`] already owns one member: its default exit state,
/// named `NormalExitState`. Arriving at any exit state (by transition or by
/// [`StateMachine::stop`]) marks the machine as exited; it can be started
/// again afterwards.
///
/// Machines nest: a [`State`] may own a child machine, which is started and
/// stopped in lock-step with its state and can receive events through the
/// `propagate` flag of [`StateMachine::trigger_event`].
///
/// # Example
///
/// ```rust
/// use substate::core::{Dispatch, Event, State, StateMachine};
///
/// let mut order: StateMachine<u64> = StateMachine::new("order");
/// let created = order.add_state(State::new("created"), true).unwrap();
/// let paid = order.add_state(State::new("paid"), false).unwrap();
///
/// let pay = Event::new("PAY");
/// order.add_event(pay.clone());
/// let transition = order.add_transition(created, paid, &pay).unwrap();
/// order.transition_mut(transition).unwrap().add_condition(|amount| *amount > 0);
///
/// order.start(&0).unwrap();
/// assert_eq!(order.trigger_event(&pay, &0, false).unwrap(), Dispatch::Rejected);
/// assert_eq!(order.trigger_event(&pay, &25, false).unwrap(), Dispatch::Fired);
/// assert_eq!(order.current_state().unwrap().name(), "paid");
/// ```
pub struct StateMachine<P> {
    name: String,
    states: Vec<State<P>>,
    events: Vec<Event>,
    transitions: Vec<Transition<P>>,
    initial: Option<StateId>,
    current: Option<StateId>,
    exit_id: StateId,
    exit_callback: Option<ExitCallback<P>>,
    exited: bool,
    history: History,
}

impl<P> StateMachine<P> {
    /// Create an empty machine owning a freshly registered default exit
    /// state.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            states: vec![State::exit("Normal")],
            events: Vec::new(),
            transitions: Vec::new(),
            initial: None,
            current: None,
            exit_id: StateId(0),
            exit_callback: None,
            exited: true,
            history: History::new(),
        }
    }

    /// The machine's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The machine's own default exit state.
    pub fn exit_state(&self) -> &State<P> {
        &self.states[self.exit_id.0]
    }

    /// Handle of the machine's own default exit state.
    pub fn exit_state_id(&self) -> StateId {
        self.exit_id
    }

    /// The state the machine currently occupies, if it has been started.
    pub fn current_state(&self) -> Option<&State<P>> {
        self.current.map(|id| &self.states[id.0])
    }

    /// Handle of the current state, if the machine has been started.
    pub fn current_state_id(&self) -> Option<StateId> {
        self.current
    }

    /// Look up a registered state by handle.
    pub fn state(&self, id: StateId) -> Option<&State<P>> {
        self.states.get(id.0)
    }

    /// Mutable access to a registered state, e.g. to attach callbacks after
    /// registration.
    pub fn state_mut(&mut self, id: StateId) -> Option<&mut State<P>> {
        self.states.get_mut(id.0)
    }

    /// Look up a registered transition by handle.
    pub fn transition(&self, id: TransitionId) -> Option<&Transition<P>> {
        self.transitions.get(id.0)
    }

    /// Mutable access to a registered transition, e.g. to attach its guard
    /// or action.
    pub fn transition_mut(&mut self, id: TransitionId) -> Option<&mut Transition<P>> {
        self.transitions.get_mut(id.0)
    }

    /// The log of transitions this machine has fired.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Register a state. The first state registered with `initial = true`
    /// becomes the initial state; later `initial` flags are ignored.
    ///
    /// Fails with [`MachineError::DuplicateState`] if an equal (same-name)
    /// state is already a member.
    pub fn add_state(&mut self, state: State<P>, initial: bool) -> Result<StateId, MachineError> {
        if self.states.iter().any(|existing| existing == &state) {
            return Err(MachineError::DuplicateState {
                machine: self.name.clone(),
                state: state.name().to_string(),
            });
        }
        let id = StateId(self.states.len());
        self.states.push(state);
        if initial && self.initial.is_none() {
            self.initial = Some(id);
        }
        Ok(id)
    }

    /// Register an event. Duplicates are not rejected.
    pub fn add_event(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Register a transition from `source` to `destination` fired by
    /// `event`. Both states and the event must already be members of this
    /// machine.
    pub fn add_transition(
        &mut self,
        source: StateId,
        destination: StateId,
        event: &Event,
    ) -> Result<TransitionId, MachineError> {
        self.check_member(source)?;
        self.check_member(destination)?;
        self.check_event(event)?;
        Ok(self.push_transition(Transition::new(
            TransitionKind::Normal,
            event.clone(),
            source,
            destination,
        )))
    }

    /// Register a transition that exits and re-enters `state` when `event`
    /// fires.
    pub fn add_self_transition(
        &mut self,
        state: StateId,
        event: &Event,
    ) -> Result<TransitionId, MachineError> {
        self.check_member(state)?;
        self.check_event(event)?;
        Ok(self.push_transition(Transition::new(
            TransitionKind::Reentry,
            event.clone(),
            state,
            state,
        )))
    }

    /// Register a transition that runs only its guard and action when
    /// `event` fires in `state`; the machine does not move.
    pub fn add_null_transition(
        &mut self,
        state: StateId,
        event: &Event,
    ) -> Result<TransitionId, MachineError> {
        self.check_member(state)?;
        self.check_event(event)?;
        Ok(self.push_transition(Transition::new(
            TransitionKind::Null,
            event.clone(),
            state,
            state,
        )))
    }

    /// Set the exit-notification callback, replacing any previous one.
    ///
    /// The callback is invoked with the exit state reached and the payload of
    /// the event that drove the machine there, at most once per run.
    pub fn on_exit<F>(&mut self, callback: F)
    where
        F: Fn(&State<P>, &P) + Send + Sync + 'static,
    {
        self.exit_callback = Some(ExitCallback::new(callback));
    }

    /// Start the machine: move to the initial state and enter it, cascading
    /// into any nested child machine.
    pub fn start(&mut self, payload: &P) -> Result<(), MachineError> {
        let initial = match self.initial {
            Some(id) => id,
            None => return Err(self.no_initial_state()),
        };
        self.current = Some(initial);
        self.exited = false;
        self.states[initial.0].start(payload)
    }

    /// Stop the machine: leave the current state (cascading into any nested
    /// child machine) and park on the default exit state.
    ///
    /// Stopping does not invoke the exit-notification callback; only
    /// arriving at an exit state through a transition does.
    pub fn stop(&mut self, payload: &P) -> Result<(), MachineError> {
        if self.initial.is_none() {
            return Err(self.no_initial_state());
        }
        let current = match self.current {
            Some(id) => id,
            None => return Err(self.not_started()),
        };
        self.states[current.0].stop(payload)?;
        self.current = Some(self.exit_id);
        self.exited = true;
        Ok(())
    }

    /// True while the machine occupies a state that is not an exit state.
    pub fn is_running(&self) -> bool {
        self.current
            .map_or(false, |id| !self.states[id.0].is_exit())
    }

    /// Feed an event into the machine.
    ///
    /// With `propagate` set and a child machine installed on the current
    /// state, the call is forwarded unchanged to the child and this
    /// machine's own transition table is not consulted; the child's outcome
    /// is returned. With `propagate` set but no child machine present, the
    /// event falls through to this machine's own table.
    ///
    /// Otherwise the transition list is scanned in registration order for
    /// the first entry matching (current state, event). A match fires: the
    /// guard is consulted first, and if it passes the current state advances
    /// to the destination before the action and any exit/entry callbacks
    /// run. An event with no matching transition is discarded with a warning
    /// diagnostic.
    pub fn trigger_event(
        &mut self,
        event: &Event,
        payload: &P,
        propagate: bool,
    ) -> Result<Dispatch, MachineError> {
        if self.initial.is_none() {
            return Err(self.no_initial_state());
        }
        let current = match self.current {
            Some(id) => id,
            None => return Err(self.not_started()),
        };

        if propagate && self.states[current.0].has_child() {
            tracing::debug!(
                "machine '{}' propagating event '{}' to the child of state '{}'",
                self.name,
                event.name(),
                self.states[current.0].name()
            );
            if let Some(child) = self.states[current.0].child_mut() {
                return child.trigger_event(event, payload, propagate);
            }
        }

        let matched = self
            .transitions
            .iter()
            .position(|transition| transition.source() == current && transition.event() == event);

        match matched {
            Some(index) => self.fire(index, payload),
            None => {
                tracing::warn!(
                    "event '{}' is not valid in state '{}' of machine '{}'",
                    event.name(),
                    self.states[current.0].name(),
                    self.name
                );
                Ok(Dispatch::Ignored)
            }
        }
    }

    fn fire(&mut self, index: usize, payload: &P) -> Result<Dispatch, MachineError> {
        let kind = self.transitions[index].kind();
        let source = self.transitions[index].source();
        let destination = self.transitions[index].destination();

        if !self.transitions[index].permitted(payload) {
            tracing::debug!(
                "guard rejected event '{}' in state '{}' of machine '{}'",
                self.transitions[index].event().name(),
                self.states[source.0].name(),
                self.name
            );
            return Ok(Dispatch::Rejected);
        }

        tracing::info!(
            "machine '{}': {:?} transition '{}' -> '{}' on event '{}'",
            self.name,
            kind,
            self.states[source.0].name(),
            self.states[destination.0].name(),
            self.transitions[index].event().name()
        );

        self.current = Some(destination);
        self.transitions[index].run_action(payload);

        match kind {
            TransitionKind::Normal => {
                self.states[source.0].stop(payload)?;
                self.states[destination.0].start(payload)?;
            }
            TransitionKind::Reentry => {
                self.states[source.0].stop(payload)?;
                self.states[source.0].start(payload)?;
            }
            TransitionKind::Null => {}
        }

        self.history.record(TransitionRecord {
            from: self.states[source.0].name().to_string(),
            to: self.states[destination.0].name().to_string(),
            event: self.transitions[index].event().name().to_string(),
            kind,
            timestamp: Utc::now(),
        });

        self.notify_exit(payload);
        Ok(Dispatch::Fired)
    }

    fn notify_exit(&mut self, payload: &P) {
        let current = match self.current {
            Some(id) => id,
            None => return,
        };
        if self.states[current.0].is_exit() && self.exit_callback.is_some() && !self.exited {
            self.exited = true;
            if let Some(callback) = &self.exit_callback {
                callback.call(&self.states[current.0], payload);
            }
        }
    }

    fn check_member(&self, id: StateId) -> Result<(), MachineError> {
        if id.0 < self.states.len() {
            Ok(())
        } else {
            Err(MachineError::UnknownState {
                machine: self.name.clone(),
            })
        }
    }

    fn check_event(&self, event: &Event) -> Result<(), MachineError> {
        if self.events.contains(event) {
            Ok(())
        } else {
            Err(MachineError::UnknownEvent {
                machine: self.name.clone(),
                event: event.name().to_string(),
            })
        }
    }

    fn push_transition(&mut self, transition: Transition<P>) -> TransitionId {
        let id = TransitionId(self.transitions.len());
        self.transitions.push(transition);
        id
    }

    fn no_initial_state(&self) -> MachineError {
        MachineError::NoInitialState {
            machine: self.name.clone(),
        }
    }

    fn not_started(&self) -> MachineError {
        MachineError::NotStarted {
            machine: self.name.clone(),
        }
    }
}

impl<P> PartialEq for StateMachine<P> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<P> Eq for StateMachine<P> {}

impl<P> fmt::Debug for StateMachine<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("name", &self.name)
            .field("states", &self.states.len())
            .field("events", &self.events.len())
            .field("transitions", &self.transitions.len())
            .field("initial", &self.initial)
            .field("current", &self.current)
            .field("exited", &self.exited)
            .finish()
    }
}
