//! Builder for assembling state machines by name.

use crate::builder::error::BuildError;
use crate::builder::transition::{TransitionBuilder, TransitionDef};
use crate::core::{Event, MachineError, State, StateMachine, TransitionKind};
use std::collections::HashMap;

/// Fluent builder assembling a [`StateMachine`] from named parts.
///
/// States, events, and transitions are collected first and wired together at
/// [`MachineBuilder::build`] time, when transition definitions are resolved
/// against the registered names.
///
/// # Example
///
/// ```rust
/// use substate::builder::{MachineBuilder, TransitionBuilder};
/// use substate::core::State;
///
/// let mut machine = MachineBuilder::new("door")
///     .initial(State::new("closed"))
///     .state(State::new("open"))
///     .event("push")
///     .transition(TransitionBuilder::new().from("closed").to("open").on("push"))
///     .unwrap()
///     .build()
///     .unwrap();
///
/// machine.start(&()).unwrap();
/// assert_eq!(machine.current_state().unwrap().name(), "closed");
/// ```
pub struct MachineBuilder<P> {
    name: String,
    states: Vec<(State<P>, bool)>,
    events: Vec<Event>,
    transitions: Vec<TransitionDef<P>>,
}

impl<P> MachineBuilder<P> {
    /// Create a builder for a machine with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            states: Vec::new(),
            events: Vec::new(),
            transitions: Vec::new(),
        }
    }

    /// Add a state and designate it the initial state.
    pub fn initial(mut self, state: State<P>) -> Self {
        self.states.push((state, true));
        self
    }

    /// Add a state.
    pub fn state(mut self, state: State<P>) -> Self {
        self.states.push((state, false));
        self
    }

    /// Register an event.
    pub fn event(mut self, event: impl Into<Event>) -> Self {
        self.events.push(event.into());
        self
    }

    /// Add a transition using a builder. Returns an error if the builder
    /// fails validation.
    pub fn transition(mut self, builder: TransitionBuilder<P>) -> Result<Self, BuildError> {
        self.transitions.push(builder.build()?);
        Ok(self)
    }

    /// Build the machine: register every part and resolve transition names.
    pub fn build(self) -> Result<StateMachine<P>, BuildError> {
        let MachineBuilder {
            name,
            states,
            events,
            transitions,
        } = self;

        if !states.iter().any(|(_, initial)| *initial) {
            return Err(BuildError::MissingInitialState);
        }

        let mut machine = StateMachine::new(name);
        let mut ids = HashMap::new();
        // The machine's own exit state is addressable by name like any
        // registered member.
        ids.insert(
            machine.exit_state().name().to_string(),
            machine.exit_state_id(),
        );
        for (state, initial) in states {
            let state_name = state.name().to_string();
            let id = machine.add_state(state, initial)?;
            ids.insert(state_name, id);
        }
        for event in events {
            machine.add_event(event);
        }

        for def in transitions {
            let source = *ids.get(&def.source).ok_or_else(|| BuildError::UnknownState {
                name: def.source.clone(),
            })?;
            let destination =
                *ids.get(&def.destination)
                    .ok_or_else(|| BuildError::UnknownState {
                        name: def.destination.clone(),
                    })?;
            let event = Event::new(def.event.clone());

            let id = match def.kind {
                TransitionKind::Normal => machine.add_transition(source, destination, &event),
                TransitionKind::Reentry => machine.add_self_transition(source, &event),
                TransitionKind::Null => machine.add_null_transition(source, &event),
            }
            .map_err(|error| match error {
                MachineError::UnknownEvent { .. } => BuildError::UnknownEvent {
                    name: def.event.clone(),
                },
                other => BuildError::Machine(other),
            })?;

            if let Some(transition) = machine.transition_mut(id) {
                if let Some(guard) = def.guard {
                    transition.set_guard(guard);
                }
                if let Some(action) = def.action {
                    transition.set_action(action);
                }
            }
        }

        Ok(machine)
    }
}
