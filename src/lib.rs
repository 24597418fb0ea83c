//! Substate: a hierarchical finite state machine library.
//!
//! A [`StateMachine`](core::StateMachine) owns named states, events, and
//! guarded transitions, and is driven synchronously by feeding it events. A
//! state may own a nested child machine that starts and stops in lock-step
//! with it and can receive propagated events, which is what makes the
//! machines hierarchical.
//!
//! # Core Concepts
//!
//! - **State**: named node with entry/exit callbacks and an optional child
//!   machine
//! - **Event**: named stimulus; equality is name-based
//! - **Transition**: guarded, optionally-actioned edge between states, in
//!   normal, re-entry, and internal variants
//! - **StateMachine**: the container that owns everything, tracks the
//!   current state, and runs the dispatch loop
//!
//! Every machine owns a default exit state named `NormalExitState`; arriving
//! at any exit state ends the run and fires the machine's exit notification.
//!
//! # Example
//!
//! ```rust
//! use substate::core::{Dispatch, Event, State, StateMachine};
//!
//! let mut machine: StateMachine<String> = StateMachine::new("door");
//! let closed = machine.add_state(State::new("closed"), true).unwrap();
//! let open = machine.add_state(State::new("open"), false).unwrap();
//!
//! let push = Event::new("push");
//! machine.add_event(push.clone());
//! machine.add_transition(closed, open, &push).unwrap();
//!
//! let payload = String::from("visitor");
//! machine.start(&payload).unwrap();
//! assert_eq!(
//!     machine.trigger_event(&push, &payload, false).unwrap(),
//!     Dispatch::Fired
//! );
//! assert_eq!(machine.current_state().unwrap().name(), "open");
//! ```

pub mod builder;
pub mod core;

// Re-export commonly used types
pub use self::builder::{BuildError, MachineBuilder, TransitionBuilder};
pub use self::core::{
    Dispatch, Event, Guard, History, MachineError, State, StateId, StateMachine, Transition,
    TransitionId, TransitionKind,
};
