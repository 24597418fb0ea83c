//! Fluent assembly API for state machines.
//!
//! This module layers a name-based, declarative construction style over the
//! handle-based registration methods of
//! [`StateMachine`](crate::core::StateMachine): collect states, events, and
//! transition definitions, then resolve everything at build time.

pub mod error;
pub mod machine;
pub mod transition;

pub use error::BuildError;
pub use machine::MachineBuilder;
pub use transition::{TransitionBuilder, TransitionDef};

/// Shorthand for a normal transition description.
///
/// Equivalent to `TransitionBuilder::new().from(from).to(to).on(on)`.
pub fn transition<P>(from: &str, to: &str, on: &str) -> TransitionBuilder<P> {
    TransitionBuilder::new().from(from).to(to).on(on)
}

/// Shorthand for an internal transition description: guard and action only,
/// no state movement.
pub fn internal<P>(state: &str, on: &str) -> TransitionBuilder<P> {
    TransitionBuilder::new().from(state).on(on).internal()
}
