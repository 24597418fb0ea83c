//! Engine error types.

use thiserror::Error;

/// Errors surfaced by state machine assembly and execution.
#[derive(Debug, Error)]
pub enum MachineError {
    #[error("machine '{machine}' has no initial state")]
    NoInitialState { machine: String },

    #[error("machine '{machine}' has not been started")]
    NotStarted { machine: String },

    #[error("state '{state}' is already registered in machine '{machine}'")]
    DuplicateState { machine: String, state: String },

    #[error("state handle does not belong to machine '{machine}'")]
    UnknownState { machine: String },

    #[error("transition handle does not belong to machine '{machine}'")]
    UnknownTransition { machine: String },

    #[error("event '{event}' is not registered in machine '{machine}'")]
    UnknownEvent { machine: String, event: String },
}
