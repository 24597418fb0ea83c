//! Build errors for the fluent assembly API.

use crate::core::MachineError;
use thiserror::Error;

/// Errors that can occur while assembling a machine from a description.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("initial state not specified; call .initial(state) before .build()")]
    MissingInitialState,

    #[error("transition source state not specified; call .from(name)")]
    MissingSourceState,

    #[error("transition target state not specified; call .to(name)")]
    MissingTargetState,

    #[error("transition event not specified; call .on(name)")]
    MissingEvent,

    #[error("transition references unknown state '{name}'")]
    UnknownState { name: String },

    #[error("transition references unknown event '{name}'")]
    UnknownEvent { name: String },

    #[error(transparent)]
    Machine(#[from] MachineError),
}
