//! Transition history tracking.

use crate::core::transition::TransitionKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Record of a single fired transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Name of the state the machine left.
    pub from: String,
    /// Name of the state the machine arrived at.
    pub to: String,
    /// Name of the event that fired the transition.
    pub event: String,
    /// The transition's behavior variant.
    pub kind: TransitionKind,
    /// When the transition fired.
    pub timestamp: DateTime<Utc>,
}

/// Ordered log of the transitions a machine has fired.
///
/// Each machine owns one history; nested machines keep their own. The log
/// accumulates across runs and is never cleared by `start`.
///
/// # Example
///
/// ```rust
/// use substate::core::{Event, State, StateMachine};
///
/// let mut machine: StateMachine<()> = StateMachine::new("m");
/// let a = machine.add_state(State::new("a"), true).unwrap();
/// let b = machine.add_state(State::new("b"), false).unwrap();
/// let go = Event::new("go");
/// machine.add_event(go.clone());
/// machine.add_transition(a, b, &go).unwrap();
///
/// machine.start(&()).unwrap();
/// machine.trigger_event(&go, &(), false).unwrap();
///
/// assert_eq!(machine.history().path(), vec!["a", "b"]);
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct History {
    records: Vec<TransitionRecord>,
}

impl History {
    /// Create an empty history.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, record: TransitionRecord) {
        self.records.push(record);
    }

    /// All recorded transitions in firing order.
    pub fn records(&self) -> &[TransitionRecord] {
        &self.records
    }

    /// The sequence of state names traversed: the first record's source
    /// followed by each record's destination.
    pub fn path(&self) -> Vec<&str> {
        let mut path = Vec::new();
        if let Some(first) = self.records.first() {
            path.push(first.from.as_str());
        }
        for record in &self.records {
            path.push(record.to.as_str());
        }
        path
    }

    /// Elapsed time between the first and last record, if any.
    pub fn duration(&self) -> Option<Duration> {
        match (self.records.first(), self.records.last()) {
            (Some(first), Some(last)) => last
                .timestamp
                .signed_duration_since(first.timestamp)
                .to_std()
                .ok(),
            _ => None,
        }
    }

    /// Number of recorded transitions.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Export the log as a JSON value.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}
