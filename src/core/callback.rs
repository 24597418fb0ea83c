//! Callback capability types invoked by the engine.
//!
//! Every hook the engine runs is a small wrapper around a boxed closure with
//! a single invocation method taking the opaque caller payload. The payload
//! is threaded through unchanged; the engine never inspects it.

use crate::core::state::State;

/// A hook invoked with the caller payload.
///
/// Used for state entry callbacks, state exit callbacks, and transition
/// actions.
pub struct Callback<P> {
    hook: Box<dyn Fn(&P) + Send + Sync>,
}

impl<P> Callback<P> {
    /// Wrap a closure as a callback.
    pub fn new<F>(hook: F) -> Self
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        Self {
            hook: Box::new(hook),
        }
    }

    /// Invoke the callback with the payload.
    pub fn call(&self, payload: &P) {
        (self.hook)(payload)
    }
}

/// Notification invoked when a machine arrives at an exit state.
///
/// Receives the exit state that was reached along with the payload of the
/// event that drove the machine there. Fires at most once per run.
pub struct ExitCallback<P> {
    hook: Box<dyn Fn(&State<P>, &P) + Send + Sync>,
}

impl<P> ExitCallback<P> {
    /// Wrap a closure as an exit notification.
    pub fn new<F>(hook: F) -> Self
    where
        F: Fn(&State<P>, &P) + Send + Sync + 'static,
    {
        Self {
            hook: Box::new(hook),
        }
    }

    /// Invoke the notification.
    pub fn call(&self, exit_state: &State<P>, payload: &P) {
        (self.hook)(exit_state, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[test]
    fn callback_receives_the_payload() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback = Callback::new(move |payload: &String| {
            sink.lock().unwrap().push(payload.clone());
        });

        callback.call(&String::from("data"));

        assert_eq!(*seen.lock().unwrap(), vec![String::from("data")]);
    }

    #[test]
    fn callback_can_run_repeatedly() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&count);
        let callback = Callback::new(move |_: &u32| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        callback.call(&1);
        callback.call(&2);

        assert_eq!(count.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn exit_callback_receives_state_and_payload() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback = ExitCallback::new(move |state: &State<u32>, payload: &u32| {
            sink.lock().unwrap().push((state.name().to_string(), *payload));
        });

        callback.call(&State::exit("Error"), &7);

        assert_eq!(
            *seen.lock().unwrap(),
            vec![(String::from("ErrorExitState"), 7)]
        );
    }
}
