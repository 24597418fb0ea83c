//! Property-based tests for the hierarchical state machine engine.
//!
//! These tests use proptest to verify dispatch invariants hold across many
//! randomly generated machine shapes, payloads, and event sequences.

use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use substate::core::{Dispatch, Event, History, State, StateMachine};

/// Build a linear machine s0 -> s1 -> ... -> s{count-1}, where event `e{i}`
/// moves the machine from `s{i-1}` to `s{i}`.
fn chain_machine(count: usize) -> StateMachine<u32> {
    let mut machine = StateMachine::new("chain");
    let mut previous = None;
    for index in 0..count {
        let id = machine
            .add_state(State::new(format!("s{index}")), index == 0)
            .unwrap();
        if let Some(source) = previous {
            let event = Event::new(format!("e{index}"));
            machine.add_event(event.clone());
            machine.add_transition(source, id, &event).unwrap();
        }
        previous = Some(id);
    }
    machine
}

proptest! {
    #[test]
    fn event_equality_is_name_based(name in "[a-z]{1,12}") {
        prop_assert_eq!(Event::new(name.clone()), Event::from(name.as_str()));
    }

    #[test]
    fn exit_state_names_are_status_qualified(status in "[A-Za-z]{1,10}") {
        let state: State<u32> = State::exit(status.clone());
        prop_assert_eq!(state.name(), format!("{status}ExitState").as_str());
        prop_assert_eq!(state.exit_status(), Some(status.as_str()));
    }

    #[test]
    fn chain_machine_walks_to_the_end(count in 2..8usize) {
        let mut machine = chain_machine(count);
        machine.start(&0).unwrap();

        for index in 1..count {
            let outcome = machine
                .trigger_event(&Event::new(format!("e{index}")), &0, false)
                .unwrap();
            prop_assert_eq!(outcome, Dispatch::Fired);
        }

        let last = format!("s{}", count - 1);
        prop_assert_eq!(machine.current_state().unwrap().name(), last.as_str());
        prop_assert_eq!(machine.history().len(), count - 1);

        let expected: Vec<String> = (0..count).map(|index| format!("s{index}")).collect();
        let path: Vec<String> = machine
            .history()
            .path()
            .into_iter()
            .map(String::from)
            .collect();
        prop_assert_eq!(path, expected);
    }

    #[test]
    fn unknown_events_never_move_the_machine(count in 2..8usize, name in "[a-z]{1,8}") {
        let mut machine = chain_machine(count);
        machine.start(&0).unwrap();

        // Registered events are all named e{i}; the x_ prefix cannot match.
        let outcome = machine
            .trigger_event(&Event::new(format!("x_{name}")), &0, false)
            .unwrap();

        prop_assert_eq!(outcome, Dispatch::Ignored);
        prop_assert_eq!(machine.current_state().unwrap().name(), "s0");
        prop_assert!(machine.history().is_empty());
    }

    #[test]
    fn rejected_guard_pins_the_current_state(payload in any::<u32>()) {
        let mut machine: StateMachine<u32> = StateMachine::new("m");
        let a = machine.add_state(State::new("a"), true).unwrap();
        let b = machine.add_state(State::new("b"), false).unwrap();
        let go = Event::new("go");
        machine.add_event(go.clone());
        let transition = machine.add_transition(a, b, &go).unwrap();
        machine.transition_mut(transition).unwrap().add_condition(|_| false);

        machine.start(&payload).unwrap();
        let outcome = machine.trigger_event(&go, &payload, false).unwrap();

        prop_assert_eq!(outcome, Dispatch::Rejected);
        prop_assert_eq!(machine.current_state_id(), Some(a));
        prop_assert!(machine.history().is_empty());
    }

    #[test]
    fn guard_outcome_matches_its_predicate(threshold in 0..100u32, payload in 0..100u32) {
        let mut machine: StateMachine<u32> = StateMachine::new("m");
        let a = machine.add_state(State::new("a"), true).unwrap();
        let b = machine.add_state(State::new("b"), false).unwrap();
        let go = Event::new("go");
        machine.add_event(go.clone());
        let transition = machine.add_transition(a, b, &go).unwrap();
        machine
            .transition_mut(transition)
            .unwrap()
            .add_condition(move |value| *value >= threshold);

        machine.start(&payload).unwrap();
        let outcome = machine.trigger_event(&go, &payload, false).unwrap();

        if payload >= threshold {
            prop_assert_eq!(outcome, Dispatch::Fired);
            prop_assert_eq!(machine.current_state_id(), Some(b));
        } else {
            prop_assert_eq!(outcome, Dispatch::Rejected);
            prop_assert_eq!(machine.current_state_id(), Some(a));
        }
    }

    #[test]
    fn null_transitions_accumulate_without_moving(ticks in 1..20usize) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);

        let mut machine: StateMachine<u32> = StateMachine::new("m");
        let a = machine.add_state(State::new("a"), true).unwrap();
        let tick = Event::new("tick");
        machine.add_event(tick.clone());
        let transition = machine.add_null_transition(a, &tick).unwrap();
        machine.transition_mut(transition).unwrap().add_action(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        machine.start(&0).unwrap();
        for _ in 0..ticks {
            let outcome = machine.trigger_event(&tick, &0, false).unwrap();
            prop_assert_eq!(outcome, Dispatch::Fired);
        }

        prop_assert_eq!(hits.load(Ordering::SeqCst), ticks);
        prop_assert_eq!(machine.current_state_id(), Some(a));
        prop_assert_eq!(machine.history().len(), ticks);
    }

    #[test]
    fn history_round_trips_through_serde(count in 2..8usize) {
        let mut machine = chain_machine(count);
        machine.start(&0).unwrap();
        for index in 1..count {
            machine
                .trigger_event(&Event::new(format!("e{index}")), &0, false)
                .unwrap();
        }

        let json = serde_json::to_string(machine.history()).unwrap();
        let restored: History = serde_json::from_str(&json).unwrap();

        prop_assert_eq!(restored.records(), machine.history().records());
    }
}
