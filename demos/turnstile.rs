//! Coin-operated turnstile assembled with the fluent builder.
//!
//! Demonstrates guards (the coin must cover the fare), an internal
//! transition (extra coins while unlocked are refunded without moving the
//! machine), and an error exit state with an exit notification.
//!
//! Run with: cargo run --example turnstile

use substate::builder::{internal, transition, MachineBuilder};
use substate::core::{Dispatch, Event, State};

const FARE: u32 = 50;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut turnstile = MachineBuilder::new("turnstile")
        .initial(State::new("locked"))
        .state(State::new("unlocked"))
        .state(State::exit("Fault"))
        .event("coin")
        .event("push")
        .event("smash")
        .transition(
            transition("locked", "unlocked", "coin").when(|coin: &u32| *coin >= FARE),
        )
        .unwrap()
        .transition(
            internal("unlocked", "coin").then(|coin: &u32| println!("refunding {coin}")),
        )
        .unwrap()
        .transition(transition("unlocked", "locked", "push"))
        .unwrap()
        .transition(transition("locked", "FaultExitState", "smash"))
        .unwrap()
        .transition(transition("unlocked", "FaultExitState", "smash"))
        .unwrap()
        .build()
        .unwrap();

    turnstile.on_exit(|state, _coin: &u32| {
        println!("turnstile out of service: {}", state.name());
    });

    turnstile.start(&0).unwrap();

    let coin = Event::new("coin");
    let push = Event::new("push");

    // Underpaying leaves the turnstile locked.
    let outcome = turnstile.trigger_event(&coin, &20, false).unwrap();
    println!("paid 20 -> {outcome:?}, state '{}'", state_name(&turnstile));

    // The fare unlocks it; a second coin is refunded in place.
    turnstile.trigger_event(&coin, &FARE, false).unwrap();
    turnstile.trigger_event(&coin, &10, false).unwrap();
    println!("paid {FARE} then 10 -> state '{}'", state_name(&turnstile));

    turnstile.trigger_event(&push, &0, false).unwrap();
    println!("pushed through -> state '{}'", state_name(&turnstile));

    // Vandalism drives the machine into its fault exit state.
    turnstile
        .trigger_event(&Event::new("smash"), &0, false)
        .unwrap();
    assert_eq!(
        turnstile.trigger_event(&push, &0, false).unwrap(),
        Dispatch::Ignored
    );
    println!(
        "running: {}, path: {:?}",
        turnstile.is_running(),
        turnstile.history().path()
    );
}

fn state_name(turnstile: &substate::core::StateMachine<u32>) -> &str {
    turnstile.current_state().map_or("<unset>", |state| state.name())
}
