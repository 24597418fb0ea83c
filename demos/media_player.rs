//! Media player driven by a two-level machine.
//!
//! The root machine switches between "stopped" and "active"; the active
//! state owns a nested playback machine that toggles between "playing" and
//! "paused" through propagated events.
//!
//! Run with: cargo run --example media_player
//! Set RUST_LOG=debug to watch the engine's entry/exit tracing.

use substate::core::{Event, State, StateMachine};

fn playback_machine() -> StateMachine<String> {
    let mut playback = StateMachine::new("playback");

    let mut playing = State::new("playing");
    playing.on_entry(|track: &String| println!("  [playback] playing '{track}'"));
    let mut paused = State::new("paused");
    paused.on_entry(|track: &String| println!("  [playback] paused '{track}'"));

    let playing = playback.add_state(playing, true).unwrap();
    let paused = playback.add_state(paused, false).unwrap();

    let pause = Event::new("pause");
    let resume = Event::new("resume");
    playback.add_event(pause.clone());
    playback.add_event(resume.clone());
    playback.add_transition(playing, paused, &pause).unwrap();
    playback.add_transition(paused, playing, &resume).unwrap();

    playback
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut player = StateMachine::new("player");

    let mut stopped = State::new("stopped");
    stopped.on_entry(|_: &String| println!("[player] stopped"));
    let mut active = State::new("active").with_child(playback_machine());
    active.on_entry(|track: &String| println!("[player] active with '{track}'"));

    let stopped = player.add_state(stopped, true).unwrap();
    let active = player.add_state(active, false).unwrap();

    let play = Event::new("play");
    let halt = Event::new("halt");
    player.add_event(play.clone());
    player.add_event(halt.clone());
    player.add_transition(stopped, active, &play).unwrap();
    player.add_transition(active, stopped, &halt).unwrap();

    let track = String::from("Blue in Green");

    player.start(&track).unwrap();
    player.trigger_event(&play, &track, false).unwrap();

    // Propagated events bypass the player's own table and land in the
    // nested playback machine.
    player
        .trigger_event(&Event::new("pause"), &track, true)
        .unwrap();
    player
        .trigger_event(&Event::new("resume"), &track, true)
        .unwrap();

    player.trigger_event(&halt, &track, false).unwrap();

    println!(
        "[player] finished in state '{}' after {} transitions",
        player.current_state().unwrap().name(),
        player.history().len()
    );
}
