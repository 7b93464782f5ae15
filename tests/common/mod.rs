//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides the core ECS runtime, `StatesPlugin` the state machine.
//! - time advances a fixed 16 ms per `app.update()`.
//! - we then call `formation_shooter::game::configure_headless` to install gameplay plugins.

#![allow(dead_code)]

use std::time::Duration;

use bevy::prelude::*;
use bevy::state::app::StatesPlugin;
use bevy::time::TimeUpdateStrategy;

use formation_shooter::common::state::GameState;
use formation_shooter::common::tunables::Tunables;
use formation_shooter::plugins::waves::{FormationLibrary, WaveScheduler};

pub const FRAME: Duration = Duration::from_millis(16);

fn base_app() -> App {
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, StatesPlugin));
    app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));
    app
}

/// Headless app on the built-in formation data.
pub fn app_headless() -> App {
    let mut app = base_app();
    formation_shooter::game::configure_headless(&mut app);
    app
}

/// Headless app on the given formation data, with no boss warning delay.
pub fn app_with_data(json: &str) -> App {
    let mut app = base_app();
    let tunables = Tunables { boss_warning_secs: 0.0, ..Tunables::default() };
    let library = FormationLibrary::from_json_str(json).expect("valid test data");
    app.insert_resource(WaveScheduler::new(library, tunables.boss_warning_secs));
    app.insert_resource(tunables);
    formation_shooter::game::configure_headless(&mut app);
    app
}

pub fn frames(app: &mut App, n: usize) {
    for _ in 0..n {
        app.update();
    }
}

pub fn state(app: &App) -> GameState {
    *app.world().resource::<State<GameState>>().get()
}

/// Hold a key for the rest of the test. Nothing clears it: there is no input plugin.
pub fn hold_key(app: &mut App, key: KeyCode) {
    let mut keys = ButtonInput::<KeyCode>::default();
    keys.press(key);
    app.insert_resource(keys);
}
