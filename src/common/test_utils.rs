//! Test helpers.
//!
//! `World::run_system_once` (via the `RunSystemOnce` trait) executes a single system
//! without building a schedule. Systems that use `Commands` only enqueue structural
//! changes, so we flush after running to apply them before assertions.

use std::time::Duration;

use bevy::ecs::system::{IntoSystem, RunSystemOnce};
use bevy::prelude::*;

/// Run a system once on the given world, then flush deferred commands.
/// Returns the system output.
pub fn run_system_once<T, Out, Marker>(world: &mut World, system: T) -> Out
where
    T: IntoSystem<(), Out, Marker>,
{
    let out = world.run_system_once(system).expect("system run failed");
    world.flush();
    out
}

/// Insert a generic `Time` whose last delta is `dt` seconds.
pub fn set_time_delta(world: &mut World, dt: f32) {
    let mut time = Time::<()>::default();
    time.advance_by(Duration::from_secs_f32(dt));
    world.insert_resource(time);
}
