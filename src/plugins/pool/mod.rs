//! Entity pools: fixed-capacity, pre-spawned, reusable entities.
//!
//! # Lifecycle
//! ```text
//!   Startup        spawn N inactive entities per type key -> EntityPool::register
//!   Spawn set      allocator: acquire(kind) -> write components -> Active
//!   Simulate set   integrate + cull: Active -> PendingReturn
//!   Resolve set    collision outcomes: Active -> PendingReturn
//!   commit         PendingReturn -> Inactive, EntityPool::release
//! ```
//! Nothing is despawned while a session runs. Running out of free entities is a
//! capacity decision (the request is dropped), not a failure.

pub mod commit;
pub mod components;
pub mod motion;
pub mod pool;

pub use components::{Health, Hitbox, PoolState, Pooled, Velocity};
pub use pool::{EntityPool, PoolKey};

use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::core::FrameSet;

/// Shared movement/expiry systems. Registered once.
pub fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (motion::integrate_velocity, motion::cull_offscreen)
            .chain()
            .in_set(FrameSet::Simulate)
            .run_if(in_state(GameState::InGame)),
    );
}

/// Insert the pool resource for `K` and wire its commit/teardown systems.
///
/// Commits run at the end of `Simulate` (expired entities) and at the end of
/// `Resolve` (entities deactivated by collisions), so every tick ends with
/// `active + free == capacity` and no pending returns.
pub fn register_pool<K: PoolKey>(app: &mut App) {
    app.insert_resource(EntityPool::<K>::new());
    app.add_systems(
        Update,
        commit::return_to_pool_commit::<K>
            .in_set(FrameSet::Simulate)
            .after(motion::cull_offscreen)
            .run_if(in_state(GameState::InGame)),
    );
    app.add_systems(
        Update,
        commit::return_to_pool_commit::<K>
            .in_set(FrameSet::Commit)
            .run_if(in_state(GameState::InGame)),
    );
    app.add_systems(OnExit(GameState::InGame), commit::release_all_pooled::<K>);
}
