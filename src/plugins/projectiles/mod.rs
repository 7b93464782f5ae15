//! Projectiles plugin: **message-based producer → consumer** spawning over the
//! shared entity pool.
//!
//! # Data flow
//! ```text
//!  Spawn set
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  (A) Producers: request_player_bullets, enemies::enemy_fire          │
//! │      - writes: SpawnBulletRequest message                            │
//! │                                                                      │
//! │  (B) Consumer: allocate_bullets_from_pool                            │
//! │      - reads: SpawnBulletRequest messages                            │
//! │      - mutates: BulletPool (acquire)                                 │
//! │      - mutates: PoolState, Bullet, Transform, Velocity, Visibility   │
//! └──────────────────────────────────────────────────────────────────────┘
//!                │
//!                v
//!  Simulate: integrate + cull (pool plugin)   Resolve: hits flag PendingReturn
//!                │
//!                v
//!  Commit: return_to_pool_commit::<BulletKind> → BulletPool.release
//! ```
//!
//! Producers never borrow `ResMut<BulletPool>`; the allocator is the single
//! writer that acquires from it.

pub mod allocator;
pub mod components;
pub mod messages;
pub mod request;

pub use allocator::BulletPool;
pub use components::Bullet;
pub use messages::{BulletKind, SpawnBulletRequest};

use bevy::prelude::*;

use crate::common::state::GameState;
use crate::plugins::core::FrameSet;
use crate::plugins::enemies;
use crate::plugins::pool;

pub fn plugin(app: &mut App) {
    app.add_message::<SpawnBulletRequest>();
    pool::register_pool::<BulletKind>(app);
    app.add_systems(Startup, allocator::init_bullet_pool);

    app.add_systems(
        Update,
        (
            request::request_player_bullets,
            allocator::allocate_bullets_from_pool
                .after(request::request_player_bullets)
                .after(enemies::enemy_fire),
        )
            .in_set(FrameSet::Spawn)
            .run_if(in_state(GameState::InGame)),
    );
}
