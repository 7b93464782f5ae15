//! Return commit: recycle pooled entities back into their pool.
//!
//! This system is the owner of the *Inactive invariants*. An inactive entity is:
//! - hidden
//! - velocity = 0
//! - listed in its pool's free list exactly once
//!
//! Centralizing these writes here prevents inconsistencies.

use bevy::prelude::*;

use super::components::{PoolState, Pooled, Velocity};
use super::pool::{EntityPool, PoolKey};

pub fn return_to_pool_commit<K: PoolKey>(
    mut pool: ResMut<EntityPool<K>>,
    mut q: Query<(Entity, &mut PoolState, &mut Visibility, &mut Velocity), With<Pooled<K>>>,
) {
    for (e, mut state, mut vis, mut vel) in &mut q {
        if *state != PoolState::PendingReturn {
            continue;
        }

        *state = PoolState::Inactive;
        *vis = Visibility::Hidden;
        vel.0 = Vec2::ZERO;

        pool.release(e);
    }

    debug_assert!(pool.invariant_holds(), "{} pool invariant broken", std::any::type_name::<K>());
}

/// Level teardown: every pooled entity of this pool goes back to the free list.
pub fn release_all_pooled<K: PoolKey>(
    mut pool: ResMut<EntityPool<K>>,
    mut q: Query<(&mut PoolState, &mut Visibility, &mut Velocity), With<Pooled<K>>>,
) {
    for e in pool.release_all() {
        let Ok((mut state, mut vis, mut vel)) = q.get_mut(e) else {
            continue;
        };
        *state = PoolState::Inactive;
        *vis = Visibility::Hidden;
        vel.0 = Vec2::ZERO;
    }
}
