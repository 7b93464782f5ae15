//! Spawn consumer: activate bullets from the pool.
//!
//! The pool free list only ever contains entities spawned by `init_bullet_pool`,
//! so a pooled entity without bullet components is a bug. It is logged and handed
//! back instead of being left in the active list.

use bevy::prelude::*;

use crate::common::tunables::Tunables;
use crate::plugins::pool::{EntityPool, Hitbox, PoolKey, PoolState, Pooled, Velocity};

use super::components::Bullet;
use super::messages::{BulletKind, SpawnBulletRequest};

pub type BulletPool = EntityPool<BulletKind>;

/// Pre-spawn inactive bullets for every kind.
pub fn init_bullet_pool(mut commands: Commands, tunables: Res<Tunables>, mut pool: ResMut<BulletPool>) {
    for &kind in BulletKind::all() {
        let half = kind.half_size();
        for _ in 0..tunables.bullet_pool_per_kind {
            let e = commands
                .spawn((
                    Name::new(format!("{kind:?}Bullet(Pooled)")),
                    Bullet { kind, damage: 0 },
                    Pooled { kind },
                    PoolState::Inactive,
                    kind.category(),
                    Hitbox { half_size: half },
                    Velocity::default(),
                    Sprite {
                        color: kind.color(),
                        custom_size: Some(half * 2.0),
                        ..default()
                    },
                    Transform::from_xyz(0.0, 0.0, 2.0),
                    Visibility::Hidden,
                ))
                .id();
            pool.register(kind, e);
        }
    }
    debug!("bullet pool ready: {} entities", pool.total_capacity());
}

pub fn allocate_bullets_from_pool(
    mut pool: ResMut<BulletPool>,
    mut reader: MessageReader<SpawnBulletRequest>,
    mut q: Query<(
        &mut PoolState,
        &mut Bullet,
        &mut Transform,
        &mut Velocity,
        &mut Visibility,
    )>,
) {
    for req in reader.read() {
        let Some(e) = pool.acquire(req.kind) else {
            // Capacity decision, not a correctness failure.
            continue;
        };

        let Ok((mut state, mut bullet, mut tf, mut vel, mut vis)) = q.get_mut(e) else {
            error!("bullet pool contained {e:?} without bullet components");
            pool.release(e);
            continue;
        };

        *state = PoolState::Active;
        bullet.reset_for_fire(req.damage);
        tf.translation = req.pos.extend(2.0);
        vel.0 = req.vel;
        *vis = Visibility::Visible;
    }
}
