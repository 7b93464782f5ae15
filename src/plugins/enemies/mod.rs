//! Enemies plugin: pooled enemy entities driven by formation spawns.
//!
//! ```text
//!   Waves set     scheduler -> SpawnEnemyRequest
//!   Spawn set     allocate_enemies: EnemyPool.acquire(kind) -> reset components -> Active
//!                 enemy_fire: weapon cooldowns -> SpawnBulletRequest
//!   Simulate set  steer_enemies: pattern -> Velocity (integrated by the pool plugin)
//! ```
//! Death is decided by the collision resolve step, which flags `PendingReturn`;
//! the pool commit hides the entity and puts it back on the free list.

pub mod profiles;

pub use profiles::{Aim, EnemyKind, EnemyProfile, MovementPattern, Weapon};

use bevy::prelude::*;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::core::FrameSet;
use crate::plugins::player::Player;
use crate::plugins::pool::{self, motion, EntityPool, Health, Hitbox, PoolKey, PoolState, Pooled, Velocity};
use crate::plugins::projectiles::SpawnBulletRequest;

pub type EnemyPool = EntityPool<EnemyKind>;

#[derive(Component, Debug, Clone)]
pub struct Enemy {
    pub kind: EnemyKind,
    /// Seconds since this life began.
    pub age: f32,
    /// Time until the next volley. Finished means ready.
    pub fire_cooldown: Timer,
    pub strafe_dir: f32,
}

impl Enemy {
    fn new(kind: EnemyKind) -> Self {
        Self { kind, age: 0.0, fire_cooldown: Timer::default(), strafe_dir: 1.0 }
    }

    #[inline]
    fn reset_for_spawn(&mut self) {
        self.age = 0.0;
        // First volley comes after a full interval so fresh spawns don't fire point-blank.
        let interval = self.kind.profile().weapon.map_or(0.0, |w| w.interval);
        self.fire_cooldown = Timer::from_seconds(interval, TimerMode::Once);
        self.strafe_dir = 1.0;
    }
}

#[derive(Message, Clone, Copy, Debug)]
pub struct SpawnEnemyRequest {
    pub kind: EnemyKind,
    pub pos: Vec2,
}

pub fn plugin(app: &mut App) {
    app.add_message::<SpawnEnemyRequest>();
    pool::register_pool::<EnemyKind>(app);
    app.add_systems(Startup, init_enemy_pool);

    app.add_systems(
        Update,
        (allocate_enemies, enemy_fire.after(allocate_enemies))
            .in_set(FrameSet::Spawn)
            .run_if(in_state(GameState::InGame)),
    );
    app.add_systems(
        Update,
        steer_enemies
            .in_set(FrameSet::Simulate)
            .before(motion::integrate_velocity)
            .run_if(in_state(GameState::InGame)),
    );
}

/// Pre-spawn inactive enemies for every kind.
pub fn init_enemy_pool(mut commands: Commands, tunables: Res<Tunables>, mut pool: ResMut<EnemyPool>) {
    for &kind in EnemyKind::all() {
        let profile = kind.profile();
        let capacity = match kind {
            EnemyKind::Boss => tunables.boss_pool,
            _ => tunables.enemy_pool_per_kind,
        };

        for _ in 0..capacity {
            let e = commands
                .spawn((
                    Name::new(format!("{kind:?}(Pooled)")),
                    Enemy::new(kind),
                    Pooled { kind },
                    PoolState::Inactive,
                    profile.category,
                    Health::full(profile.health),
                    Hitbox { half_size: profile.half_size },
                    Velocity::default(),
                    Sprite {
                        color: profile.color,
                        custom_size: Some(profile.half_size * 2.0),
                        ..default()
                    },
                    Transform::from_xyz(0.0, 0.0, 1.0),
                    Visibility::Hidden,
                ))
                .id();
            pool.register(kind, e);
        }
    }
    debug!("enemy pool ready: {} entities", pool.total_capacity());
}

/// Spawn consumer: activate enemies from the pool.
pub fn allocate_enemies(
    mut pool: ResMut<EnemyPool>,
    mut reader: MessageReader<SpawnEnemyRequest>,
    mut q: Query<(
        &mut PoolState,
        &mut Enemy,
        &mut Health,
        &mut Transform,
        &mut Velocity,
        &mut Visibility,
    )>,
) {
    for req in reader.read() {
        let Some(e) = pool.acquire(req.kind) else {
            // Capacity decision, not a correctness failure.
            debug!("enemy pool exhausted for {:?}", req.kind);
            continue;
        };

        let Ok((mut state, mut enemy, mut health, mut tf, mut vel, mut vis)) = q.get_mut(e) else {
            error!("enemy pool contained {e:?} without enemy components");
            pool.release(e);
            continue;
        };

        *state = PoolState::Active;
        enemy.reset_for_spawn();
        *health = Health::full(req.kind.profile().health);
        tf.translation = req.pos.extend(1.0);
        vel.0 = Vec2::ZERO;
        *vis = Visibility::Visible;
    }
}

/// Apply each enemy's movement pattern to its velocity.
pub fn steer_enemies(
    time: Res<Time>,
    tunables: Res<Tunables>,
    mut q: Query<(&mut Enemy, &Transform, &mut Velocity, &PoolState)>,
) {
    let dt = time.delta_secs();
    let playfield = tunables.playfield();

    for (mut enemy, tf, mut vel, state) in &mut q {
        if !state.is_active() {
            continue;
        }
        enemy.age += dt;

        let profile = enemy.kind.profile();
        let pos = tf.translation.truncate();
        if matches!(profile.movement, MovementPattern::Strafe { .. }) {
            let edge = playfield.max.x - profile.half_size.x;
            if pos.x >= edge && enemy.strafe_dir > 0.0 {
                enemy.strafe_dir = -1.0;
            } else if pos.x <= -edge && enemy.strafe_dir < 0.0 {
                enemy.strafe_dir = 1.0;
            }
        }

        vel.0 = profiles::pattern_velocity(
            profile.movement,
            profile.speed,
            enemy.age,
            pos,
            enemy.strafe_dir,
            playfield,
        );
    }
}

/// Tick weapon cooldowns and request volleys. Only on-screen enemies fire.
pub fn enemy_fire(
    time: Res<Time>,
    tunables: Res<Tunables>,
    q_player: Query<&Transform, (With<Player>, Without<Enemy>)>,
    mut q: Query<(&mut Enemy, &Transform, &PoolState)>,
    mut writer: MessageWriter<SpawnBulletRequest>,
) {
    let playfield = tunables.playfield();
    let player = q_player.single().ok().map(|tf| tf.translation.truncate());

    for (mut enemy, tf, state) in &mut q {
        if !state.is_active() {
            continue;
        }
        let Some(weapon) = enemy.kind.profile().weapon else {
            continue;
        };

        let pos = tf.translation.truncate();
        enemy.fire_cooldown.tick(time.delta());
        if !enemy.fire_cooldown.is_finished() || !playfield.contains(pos) {
            continue;
        }
        enemy.fire_cooldown = Timer::from_seconds(weapon.interval, TimerMode::Once);
        let speed = tunables.enemy_bullet_speed * weapon.speed_scale;

        for dir in profiles::volley_directions(weapon.aim, pos, player) {
            writer.write(SpawnBulletRequest {
                kind: weapon.bullet,
                pos,
                vel: dir * speed,
                damage: weapon.damage,
            });
        }
    }
}
