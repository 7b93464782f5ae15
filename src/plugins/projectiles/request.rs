use bevy::prelude::*;

use crate::common::tunables::Tunables;
use crate::plugins::player::Player;

use super::messages::{BulletKind, SpawnBulletRequest};

pub const PLAYER_BULLET_DAMAGE: i32 = 1;
/// Muzzle offset above the player's centre.
const MUZZLE: f32 = 18.0;

/// Barrel layout for a fire level: `(offset from muzzle, direction)`.
///
/// Level 1 is a single shot, level 2 twin parallel shots, level 3 a centre
/// shot flanked by two angled ones.
pub fn fire_pattern(level: u8) -> Vec<(Vec2, Vec2)> {
    match level {
        0 | 1 => vec![(Vec2::ZERO, Vec2::Y)],
        2 => vec![(Vec2::new(-8.0, 0.0), Vec2::Y), (Vec2::new(8.0, 0.0), Vec2::Y)],
        _ => vec![
            (Vec2::ZERO, Vec2::Y),
            (Vec2::new(-10.0, -4.0), Vec2::from_angle(0.18).rotate(Vec2::Y)),
            (Vec2::new(10.0, -4.0), Vec2::from_angle(-0.18).rotate(Vec2::Y)),
        ],
    }
}

/// Producer: hold Space to fire, rate-limited by the player's cooldown.
///
/// This system does **not** access the bullet pool.
pub fn request_player_bullets(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    time: Res<Time>,
    tunables: Res<Tunables>,
    mut q_player: Query<(&Transform, &mut Player)>,
    mut writer: MessageWriter<SpawnBulletRequest>,
) {
    let Ok((tf, mut player)) = q_player.single_mut() else {
        return;
    };
    player.fire_cooldown.tick(time.delta());

    let Some(keys) = keys else {
        return;
    };
    if !keys.pressed(KeyCode::Space) || !player.fire_cooldown.is_finished() {
        return;
    }
    player.fire_cooldown = Timer::from_seconds(tunables.player_fire_interval, TimerMode::Once);

    let muzzle = tf.translation.truncate() + Vec2::new(0.0, MUZZLE);
    for (offset, dir) in fire_pattern(player.fire_level) {
        writer.write(SpawnBulletRequest {
            kind: BulletKind::Player,
            pos: muzzle + offset,
            vel: dir * tunables.bullet_speed,
            damage: PLAYER_BULLET_DAMAGE,
        });
    }
}
