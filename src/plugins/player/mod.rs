//! Player plugin.
//!
//! Pipeline:
//! - Simulate: sample input into `PlayerInput`, write `Velocity`
//! - Simulate (after integration): clamp to the playfield, tick invulnerability
//!
//! Missing keyboard input (headless runs) leaves the ship still.

use std::time::Duration;

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{category::Category, state::GameState, tunables::Tunables};
use crate::plugins::core::FrameSet;
use crate::plugins::pool::{motion, Health, Hitbox, Velocity};

pub const MAX_FIRE_LEVEL: u8 = 3;
/// Reference-space spawn point: bottom centre.
const SPAWN_REFERENCE: Vec2 = Vec2::new(640.0, 640.0);
const HALF_SIZE: f32 = 13.0;

#[derive(Component, Debug, Clone)]
pub struct Player {
    /// 1 ..= MAX_FIRE_LEVEL
    pub fire_level: u8,
    /// Time until the gun can fire again. Finished means ready.
    pub fire_cooldown: Timer,
    /// Damage immunity left after a hit.
    pub invulnerable: Timer,
}

impl Default for Player {
    fn default() -> Self {
        Self { fire_level: 1, fire_cooldown: elapsed_timer(), invulnerable: elapsed_timer() }
    }
}

impl Player {
    #[inline]
    pub fn is_invulnerable(&self) -> bool {
        !self.invulnerable.is_finished()
    }

    /// Start a fresh immunity window of `secs`.
    pub fn shield(&mut self, secs: f32) {
        self.invulnerable = Timer::from_seconds(secs, TimerMode::Once);
    }
}

/// A once-timer that has already run out.
fn elapsed_timer() -> Timer {
    let mut timer = Timer::from_seconds(0.0, TimerMode::Once);
    timer.tick(Duration::ZERO);
    timer
}

/// Health reached zero this frame.
#[derive(Message, Clone, Copy, Debug)]
pub struct PlayerDefeated;

#[derive(Resource, Default, Debug)]
struct PlayerInput {
    move_axis: Vec2,
}

pub fn plugin(app: &mut App) {
    app.insert_resource(PlayerInput::default())
        .add_message::<PlayerDefeated>()
        .add_systems(OnEnter(GameState::InGame), spawn)
        .add_systems(
            Update,
            (
                (gather_input, apply_movement).chain().before(motion::integrate_velocity),
                (clamp_to_playfield, tick_invulnerability).after(motion::integrate_velocity),
            )
                .in_set(FrameSet::Simulate)
                .run_if(in_state(GameState::InGame)),
        );
}

fn spawn(mut commands: Commands, tunables: Res<Tunables>) {
    commands.spawn((
        Name::new("Player"),
        Player::default(),
        Category::Player,
        Health::full(tunables.player_max_health),
        Hitbox::square(HALF_SIZE),
        Velocity::default(),
        Sprite {
            color: Color::srgb(0.2, 0.75, 0.9),
            custom_size: Some(Vec2::splat(HALF_SIZE * 2.0)),
            ..default()
        },
        Transform::from_translation(tunables.to_world(SPAWN_REFERENCE).extend(1.0)),
        DespawnOnExit(GameState::InGame),
    ));
}

fn gather_input(keys: Option<Res<ButtonInput<KeyCode>>>, mut input: ResMut<PlayerInput>) {
    let Some(keys) = keys else {
        input.move_axis = Vec2::ZERO;
        return;
    };
    let mut axis = Vec2::ZERO;

    if keys.any_pressed([KeyCode::KeyW, KeyCode::ArrowUp]) {
        axis.y += 1.0;
    }
    if keys.any_pressed([KeyCode::KeyS, KeyCode::ArrowDown]) {
        axis.y -= 1.0;
    }
    if keys.any_pressed([KeyCode::KeyA, KeyCode::ArrowLeft]) {
        axis.x -= 1.0;
    }
    if keys.any_pressed([KeyCode::KeyD, KeyCode::ArrowRight]) {
        axis.x += 1.0;
    }

    input.move_axis = if axis.length_squared() > 0.0 {
        axis.normalize()
    } else {
        Vec2::ZERO
    };
}

fn apply_movement(
    tunables: Res<Tunables>,
    input: Res<PlayerInput>,
    mut q_player: Query<&mut Velocity, With<Player>>,
) {
    let Ok(mut vel) = q_player.single_mut() else {
        return;
    };
    vel.0 = input.move_axis * tunables.player_speed;
}

fn clamp_to_playfield(tunables: Res<Tunables>, mut q_player: Query<(&mut Transform, &Hitbox), With<Player>>) {
    let Ok((mut tf, hitbox)) = q_player.single_mut() else {
        return;
    };
    let playfield = tunables.playfield();
    let min = playfield.min + hitbox.half_size;
    let max = playfield.max - hitbox.half_size;
    let pos = tf.translation.truncate().clamp(min, max);
    tf.translation.x = pos.x;
    tf.translation.y = pos.y;
}

fn tick_invulnerability(time: Res<Time>, mut q_player: Query<(&mut Player, Option<&mut Sprite>)>) {
    for (mut player, sprite) in &mut q_player {
        if !player.is_invulnerable() {
            continue;
        }
        player.invulnerable.tick(time.delta());
        if let Some(mut sprite) = sprite {
            let alpha = if player.is_invulnerable() { 0.45 } else { 1.0 };
            sprite.color.set_alpha(alpha);
        }
    }
}
