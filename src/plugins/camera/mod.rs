//! Camera plugin: fixed 2D camera over the playfield, with screen shake.
//!
//! ```text
//! OnEnter(InGame): spawn MainCamera
//! Update:          EffectRequest (explosion, boss warning) -> add trauma
//! PostUpdate:      trauma -> translation offset, decays over time
//! ```
//! Render-only: registered by the full app, never by headless runs.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::GameState;
use crate::plugins::effects::{EffectKind, EffectRequest};

/// Pixels of offset at full trauma.
const MAX_OFFSET: f32 = 14.0;
/// Trauma lost per second.
const DECAY: f32 = 1.6;

#[derive(Component, Debug, Default)]
pub struct MainCamera {
    /// 0 ..= 1; the offset scales with its square.
    pub trauma: f32,
}

impl MainCamera {
    pub fn add_trauma(&mut self, amount: f32) {
        self.trauma = (self.trauma + amount).clamp(0.0, 1.0);
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_camera)
        .add_systems(Update, add_trauma.run_if(in_state(GameState::InGame)))
        .add_systems(
            PostUpdate,
            shake
                .before(TransformSystems::Propagate)
                .run_if(in_state(GameState::InGame)),
        );
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("MainCamera"),
        Camera2d,
        MainCamera::default(),
        Transform::from_xyz(0.0, 0.0, 999.0),
        DespawnOnExit(GameState::InGame),
    ));
}

fn trauma_for(kind: EffectKind) -> f32 {
    match kind {
        EffectKind::Explosion => 0.25,
        EffectKind::BossWarning => 0.6,
        EffectKind::Hit | EffectKind::Pickup | EffectKind::LevelClear => 0.0,
    }
}

fn add_trauma(mut reader: MessageReader<EffectRequest>, mut q_cam: Query<&mut MainCamera>) {
    let Ok(mut cam) = q_cam.single_mut() else {
        return;
    };
    for req in reader.read() {
        cam.add_trauma(trauma_for(req.kind));
    }
}

/// Offset for a trauma level at time `t`. Deterministic: two detuned sines.
pub fn shake_offset(trauma: f32, t: f32) -> Vec2 {
    let amount = MAX_OFFSET * trauma * trauma;
    Vec2::new((t * 47.0).sin(), (t * 61.0 + 1.3).sin()) * amount
}

fn shake(time: Res<Time>, mut q_cam: Query<(&mut Transform, &mut MainCamera)>) {
    let Ok((mut tf, mut cam)) = q_cam.single_mut() else {
        return;
    };
    let offset = shake_offset(cam.trauma, time.elapsed_secs());
    tf.translation.x = offset.x;
    tf.translation.y = offset.y;
    cam.trauma = (cam.trauma - DECAY * time.delta_secs()).max(0.0);
}
