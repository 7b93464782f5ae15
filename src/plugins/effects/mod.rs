//! Effects plugin: short-lived visual feedback and sound cues.
//!
//! Gameplay code writes `EffectRequest`; this plugin turns each request into a
//! fading sprite with a lifetime and logs the matching sound cue. Effects are
//! cosmetic, so they are spawned and despawned rather than pooled.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::core::FrameSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Explosion,
    Hit,
    Pickup,
    BossWarning,
    LevelClear,
}

impl EffectKind {
    pub fn sound_cue(self) -> &'static str {
        match self {
            EffectKind::Explosion => "explosion",
            EffectKind::Hit => "hit",
            EffectKind::Pickup => "pickup",
            EffectKind::BossWarning => "warning_siren",
            EffectKind::LevelClear => "fanfare",
        }
    }
}

#[derive(Message, Clone, Copy, Debug)]
pub struct EffectRequest {
    pub kind: EffectKind,
    pub pos: Vec2,
}

#[derive(Component, Debug)]
pub struct Effect {
    pub kind: EffectKind,
    pub lifetime: Timer,
}

pub fn plugin(app: &mut App) {
    app.add_message::<EffectRequest>();
    app.add_systems(
        Update,
        (spawn_effects, fade_effects)
            .chain()
            .in_set(FrameSet::Complete)
            .run_if(in_state(GameState::InGame)),
    );
}

/// (size, colour, seconds) of the sprite for a kind.
fn look(kind: EffectKind, tunables: &Tunables) -> (Vec2, Color, f32) {
    let banner = Vec2::new(tunables.playfield_size.x, 40.0);
    match kind {
        EffectKind::Explosion => (Vec2::splat(40.0), Color::srgb(1.0, 0.55, 0.1), 0.35),
        EffectKind::Hit => (Vec2::splat(12.0), Color::WHITE, 0.1),
        EffectKind::Pickup => (Vec2::splat(22.0), Color::srgb(0.4, 1.0, 0.5), 0.25),
        EffectKind::BossWarning => (banner, Color::srgba(0.9, 0.1, 0.1, 0.6), tunables.boss_warning_secs.max(0.1)),
        EffectKind::LevelClear => (banner, Color::srgba(1.0, 1.0, 1.0, 0.6), 0.8),
    }
}

pub fn spawn_effects(mut commands: Commands, tunables: Res<Tunables>, mut reader: MessageReader<EffectRequest>) {
    for req in reader.read() {
        debug!("sfx: {}", req.kind.sound_cue());
        let (size, color, secs) = look(req.kind, &tunables);
        commands.spawn((
            Name::new(format!("{:?}Effect", req.kind)),
            Effect {
                kind: req.kind,
                lifetime: Timer::from_seconds(secs, TimerMode::Once),
            },
            Sprite {
                color,
                custom_size: Some(size),
                ..default()
            },
            Transform::from_translation(req.pos.extend(5.0)),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

pub fn fade_effects(
    mut commands: Commands,
    time: Res<Time>,
    mut q: Query<(Entity, &mut Effect, Option<&mut Sprite>)>,
) {
    for (e, mut effect, sprite) in &mut q {
        effect.lifetime.tick(time.delta());
        if effect.lifetime.is_finished() {
            commands.entity(e).despawn();
            continue;
        }
        if let Some(mut sprite) = sprite {
            sprite.color.set_alpha(effect.lifetime.fraction_remaining());
        }
    }
}

#[cfg(test)]
mod tests;
