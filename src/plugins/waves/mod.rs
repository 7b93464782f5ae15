//! Waves plugin: formation data + the scheduler that turns it into enemy spawns.
//!
//! The scheduler itself (`scheduler.rs`) is pure data and is unit tested without
//! a world. This module only adapts it to the frame: tick it with frame time,
//! convert reference-space spawns to world space and hand them to the enemy
//! allocator as `SpawnEnemyRequest` messages.

pub mod data;
pub mod scheduler;

pub use data::{DataError, EnemySpawn, Formation, FormationLibrary, Level};
pub use scheduler::{WaveError, WaveEvent, WavePhase, WaveProgress, WaveScheduler};

use bevy::prelude::*;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::core::FrameSet;
use crate::plugins::effects::{EffectKind, EffectRequest};
use crate::plugins::enemies::SpawnEnemyRequest;

pub fn plugin(app: &mut App) {
    if !app.world().contains_resource::<WaveScheduler>() {
        let tunables = app.world().resource::<Tunables>();
        let library = FormationLibrary::load_or_fallback(&tunables.formation_path);
        let scheduler = WaveScheduler::new(library, tunables.boss_warning_secs);
        app.insert_resource(scheduler);
    }

    app.add_systems(
        Update,
        advance_waves
            .in_set(FrameSet::Waves)
            .run_if(in_state(GameState::InGame)),
    );
}

/// Tick the scheduler and forward its events.
pub fn advance_waves(
    time: Res<Time>,
    tunables: Res<Tunables>,
    mut scheduler: ResMut<WaveScheduler>,
    mut spawns: MessageWriter<SpawnEnemyRequest>,
    mut effects: MessageWriter<EffectRequest>,
) {
    let events = scheduler.update(time.delta_secs());
    forward_wave_events(&events, &tunables, &mut spawns, &mut effects);
}

/// Shared by the tick and by level start (which may begin a boss wave).
pub fn forward_wave_events(
    events: &[WaveEvent],
    tunables: &Tunables,
    spawns: &mut MessageWriter<SpawnEnemyRequest>,
    effects: &mut MessageWriter<EffectRequest>,
) {
    for event in events {
        match event {
            WaveEvent::Spawn(spawn) => {
                spawns.write(SpawnEnemyRequest {
                    kind: spawn.kind,
                    pos: tunables.to_world(spawn.reference_position()),
                });
            }
            WaveEvent::WaveStarted { wave_index, formation } => {
                info!("wave {wave_index}: {formation}");
            }
            WaveEvent::BossWarning { formation, duration } => {
                info!("boss incoming ({formation}) in {duration:.1}s");
                effects.write(EffectRequest { kind: EffectKind::BossWarning, pos: Vec2::ZERO });
            }
            WaveEvent::WaveFilled { wave_index } => {
                debug!("wave {wave_index} filled");
            }
            WaveEvent::WaveSkipped { wave_index, formation } => {
                debug!("wave {wave_index} skipped ({formation})");
            }
            WaveEvent::LevelComplete { level } => {
                debug!("level {level}: all waves spawned");
            }
        }
    }
}

#[cfg(test)]
mod tests;
