//! Wave scheduler: a timer-driven state machine over formation data.
//!
//! ```text
//!   Idle --start_level--> [BossWarning] --> Spawning --filled--> Intermission --delay--> next wave
//!                                              |                                            |
//!                                              +--filled, last wave--> LevelComplete <------+
//! ```
//! The scheduler is plain data. It never touches the ECS: `update` returns the
//! events of the tick and the caller turns `Spawn` into pool requests.

use bevy::prelude::*;
use thiserror::Error;

use super::data::{is_boss_formation, EnemySpawn, FormationLibrary, Level};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WaveError {
    #[error("unknown level `{0}`")]
    UnknownLevel(String),
    #[error("unknown formation `{0}`")]
    UnknownFormation(String),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WavePhase {
    Idle,
    /// Boss wave announced; spawning is suspended until `remaining` reaches zero.
    BossWarning { remaining: f32 },
    Spawning,
    /// Current wave filled; counting down the level's wave delay.
    Intermission { remaining: f32 },
    LevelComplete,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WaveEvent {
    WaveStarted { wave_index: usize, formation: String },
    BossWarning { formation: String, duration: f32 },
    Spawn(EnemySpawn),
    WaveFilled { wave_index: usize },
    WaveSkipped { wave_index: usize, formation: String },
    LevelComplete { level: String },
}

#[derive(Debug, Clone)]
struct PendingSpawn {
    spawn: EnemySpawn,
    timer: f32,
    spawned: bool,
}

#[derive(Debug, Clone)]
struct WaveRun {
    level_id: String,
    level: Level,
    wave_index: usize,
    formation_id: String,
    pending: Vec<PendingSpawn>,
    phase: WavePhase,
}

/// Snapshot for debugging / progress display.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveProgress {
    pub level: String,
    pub wave_index: usize,
    pub wave_count: usize,
    pub formation: String,
    pub spawned: usize,
    pub total: usize,
    pub phase: WavePhase,
}

#[derive(Resource, Debug, Clone)]
pub struct WaveScheduler {
    library: FormationLibrary,
    boss_warning_secs: f32,
    run: Option<WaveRun>,
}

impl WaveScheduler {
    pub fn new(library: FormationLibrary, boss_warning_secs: f32) -> Self {
        Self {
            library,
            boss_warning_secs: boss_warning_secs.max(0.0),
            run: None,
        }
    }

    pub fn library(&self) -> &FormationLibrary {
        &self.library
    }

    /// Reset to wave 0 of `level_id`.
    ///
    /// The first formation begins immediately; its spawns happen on the next
    /// `update`.
    pub fn start_level(&mut self, level_id: &str) -> Result<Vec<WaveEvent>, WaveError> {
        let level = self
            .library
            .level(level_id)
            .cloned()
            .ok_or_else(|| WaveError::UnknownLevel(level_id.to_string()))?;

        self.run = Some(WaveRun {
            level_id: level_id.to_string(),
            level,
            wave_index: 0,
            formation_id: String::new(),
            pending: Vec::new(),
            phase: WavePhase::Idle,
        });

        let mut events = Vec::new();
        self.begin_wave(0, &mut events);
        Ok(events)
    }

    /// Drop the current run. The scheduler goes back to `Idle`.
    pub fn stop(&mut self) {
        self.run = None;
    }

    pub fn phase(&self) -> WavePhase {
        self.run.as_ref().map_or(WavePhase::Idle, |run| run.phase)
    }

    pub fn is_level_complete(&self) -> bool {
        self.phase() == WavePhase::LevelComplete
    }

    pub fn current_level(&self) -> Option<&str> {
        self.run.as_ref().map(|run| run.level_id.as_str())
    }

    pub fn progress(&self) -> Option<WaveProgress> {
        let run = self.run.as_ref()?;
        Some(WaveProgress {
            level: run.level_id.clone(),
            wave_index: run.wave_index,
            wave_count: run.level.waves.len(),
            formation: run.formation_id.clone(),
            spawned: run.pending.iter().filter(|p| p.spawned).count(),
            total: run.pending.len(),
            phase: run.phase,
        })
    }

    /// Every spawn of `formation_id` at once, outside of any level run.
    pub fn spawn_formation_now(&self, formation_id: &str) -> Result<Vec<EnemySpawn>, WaveError> {
        self.library
            .formation(formation_id)
            .map(|f| f.enemies.clone())
            .ok_or_else(|| WaveError::UnknownFormation(formation_id.to_string()))
    }

    /// Advance timers by `dt` seconds.
    pub fn update(&mut self, dt: f32) -> Vec<WaveEvent> {
        let mut events = Vec::new();
        // Time is consumed by the first phase that runs this tick; phases entered
        // later in the same tick start from zero elapsed.
        let mut step = dt.max(0.0);

        loop {
            let Some(run) = self.run.as_mut() else {
                break;
            };

            let phase = run.phase;
            match phase {
                WavePhase::Idle | WavePhase::LevelComplete => break,
                WavePhase::BossWarning { remaining } => {
                    let remaining = remaining - step;
                    step = 0.0;
                    if remaining > 0.0 {
                        run.phase = WavePhase::BossWarning { remaining };
                        break;
                    }
                    run.phase = WavePhase::Spawning;
                }
                WavePhase::Spawning => {
                    for pending in run.pending.iter_mut().filter(|p| !p.spawned) {
                        pending.timer -= step;
                        if pending.timer <= 0.0 {
                            pending.spawned = true;
                            events.push(WaveEvent::Spawn(pending.spawn));
                        }
                    }
                    step = 0.0;
                    if run.pending.iter().any(|p| !p.spawned) {
                        break;
                    }
                    self.finish_wave(&mut events);
                }
                WavePhase::Intermission { remaining } => {
                    let remaining = remaining - step;
                    step = 0.0;
                    if remaining > 0.0 {
                        run.phase = WavePhase::Intermission { remaining };
                        break;
                    }
                    let next = run.wave_index + 1;
                    self.begin_wave(next, &mut events);
                }
            }
        }

        events
    }

    /// Current wave is fully spawned: wait out the delay, or finish the level.
    fn finish_wave(&mut self, events: &mut Vec<WaveEvent>) {
        let Some(run) = self.run.as_mut() else {
            return;
        };
        events.push(WaveEvent::WaveFilled { wave_index: run.wave_index });

        if run.wave_index + 1 >= run.level.waves.len() {
            run.phase = WavePhase::LevelComplete;
            events.push(WaveEvent::LevelComplete { level: run.level_id.clone() });
        } else {
            run.phase = WavePhase::Intermission { remaining: run.level.wave_delay };
        }
    }

    fn begin_wave(&mut self, wave_index: usize, events: &mut Vec<WaveEvent>) {
        let boss_warning_secs = self.boss_warning_secs;
        let Some(run) = self.run.as_mut() else {
            return;
        };

        run.wave_index = wave_index;
        run.pending.clear();

        let Some(formation_id) = run.level.waves.get(wave_index).cloned() else {
            // A level with no waves is complete as soon as it starts.
            run.phase = WavePhase::LevelComplete;
            events.push(WaveEvent::LevelComplete { level: run.level_id.clone() });
            return;
        };
        run.formation_id = formation_id.clone();

        let Some(formation) = self.library.formations.get(&formation_id) else {
            warn!("level `{}` wave {wave_index}: unknown formation `{formation_id}`, skipping", run.level_id);
            events.push(WaveEvent::WaveSkipped { wave_index, formation: formation_id });
            // Treated as an empty formation: filled immediately.
            run.phase = WavePhase::Spawning;
            return;
        };

        run.pending = formation
            .enemies
            .iter()
            .map(|spawn| PendingSpawn { spawn: *spawn, timer: spawn.delay, spawned: false })
            .collect();

        events.push(WaveEvent::WaveStarted { wave_index, formation: formation_id.clone() });

        if is_boss_formation(&formation_id, formation) && boss_warning_secs > 0.0 {
            run.phase = WavePhase::BossWarning { remaining: boss_warning_secs };
            events.push(WaveEvent::BossWarning { formation: formation_id, duration: boss_warning_secs });
        } else {
            run.phase = WavePhase::Spawning;
        }
    }
}
