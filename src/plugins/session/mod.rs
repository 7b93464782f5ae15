//! Session plugin: one playthrough from the first level to victory or defeat.
//!
//! ```text
//!   OnEnter(InGame)   reset Session, start the first level of the level order
//!   Complete set      level done (all waves spawned, no enemy alive)
//!                       -> next level | Victory
//!                     PlayerDefeated -> GameOver
//!   OnExit(InGame)    stop the scheduler (pools are released by their own plugins)
//!   any state         R / RestartSession -> Restarting -> InGame
//! ```

use bevy::prelude::*;

use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::core::FrameSet;
use crate::plugins::effects::{EffectKind, EffectRequest};
use crate::plugins::enemies::{EnemyPool, SpawnEnemyRequest};
use crate::plugins::player::{Player, PlayerDefeated};
use crate::plugins::pool::Health;
use crate::plugins::waves::{self, WaveScheduler};

/// Per-playthrough state. Reset on every entry into `InGame`.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub score: u64,
    pub coins: u32,
    /// Seconds spent in `InGame` this session.
    pub elapsed: f32,
    pub level_index: usize,
    pub level_order: Vec<String>,
}

impl Session {
    pub fn current_level(&self) -> Option<&str> {
        self.level_order.get(self.level_index).map(String::as_str)
    }
}

#[derive(Message, Clone, Copy, Debug, Default)]
pub struct RestartSession;

pub fn plugin(app: &mut App) {
    app.init_resource::<Session>()
        .add_message::<RestartSession>()
        .add_systems(OnEnter(GameState::InGame), begin_session)
        .add_systems(OnExit(GameState::InGame), end_session)
        .add_systems(OnEnter(GameState::Restarting), resume_play)
        .add_systems(OnEnter(GameState::GameOver), report_outcome)
        .add_systems(OnEnter(GameState::Victory), report_outcome)
        .add_systems(
            Update,
            (tick_elapsed, on_player_defeated, check_level_complete)
                .chain()
                .in_set(FrameSet::Complete)
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(Update, (request_restart, handle_restart).chain());
}

/// Start `level_id` and forward its opening events.
fn start_level(
    level_id: &str,
    scheduler: &mut WaveScheduler,
    tunables: &Tunables,
    spawns: &mut MessageWriter<SpawnEnemyRequest>,
    effects: &mut MessageWriter<EffectRequest>,
) -> bool {
    match scheduler.start_level(level_id) {
        Ok(events) => {
            info!("level {level_id} started");
            waves::forward_wave_events(&events, tunables, spawns, effects);
            true
        }
        Err(err) => {
            warn!("cannot start level: {err}");
            false
        }
    }
}

pub fn begin_session(
    tunables: Res<Tunables>,
    mut session: ResMut<Session>,
    mut scheduler: ResMut<WaveScheduler>,
    mut next: ResMut<NextState<GameState>>,
    mut spawns: MessageWriter<SpawnEnemyRequest>,
    mut effects: MessageWriter<EffectRequest>,
) {
    *session = Session {
        level_order: scheduler.library().level_order(),
        ..Session::default()
    };

    let Some(first) = session.current_level().map(str::to_owned) else {
        warn!("no levels to play");
        next.set(GameState::Victory);
        return;
    };
    if !start_level(&first, &mut scheduler, &tunables, &mut spawns, &mut effects) {
        next.set(GameState::Victory);
    }
}

pub fn end_session(mut scheduler: ResMut<WaveScheduler>) {
    scheduler.stop();
}

pub fn tick_elapsed(time: Res<Time>, mut session: ResMut<Session>) {
    session.elapsed += time.delta_secs();
}

pub fn on_player_defeated(mut reader: MessageReader<PlayerDefeated>, mut next: ResMut<NextState<GameState>>) {
    if reader.read().next().is_some() {
        next.set(GameState::GameOver);
    }
}

/// Advance to the next level once every wave has spawned and the field is clear.
#[allow(clippy::too_many_arguments)]
pub fn check_level_complete(
    tunables: Res<Tunables>,
    pool: Res<EnemyPool>,
    q_player: Query<&Health, With<Player>>,
    mut session: ResMut<Session>,
    mut scheduler: ResMut<WaveScheduler>,
    mut next: ResMut<NextState<GameState>>,
    mut spawns: MessageWriter<SpawnEnemyRequest>,
    mut effects: MessageWriter<EffectRequest>,
) {
    // A defeat decided earlier this frame wins over a level clear.
    let defeated = q_player.iter().any(Health::is_depleted);
    if defeated || !scheduler.is_level_complete() || pool.active_count() > 0 {
        return;
    }

    effects.write(EffectRequest { kind: EffectKind::LevelClear, pos: Vec2::ZERO });
    info!("level {} clear, score {}", session.current_level().unwrap_or("?"), session.score);

    loop {
        session.level_index += 1;
        let Some(level) = session.current_level().map(str::to_owned) else {
            scheduler.stop();
            next.set(GameState::Victory);
            return;
        };
        if start_level(&level, &mut scheduler, &tunables, &mut spawns, &mut effects) {
            return;
        }
    }
}

fn report_outcome(state: Res<State<GameState>>, session: Res<Session>) {
    info!(
        "{:?}: score {}, coins {}, {:.1}s",
        state.get(),
        session.score,
        session.coins,
        session.elapsed
    );
}

pub fn request_restart(keys: Option<Res<ButtonInput<KeyCode>>>, mut writer: MessageWriter<RestartSession>) {
    if keys.is_some_and(|k| k.just_pressed(KeyCode::KeyR)) {
        writer.write(RestartSession);
    }
}

pub fn handle_restart(mut reader: MessageReader<RestartSession>, mut next: ResMut<NextState<GameState>>) {
    if reader.read().count() > 0 {
        info!("restarting session");
        next.set(GameState::Restarting);
    }
}

fn resume_play(mut next: ResMut<NextState<GameState>>) {
    next.set(GameState::InGame);
}
