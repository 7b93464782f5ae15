//! Debug surface: commands for poking at the running game.
//!
//! Commands arrive as `DebugCommand` messages (hotkeys in the windowed app,
//! direct writes in tests) and are handled in the `Waves` set, so a spawned
//! formation is allocated in the same frame.
//!
//! | key | command                                    |
//! |-----|--------------------------------------------|
//! | F1  | `ReportProgress`                           |
//! | F2  | `ListIds`                                  |
//! | F3  | `SpawnFormation` of the first formation id |
//! | F4  | toggle bullet damage to the player         |

use bevy::prelude::*;

use crate::common::category::Category;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::collision::CollisionResolver;
use crate::plugins::core::FrameSet;
use crate::plugins::enemies::SpawnEnemyRequest;
use crate::plugins::session::Session;
use crate::plugins::waves::WaveScheduler;

#[derive(Message, Clone, Debug, PartialEq)]
pub enum DebugCommand {
    /// Spawn every enemy of a formation right now, ignoring delays.
    SpawnFormation(String),
    ReportProgress,
    ListIds,
    SetRuleEnabled { a: Category, b: Category, enabled: bool },
}

pub fn plugin(app: &mut App) {
    app.add_message::<DebugCommand>().add_systems(
        Update,
        (debug_hotkeys, handle_debug_commands)
            .chain()
            .in_set(FrameSet::Waves)
            .run_if(in_state(GameState::InGame)),
    );
}

pub fn debug_hotkeys(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    scheduler: Res<WaveScheduler>,
    resolver: Res<CollisionResolver>,
    mut writer: MessageWriter<DebugCommand>,
) {
    let Some(keys) = keys else {
        return;
    };

    if keys.just_pressed(KeyCode::F1) {
        writer.write(DebugCommand::ReportProgress);
    }
    if keys.just_pressed(KeyCode::F2) {
        writer.write(DebugCommand::ListIds);
    }
    if keys.just_pressed(KeyCode::F3)
        && let Some(id) = scheduler.library().formation_ids().next()
    {
        writer.write(DebugCommand::SpawnFormation(id.to_string()));
    }
    if keys.just_pressed(KeyCode::F4) {
        let enabled = !resolver
            .rule(Category::Player, Category::EnemyBullet)
            .is_some_and(|r| r.enabled);
        for b in [Category::EnemyBullet, Category::BossBullet] {
            writer.write(DebugCommand::SetRuleEnabled { a: Category::Player, b, enabled });
        }
    }
}

pub fn handle_debug_commands(
    tunables: Res<Tunables>,
    scheduler: Res<WaveScheduler>,
    session: Res<Session>,
    mut resolver: ResMut<CollisionResolver>,
    mut reader: MessageReader<DebugCommand>,
    mut spawns: MessageWriter<SpawnEnemyRequest>,
) {
    for command in reader.read() {
        match command {
            DebugCommand::SpawnFormation(id) => match scheduler.spawn_formation_now(id) {
                Ok(enemies) => {
                    info!("debug: spawning {} enemies of `{id}`", enemies.len());
                    for spawn in enemies {
                        spawns.write(SpawnEnemyRequest {
                            kind: spawn.kind,
                            pos: tunables.to_world(spawn.reference_position()),
                        });
                    }
                }
                Err(err) => warn!("debug: {err}"),
            },
            DebugCommand::ReportProgress => match scheduler.progress() {
                Some(p) => info!(
                    "debug: {} wave {}/{} `{}` {}/{} spawned, {:?} | score {} coins {} {:.1}s",
                    p.level,
                    p.wave_index + 1,
                    p.wave_count,
                    p.formation,
                    p.spawned,
                    p.total,
                    p.phase,
                    session.score,
                    session.coins,
                    session.elapsed
                ),
                None => info!("debug: no level running"),
            },
            DebugCommand::ListIds => {
                let library = scheduler.library();
                info!("debug: formations {:?}", library.formation_ids().collect::<Vec<_>>());
                info!("debug: levels {:?}", library.level_order());
            }
            DebugCommand::SetRuleEnabled { a, b, enabled } => {
                if resolver.set_enabled(*a, *b, *enabled) {
                    info!("debug: rule {a:?}/{b:?} enabled = {enabled}");
                } else {
                    warn!("debug: no collision rule for {a:?}/{b:?}");
                }
            }
        }
    }
}
