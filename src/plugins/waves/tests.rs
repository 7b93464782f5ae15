use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::test_utils::{run_system_once, set_time_delta};
use crate::common::tunables::Tunables;
use crate::plugins::effects::EffectRequest;
use crate::plugins::enemies::{EnemyKind, SpawnEnemyRequest};

use super::*;

const TICK: f32 = 0.016;

fn library(json: &str) -> FormationLibrary {
    FormationLibrary::from_json_str(json).expect("valid test data")
}

fn spawns(events: &[WaveEvent]) -> Vec<EnemySpawn> {
    events
        .iter()
        .filter_map(|e| match e {
            WaveEvent::Spawn(s) => Some(*s),
            _ => None,
        })
        .collect()
}

/// Run `update` in `TICK` steps for `secs` seconds, collecting all spawns.
fn run_for(scheduler: &mut WaveScheduler, secs: f32) -> Vec<EnemySpawn> {
    let mut out = Vec::new();
    let steps = (secs / TICK).ceil() as usize;
    for _ in 0..steps {
        out.extend(spawns(&scheduler.update(TICK)));
    }
    out
}

const SINGLE_INFERIOR: &str = r#"{
    "formations": { "solo": { "name": "Solo", "enemies": [ { "type": "inferior", "x": 100, "y": -50, "delay": 0 } ] } },
    "levels": { "level_1": { "waves": ["solo"], "waveDelay": 2 } }
}"#;

const TWO_WAVES: &str = r#"{
    "formations": {
        "first":  { "name": "First",  "enemies": [ { "type": "inferior", "x": 100, "y": -50, "delay": 0 } ] },
        "second": { "name": "Second", "enemies": [ { "type": "fighter",  "x": 300, "y": -50, "delay": 0.5 } ] }
    },
    "levels": { "level_1": { "waves": ["first", "second"], "waveDelay": 5 } }
}"#;

// -----------------------------------------------------------------------------
// Data
// -----------------------------------------------------------------------------

#[test]
fn builtin_data_parses_and_is_consistent() {
    let lib = FormationLibrary::builtin().expect("built-in formations");
    assert!(lib.dangling_references().is_empty());
    assert_eq!(lib.level_order(), vec!["level_1", "level_2", "level_3"]);

    let last = lib.level("level_3").expect("level_3");
    let boss_id = last.waves.last().expect("boss wave");
    let boss = lib.formation(boss_id).expect("boss formation");
    assert!(data::is_boss_formation(boss_id, boss));
}

#[test]
fn malformed_data_is_an_error() {
    assert!(matches!(FormationLibrary::from_json_str("{ not json"), Err(DataError::Json(_))));
    // Unknown enemy type.
    let bad_type = r#"{ "formations": { "f": { "enemies": [ { "type": "dragon", "x": 0, "y": 0 } ] } } }"#;
    assert!(matches!(FormationLibrary::from_json_str(bad_type), Err(DataError::Json(_))));
}

#[test]
fn negative_delays_are_rejected() {
    let bad_spawn = r#"{ "formations": { "f": { "enemies": [ { "type": "inferior", "x": 0, "y": 0, "delay": -1 } ] } } }"#;
    assert!(matches!(
        FormationLibrary::from_json_str(bad_spawn),
        Err(DataError::BadSpawnDelay { .. })
    ));

    let bad_wave = r#"{ "levels": { "l": { "waves": [], "waveDelay": -2 } } }"#;
    assert!(matches!(
        FormationLibrary::from_json_str(bad_wave),
        Err(DataError::BadWaveDelay { .. })
    ));
}

#[test]
fn missing_file_falls_back_to_builtin() {
    let lib = FormationLibrary::load_or_fallback(std::path::Path::new("/definitely/not/here.json"));
    assert_eq!(lib, FormationLibrary::builtin().expect("built-in formations"));
}

#[test]
fn level_order_defaults_to_sorted_ids() {
    let lib = library(
        r#"{ "levels": { "b": { "waves": [], "waveDelay": 0 }, "a": { "waves": [], "waveDelay": 0 } } }"#,
    );
    assert_eq!(lib.level_order(), vec!["a", "b"]);
}

#[test]
fn sequence_must_name_known_levels() {
    let json = r#"{ "levels": { "a": { "waves": [], "waveDelay": 0 } }, "sequence": ["a", "z"] }"#;
    assert!(matches!(
        FormationLibrary::from_json_str(json),
        Err(DataError::UnknownSequenceLevel(id)) if id == "z"
    ));
}

// -----------------------------------------------------------------------------
// Scheduler
// -----------------------------------------------------------------------------

#[test]
fn unknown_level_fails_to_start() {
    let mut scheduler = WaveScheduler::new(library(SINGLE_INFERIOR), 3.0);
    assert_eq!(
        scheduler.start_level("level_9"),
        Err(WaveError::UnknownLevel("level_9".into()))
    );
    assert_eq!(scheduler.phase(), WavePhase::Idle);
}

#[test]
fn single_inferior_spawns_after_one_tick() {
    let mut scheduler = WaveScheduler::new(library(SINGLE_INFERIOR), 3.0);
    scheduler.start_level("level_1").expect("known level");

    let spawned = spawns(&scheduler.update(TICK));
    assert_eq!(spawned.len(), 1);
    assert_eq!(spawned[0].kind, EnemyKind::Inferior);
    assert_eq!(spawned[0].reference_position(), Vec2::new(100.0, -50.0));

    // Never again.
    assert!(run_for(&mut scheduler, 1.0).is_empty());
}

#[test]
fn every_enemy_spawns_exactly_once_by_max_delay() {
    let json = r#"{
        "formations": { "spread": { "enemies": [
            { "type": "inferior", "x": 0,  "y": 0, "delay": 0.9 },
            { "type": "inferior", "x": 10, "y": 0, "delay": 0.1 },
            { "type": "fighter",  "x": 20, "y": 0, "delay": 0.5 },
            { "type": "gunship",  "x": 30, "y": 0, "delay": 1.3 }
        ] } },
        "levels": { "l": { "waves": ["spread"], "waveDelay": 1 } }
    }"#;
    let mut scheduler = WaveScheduler::new(library(json), 3.0);
    scheduler.start_level("l").expect("known level");

    let spawned = run_for(&mut scheduler, 1.3 + 0.05);
    assert_eq!(spawned.len(), 4);
    let mut xs: Vec<f32> = spawned.iter().map(|s| s.x).collect();
    xs.sort_by(f32::total_cmp);
    assert_eq!(xs, vec![0.0, 10.0, 20.0, 30.0]);

    // In delay order.
    assert_eq!(spawned.iter().map(|s| s.x).collect::<Vec<_>>(), vec![10.0, 20.0, 0.0, 30.0]);
}

#[test]
fn equal_delays_spawn_in_insertion_order() {
    let json = r#"{
        "formations": { "row": { "enemies": [
            { "type": "inferior", "x": 3, "y": 0, "delay": 0.2 },
            { "type": "inferior", "x": 1, "y": 0, "delay": 0.2 },
            { "type": "inferior", "x": 2, "y": 0, "delay": 0.2 }
        ] } },
        "levels": { "l": { "waves": ["row"], "waveDelay": 0 } }
    }"#;
    let mut scheduler = WaveScheduler::new(library(json), 3.0);
    scheduler.start_level("l").expect("known level");

    let spawned = spawns(&scheduler.update(1.0));
    assert_eq!(spawned.iter().map(|s| s.x).collect::<Vec<_>>(), vec![3.0, 1.0, 2.0]);
}

#[test]
fn two_wave_level_completes_only_after_second_wave() {
    let mut scheduler = WaveScheduler::new(library(TWO_WAVES), 3.0);
    scheduler.start_level("level_1").expect("known level");

    assert_eq!(run_for(&mut scheduler, 0.1).len(), 1);
    assert!(!scheduler.is_level_complete());
    assert!(matches!(scheduler.phase(), WavePhase::Intermission { .. }));

    // Still inside the 5 s wave delay.
    assert!(run_for(&mut scheduler, 4.5).is_empty());
    assert!(!scheduler.is_level_complete());

    // Delay elapses, then the second formation's 0.5 s spawn delay.
    let second = run_for(&mut scheduler, 1.2);
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].kind, EnemyKind::Fighter);
    assert!(scheduler.is_level_complete());
}

#[test]
fn empty_formation_does_not_stall() {
    let json = r#"{
        "formations": {
            "nothing": { "enemies": [] },
            "one": { "enemies": [ { "type": "inferior", "x": 0, "y": 0, "delay": 0 } ] }
        },
        "levels": { "l": { "waves": ["nothing", "one"], "waveDelay": 1 } }
    }"#;
    let mut scheduler = WaveScheduler::new(library(json), 3.0);
    scheduler.start_level("l").expect("known level");

    let events = scheduler.update(TICK);
    assert!(events.contains(&WaveEvent::WaveFilled { wave_index: 0 }));
    assert!(matches!(scheduler.phase(), WavePhase::Intermission { .. }));

    assert_eq!(run_for(&mut scheduler, 1.1).len(), 1);
    assert!(scheduler.is_level_complete());
}

#[test]
fn zero_delay_chain_of_empty_waves_completes_in_one_tick() {
    let json = r#"{
        "formations": { "nothing": { "enemies": [] } },
        "levels": { "l": { "waves": ["nothing", "nothing", "nothing"], "waveDelay": 0 } }
    }"#;
    let mut scheduler = WaveScheduler::new(library(json), 3.0);
    scheduler.start_level("l").expect("known level");
    scheduler.update(0.0);
    assert!(scheduler.is_level_complete());
}

#[test]
fn unknown_formation_in_level_is_skipped() {
    let json = r#"{
        "formations": { "one": { "enemies": [ { "type": "inferior", "x": 0, "y": 0, "delay": 0 } ] } },
        "levels": { "l": { "waves": ["ghost", "one"], "waveDelay": 0 } }
    }"#;
    let lib = library(json);
    assert_eq!(lib.dangling_references(), vec![("l".to_string(), "ghost".to_string())]);

    let mut scheduler = WaveScheduler::new(lib, 3.0);
    let started = scheduler.start_level("l").expect("known level");
    assert!(started.contains(&WaveEvent::WaveSkipped { wave_index: 0, formation: "ghost".into() }));

    assert_eq!(spawns(&scheduler.update(TICK)).len(), 1);
    assert!(scheduler.is_level_complete());
}

#[test]
fn boss_wave_waits_for_warning() {
    let json = r#"{
        "formations": { "boss_final": { "enemies": [ { "type": "boss", "x": 640, "y": -120, "delay": 0 } ] } },
        "levels": { "l": { "waves": ["boss_final"], "waveDelay": 0 } }
    }"#;
    let mut scheduler = WaveScheduler::new(library(json), 2.0);
    let started = scheduler.start_level("l").expect("known level");
    assert!(started.iter().any(|e| matches!(e, WaveEvent::BossWarning { .. })));

    assert!(run_for(&mut scheduler, 1.9).is_empty());
    assert!(matches!(scheduler.phase(), WavePhase::BossWarning { .. }));

    let spawned = run_for(&mut scheduler, 0.2);
    assert_eq!(spawned.len(), 1);
    assert_eq!(spawned[0].kind, EnemyKind::Boss);
}

#[test]
fn boss_flag_marks_a_boss_wave() {
    let json = r#"{
        "formations": { "finale": { "boss": true, "enemies": [ { "type": "boss", "x": 0, "y": 0 } ] } },
        "levels": { "l": { "waves": ["finale"], "waveDelay": 0 } }
    }"#;
    let mut scheduler = WaveScheduler::new(library(json), 1.0);
    scheduler.start_level("l").expect("known level");
    assert!(matches!(scheduler.phase(), WavePhase::BossWarning { .. }));
}

#[test]
fn restart_resets_the_run() {
    let mut scheduler = WaveScheduler::new(library(TWO_WAVES), 3.0);
    scheduler.start_level("level_1").expect("known level");
    run_for(&mut scheduler, 0.1);

    scheduler.start_level("level_1").expect("known level");
    let progress = scheduler.progress().expect("running");
    assert_eq!(progress.wave_index, 0);
    assert_eq!(progress.spawned, 0);
    assert_eq!(progress.wave_count, 2);

    scheduler.stop();
    assert_eq!(scheduler.phase(), WavePhase::Idle);
    assert!(scheduler.progress().is_none());
}

#[test]
fn spawn_formation_now_returns_every_enemy() {
    let scheduler = WaveScheduler::new(library(TWO_WAVES), 3.0);
    assert_eq!(scheduler.spawn_formation_now("second").expect("known").len(), 1);
    assert_eq!(
        scheduler.spawn_formation_now("nope"),
        Err(WaveError::UnknownFormation("nope".into()))
    );
}

// -----------------------------------------------------------------------------
// System
// -----------------------------------------------------------------------------

#[test]
fn advance_waves_writes_world_space_spawn_requests() {
    let mut world = World::new();
    world.init_resource::<Messages<SpawnEnemyRequest>>();
    world.init_resource::<Messages<EffectRequest>>();
    world.insert_resource(Tunables::default());

    let mut scheduler = WaveScheduler::new(library(SINGLE_INFERIOR), 3.0);
    scheduler.start_level("level_1").expect("known level");
    world.insert_resource(scheduler);
    set_time_delta(&mut world, TICK);

    run_system_once(&mut world, advance_waves);

    let requests = world.resource::<Messages<SpawnEnemyRequest>>();
    let written: Vec<_> = requests.iter_current_update_messages().copied().collect();
    assert_eq!(written.len(), 1);
    assert_eq!(written[0].kind, EnemyKind::Inferior);
    assert_eq!(written[0].pos, Tunables::default().to_world(Vec2::new(100.0, -50.0)));
}
