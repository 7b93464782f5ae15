//! End-to-end: the player fires, a bullet destroys an enemy, the level clears.

mod common;

use bevy::prelude::*;
use formation_shooter::common::state::GameState;
use formation_shooter::plugins::enemies::{EnemyKind, EnemyPool};
use formation_shooter::plugins::projectiles::BulletPool;
use formation_shooter::plugins::session::Session;

/// One inferior straight above the player's spawn point.
const TARGET_PRACTICE: &str = r#"{
    "formations": { "target": { "name": "Target", "enemies": [ { "type": "inferior", "x": 640, "y": 300, "delay": 0 } ] } },
    "levels": { "range": { "waves": ["target"], "waveDelay": 1.0 } }
}"#;

#[test]
fn held_fire_destroys_the_enemy_and_scores() {
    let mut app = common::app_with_data(TARGET_PRACTICE);
    common::hold_key(&mut app, KeyCode::Space);

    let mut killed_at = None;
    for frame in 0..120 {
        app.update();
        let world = app.world();
        assert!(world.resource::<EnemyPool>().invariant_holds());
        assert!(world.resource::<BulletPool>().invariant_holds());
        if world.resource::<Session>().score > 0 {
            killed_at = Some(frame);
            break;
        }
    }

    assert!(killed_at.is_some(), "enemy was never hit");
    let session = app.world().resource::<Session>();
    assert_eq!(session.score, 10 + EnemyKind::Inferior.profile().score);
    assert_eq!(app.world().resource::<EnemyPool>().active_count(), 0);
}

#[test]
fn clearing_the_only_level_is_a_victory() {
    let mut app = common::app_with_data(TARGET_PRACTICE);
    common::hold_key(&mut app, KeyCode::Space);

    common::frames(&mut app, 120);

    assert_eq!(common::state(&app), GameState::Victory);
    // Teardown handed everything back.
    assert_eq!(app.world().resource::<BulletPool>().active_count(), 0);
}
