mod common;

use bevy::prelude::*;
use formation_shooter::common::tunables::Tunables;
use formation_shooter::plugins::enemies::{Enemy, EnemyKind, EnemyPool};
use formation_shooter::plugins::pool::PoolState;

const ONE_INFERIOR: &str = r#"{
    "formations": { "solo": { "name": "Solo", "enemies": [ { "type": "inferior", "x": 100, "y": -50, "delay": 0 } ] } },
    "levels": { "only": { "waves": ["solo"], "waveDelay": 1.0 } }
}"#;

const STAGGERED: &str = r#"{
    "formations": { "stagger": { "name": "Stagger", "enemies": [
        { "type": "inferior", "x": 200, "y": -40, "delay": 0.5 },
        { "type": "inferior", "x": 400, "y": -40, "delay": 0 },
        { "type": "fighter",  "x": 600, "y": -40, "delay": 1.0 }
    ] } },
    "levels": { "only": { "waves": ["stagger"], "waveDelay": 1.0 } }
}"#;

fn active_enemies(app: &mut App) -> Vec<(EnemyKind, Vec2)> {
    let world = app.world_mut();
    let mut q = world.query::<(&Enemy, &Transform, &PoolState)>();
    q.iter(world)
        .filter(|(_, _, state)| state.is_active())
        .map(|(enemy, tf, _)| (enemy.kind, tf.translation.truncate()))
        .collect()
}

#[test]
fn single_inferior_spawns_at_its_reference_position() {
    let mut app = common::app_with_data(ONE_INFERIOR);
    common::frames(&mut app, 1);

    let enemies = active_enemies(&mut app);
    assert_eq!(enemies.len(), 1);
    let (kind, pos) = enemies[0];
    assert_eq!(kind, EnemyKind::Inferior);

    let expected = Tunables::default().to_world(Vec2::new(100.0, -50.0));
    // At most one frame of diving.
    assert!((pos - expected).length() < 2.0, "{pos} vs {expected}");
}

#[test]
fn staggered_spawns_arrive_over_time() {
    let mut app = common::app_with_data(STAGGERED);

    common::frames(&mut app, 1);
    assert_eq!(app.world().resource::<EnemyPool>().active_count(), 1);

    // ~0.56 s in: the half-second spawn is out, the fighter is not.
    common::frames(&mut app, 34);
    assert_eq!(app.world().resource::<EnemyPool>().active_count(), 2);

    common::frames(&mut app, 40);
    let kinds: Vec<_> = active_enemies(&mut app).into_iter().map(|(k, _)| k).collect();
    assert_eq!(kinds.len(), 3);
    assert!(kinds.contains(&EnemyKind::Fighter));
}
