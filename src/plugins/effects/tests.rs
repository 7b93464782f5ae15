use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::test_utils::{run_system_once, set_time_delta};
use crate::common::tunables::Tunables;

use super::*;

fn effect_world() -> World {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    world.init_resource::<Messages<EffectRequest>>();
    world
}

#[test]
fn requests_spawn_effects_at_their_position() {
    let mut world = effect_world();
    world.write_message(EffectRequest { kind: EffectKind::Explosion, pos: Vec2::new(5.0, 6.0) });
    world.write_message(EffectRequest { kind: EffectKind::Hit, pos: Vec2::ZERO });

    run_system_once(&mut world, spawn_effects);

    let mut q = world.query::<(&Effect, &Transform)>();
    let mut kinds: Vec<_> = q.iter(&world).map(|(fx, tf)| (fx.kind, tf.translation.truncate())).collect();
    kinds.sort_by_key(|(k, _)| *k as u8);
    assert_eq!(
        kinds,
        vec![(EffectKind::Explosion, Vec2::new(5.0, 6.0)), (EffectKind::Hit, Vec2::ZERO)]
    );
}

#[test]
fn effects_despawn_when_their_lifetime_ends() {
    let mut world = effect_world();
    world.write_message(EffectRequest { kind: EffectKind::Hit, pos: Vec2::ZERO });
    run_system_once(&mut world, spawn_effects);

    set_time_delta(&mut world, 0.05);
    run_system_once(&mut world, fade_effects);
    assert_eq!(world.query::<&Effect>().iter(&world).count(), 1);

    set_time_delta(&mut world, 0.2);
    run_system_once(&mut world, fade_effects);
    assert_eq!(world.query::<&Effect>().iter(&world).count(), 0);
}

#[test]
fn boss_warning_lasts_as_long_as_the_warning() {
    let tunables = Tunables { boss_warning_secs: 2.5, ..Tunables::default() };
    let (_, _, secs) = look(EffectKind::BossWarning, &tunables);
    assert_eq!(secs, 2.5);
}
