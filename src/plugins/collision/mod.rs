//! Collision plugin: rule-driven AABB checks between category groups.
//!
//! ```text
//!   Collide set   detect_collisions: active bodies -> CollisionGroups -> resolver.sweep
//!                 -> FrameCollisions
//!   Resolve set   apply_collisions: damage, score, pickups, kills -> PoolState::PendingReturn
//!   Commit set    pool commits release whatever was deactivated
//! ```
//! The resolver reports every overlap it finds. First-match-wins belongs to the
//! resolve step: once an entity is deactivated or killed, later results that
//! touch it in the same frame are dropped.

pub mod resolver;
pub mod rules;

pub use resolver::{overlaps, CollisionBody, CollisionGroups, CollisionResolver, Sweep};
pub use rules::{
    default_rules, CategoryPair, CollisionError, CollisionResult, CollisionRule, Contact, CustomResolve,
};

use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use crate::common::category::Category;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::core::FrameSet;
use crate::plugins::effects::{EffectKind, EffectRequest};
use crate::plugins::enemies::{Enemy, EnemyKind};
use crate::plugins::items::{Item, SpawnItemRequest};
use crate::plugins::player::{Player, PlayerDefeated};
use crate::plugins::pool::{Health, Hitbox, PoolState};
use crate::plugins::projectiles::Bullet;
use crate::plugins::session::Session;

/// Results of this frame's sweep, consumed by the resolve step.
#[derive(Resource, Debug, Default)]
pub struct FrameCollisions {
    pub results: Vec<CollisionResult>,
    pub checks: usize,
    pub budget_exhausted: bool,
}

pub fn plugin(app: &mut App) {
    if !app.world().contains_resource::<CollisionResolver>() {
        let budget = app.world().resource::<Tunables>().collision_check_budget;
        app.insert_resource(CollisionResolver::with_default_rules(budget));
    }
    app.init_resource::<FrameCollisions>();

    app.add_systems(
        Update,
        detect_collisions
            .in_set(FrameSet::Collide)
            .run_if(in_state(GameState::InGame)),
    );
    app.add_systems(
        Update,
        apply_collisions
            .in_set(FrameSet::Resolve)
            .run_if(in_state(GameState::InGame)),
    );
}

/// Gather active bodies into category groups.
pub fn collect_groups(
    q: &Query<(Entity, &Category, &Transform, &Hitbox, Option<&PoolState>, Option<&Bullet>)>,
) -> CollisionGroups {
    let mut groups = CollisionGroups::new();
    for (entity, category, tf, hitbox, state, bullet) in q {
        if state.is_some_and(|s| !s.is_active()) {
            continue;
        }
        groups.entry(*category).or_default().push(CollisionBody {
            entity,
            category: *category,
            bounds: hitbox.bounds(tf.translation.truncate()),
            damage: bullet.map_or(0, |b| b.damage),
        });
    }
    // Query order is arbitrary; sort so the sweep is reproducible.
    for bodies in groups.values_mut() {
        bodies.sort_by_key(|body| body.entity);
    }
    groups
}

pub fn detect_collisions(
    resolver: Res<CollisionResolver>,
    mut frame: ResMut<FrameCollisions>,
    q: Query<(Entity, &Category, &Transform, &Hitbox, Option<&PoolState>, Option<&Bullet>)>,
) {
    let groups = collect_groups(&q);
    let sweep = resolver.sweep(&groups);
    if sweep.budget_exhausted {
        debug!("collision budget of {} checks exhausted", resolver.check_budget());
    }

    frame.results = sweep.results;
    frame.checks = sweep.checks;
    frame.budget_exhausted = sweep.budget_exhausted;
}

type Target<'a> = (
    &'a Transform,
    Option<Mut<'a, PoolState>>,
    Option<Mut<'a, Health>>,
    Option<Mut<'a, Player>>,
    Option<&'a Enemy>,
);

enum Casualty {
    Enemy(EnemyKind),
    Player,
}

struct SideOutcome {
    pos: Vec2,
    hurt: bool,
    casualty: Option<Casualty>,
}

/// Damage and deactivate one side of a result.
fn apply_side(target: Target<'_>, damage: i32, deactivate: bool, invulnerable_secs: f32) -> SideOutcome {
    let (tf, state, health, player, enemy) = target;
    let mut outcome = SideOutcome { pos: tf.translation.truncate(), hurt: false, casualty: None };

    if damage > 0
        && let Some(mut health) = health
    {
        let shielded = player.as_ref().is_some_and(|p| p.is_invulnerable());
        if !shielded {
            health.hp -= damage;
            outcome.hurt = true;
            if health.is_depleted() {
                outcome.casualty = match (enemy, player.is_some()) {
                    (Some(enemy), _) => Some(Casualty::Enemy(enemy.kind)),
                    (None, true) => Some(Casualty::Player),
                    (None, false) => None,
                };
            }
            if let Some(mut player) = player {
                player.shield(invulnerable_secs);
            }
        }
    }

    if (deactivate || outcome.casualty.is_some())
        && let Some(mut state) = state
    {
        state.retire();
    }
    outcome
}

/// Apply this frame's results: damage, deactivation, score, pickups and drops.
#[allow(clippy::too_many_arguments)]
pub fn apply_collisions(
    frame: Res<FrameCollisions>,
    tunables: Res<Tunables>,
    mut session: ResMut<Session>,
    q_items: Query<&Item>,
    mut q: Query<(&Transform, Option<&mut PoolState>, Option<&mut Health>, Option<&mut Player>, Option<&Enemy>)>,
    mut effects: MessageWriter<EffectRequest>,
    mut drops: MessageWriter<SpawnItemRequest>,
    mut defeated: MessageWriter<PlayerDefeated>,
) {
    let mut spent: HashSet<Entity> = HashSet::default();

    for result in &frame.results {
        if spent.contains(&result.entity_a) || spent.contains(&result.entity_b) {
            continue;
        }

        // Pickups: the item's effect lands on the player before the item goes away.
        let pickup = match (result.category_a, result.category_b) {
            (Category::Player, Category::Item) => Some((result.entity_a, result.entity_b)),
            (Category::Item, Category::Player) => Some((result.entity_b, result.entity_a)),
            _ => None,
        };
        if let Some((player_e, item_e)) = pickup
            && let Ok(item) = q_items.get(item_e)
            && let Ok((tf, _, Some(mut health), Some(mut player), _)) = q.get_mut(player_e)
        {
            let gained = item.kind.apply(&mut player, &mut health);
            session.coins += gained.coins;
            session.score += gained.score;
            effects.write(EffectRequest { kind: EffectKind::Pickup, pos: tf.translation.truncate() });
        }

        session.score += result.score;

        let sides = [
            (result.entity_a, result.damage_to_a, result.deactivate_a),
            (result.entity_b, result.damage_to_b, result.deactivate_b),
        ];
        for (entity, damage, deactivate) in sides {
            let Ok(target) = q.get_mut(entity) else {
                spent.insert(entity);
                continue;
            };
            let outcome = apply_side(target, damage, deactivate, tunables.player_invulnerable_secs);
            if deactivate || outcome.casualty.is_some() {
                spent.insert(entity);
            }

            match outcome.casualty {
                Some(Casualty::Enemy(kind)) => {
                    let profile = kind.profile();
                    session.score += profile.score;
                    effects.write(EffectRequest { kind: EffectKind::Explosion, pos: outcome.pos });
                    if let Some(item) = profile.drop {
                        drops.write(SpawnItemRequest { kind: item, pos: outcome.pos });
                    }
                    debug!("{kind:?} destroyed (+{})", profile.score);
                }
                Some(Casualty::Player) => {
                    effects.write(EffectRequest { kind: EffectKind::Explosion, pos: outcome.pos });
                    defeated.write(PlayerDefeated);
                    info!("player destroyed");
                }
                None if outcome.hurt => {
                    effects.write(EffectRequest { kind: EffectKind::Hit, pos: outcome.pos });
                }
                None => {}
            }
        }
    }
}
