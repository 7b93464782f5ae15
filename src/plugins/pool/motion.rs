//! Per-tick advance of everything that moves: integrate velocity, then retire
//! pooled entities that left the playfield.

use bevy::prelude::*;

use crate::common::category::Category;
use crate::common::tunables::Tunables;

use super::components::{PoolState, Velocity};

/// Slack around the playfield before an entity counts as gone.
#[inline]
pub fn cull_bounds(category: Category, playfield: Rect) -> Rect {
    match category {
        // Enemies enter from above the top edge, so give them a tall ceiling.
        c if c.is_hostile() => Rect::from_corners(
            playfield.min - Vec2::new(200.0, 64.0),
            playfield.max + Vec2::new(200.0, 600.0),
        ),
        Category::Item => playfield.inflate(32.0),
        Category::Player => playfield,
        _ => playfield.inflate(16.0),
    }
}

/// Move active pooled entities and the player by their velocity.
pub fn integrate_velocity(time: Res<Time>, mut q: Query<(&mut Transform, &Velocity, Option<&PoolState>)>) {
    let dt = time.delta_secs();
    for (mut tf, vel, state) in &mut q {
        if state.is_some_and(|s| !s.is_active()) {
            continue;
        }
        tf.translation.x += vel.x * dt;
        tf.translation.y += vel.y * dt;
    }
}

/// Flag pooled entities outside their cull bounds for return.
pub fn cull_offscreen(tunables: Res<Tunables>, mut q: Query<(&Transform, &Category, &mut PoolState)>) {
    let playfield = tunables.playfield();
    for (tf, category, mut state) in &mut q {
        if !state.is_active() {
            continue;
        }
        if !cull_bounds(*category, playfield).contains(tf.translation.truncate()) {
            state.retire();
        }
    }
}
