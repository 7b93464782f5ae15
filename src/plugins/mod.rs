//! Feature plugins.

use bevy::prelude::*;

pub mod collision;
pub mod core;
pub mod debug;
pub mod effects;
pub mod enemies;
pub mod items;
pub mod player;
pub mod pool;
pub mod projectiles;
pub mod session;
pub mod waves;

// Render-only
pub mod camera;

/// Register gameplay plugins that work in headless tests.
///
/// `core` goes first: later plugins read `Tunables` while building.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    pool::plugin(app);
    effects::plugin(app);
    player::plugin(app);
    enemies::plugin(app);
    projectiles::plugin(app);
    items::plugin(app);
    waves::plugin(app);
    collision::plugin(app);
    session::plugin(app);
    debug::plugin(app);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    camera::plugin(app);
}

/// Register all plugins (full app).
pub fn register_all(app: &mut App) {
    register_gameplay(app);
    register_render(app);
}
