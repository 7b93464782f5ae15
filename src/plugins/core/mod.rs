//! Core plugin: shared resources, global settings and the frame tick order.

use crate::common::tunables::Tunables;
use bevy::prelude::*;

/// Fixed per-frame order. Later stages read state written by earlier ones.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameSet {
    /// Formation scheduler advances and writes enemy spawn requests.
    Waves,
    /// Spawn requests are turned into active pooled entities; weapons fire.
    Spawn,
    /// Movement, patterns, expiry; expired entities are committed back.
    Simulate,
    /// Collision sweep.
    Collide,
    /// Apply damage, score and deactivation.
    Resolve,
    /// Return deactivated entities to their pools.
    Commit,
    /// Level completion, game over.
    Complete,
}

pub fn plugin(app: &mut App) {
    if !app.world().contains_resource::<Tunables>() {
        app.insert_resource(Tunables::from_env());
    }
    app.insert_resource(ClearColor(Color::srgb(0.02, 0.02, 0.05)));
    app.configure_sets(
        Update,
        (
            FrameSet::Waves,
            FrameSet::Spawn,
            FrameSet::Simulate,
            FrameSet::Collide,
            FrameSet::Resolve,
            FrameSet::Commit,
            FrameSet::Complete,
        )
            .chain(),
    );
}
