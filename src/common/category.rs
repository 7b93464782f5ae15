//! Collision categories.

use bevy::prelude::*;

/// Gameplay category of a collidable entity.
///
/// The resolver looks rules up by unordered pairs of these.
#[derive(Component, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Player,
    PlayerBullet,
    Enemy,
    EnemyBullet,
    Boss,
    BossBullet,
    Item,
}

impl Category {
    #[inline]
    pub fn is_hostile(self) -> bool {
        matches!(self, Category::Enemy | Category::Boss)
    }
}
