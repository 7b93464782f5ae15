//! Buffered spawn requests.
//!
//! We use bevy **Messages** here instead of direct pool access.
//! - producers (player gun, enemy weapons) create *intent*
//! - the allocator applies intent (pool acquire + component writes)
//!
//! This is a producer → queue → consumer pipeline.

use bevy::prelude::*;

use crate::common::category::Category;
use crate::plugins::pool::PoolKey;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BulletKind {
    Player,
    Enemy,
    Boss,
}

impl PoolKey for BulletKind {
    fn all() -> &'static [Self] {
        &[BulletKind::Player, BulletKind::Enemy, BulletKind::Boss]
    }
}

impl BulletKind {
    #[inline]
    pub fn category(self) -> Category {
        match self {
            BulletKind::Player => Category::PlayerBullet,
            BulletKind::Enemy => Category::EnemyBullet,
            BulletKind::Boss => Category::BossBullet,
        }
    }

    #[inline]
    pub fn half_size(self) -> Vec2 {
        match self {
            BulletKind::Player => Vec2::new(3.0, 8.0),
            BulletKind::Enemy => Vec2::splat(5.0),
            BulletKind::Boss => Vec2::splat(7.0),
        }
    }

    #[inline]
    pub fn color(self) -> Color {
        match self {
            BulletKind::Player => Color::srgb(1.0, 0.85, 0.3),
            BulletKind::Enemy => Color::srgb(1.0, 0.4, 0.3),
            BulletKind::Boss => Color::srgb(0.95, 0.3, 0.9),
        }
    }
}

#[derive(Message, Clone, Copy, Debug)]
pub struct SpawnBulletRequest {
    pub kind: BulletKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: i32,
}
