use bevy::prelude::*;

use super::pool::PoolKey;

/// Lifecycle of a pooled entity.
///
/// `PendingReturn` is the "update flipped the active flag" state: the entity is
/// still in its pool's active list until the commit system releases it.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PoolState {
    #[default]
    Inactive,
    Active,
    PendingReturn,
}

impl PoolState {
    #[inline]
    pub fn is_active(self) -> bool {
        self == PoolState::Active
    }

    /// Flag an active entity for release. Returns false if it was not active.
    #[inline]
    pub fn retire(&mut self) -> bool {
        if *self != PoolState::Active {
            return false;
        }
        *self = PoolState::PendingReturn;
        true
    }
}

/// Which pool (and which type key inside it) owns this entity.
#[derive(Component, Debug, Clone, Copy)]
pub struct Pooled<K: PoolKey> {
    pub kind: K,
}

#[derive(Component, Debug, Clone, Copy, Default, Deref, DerefMut)]
pub struct Velocity(pub Vec2);

/// Axis-aligned hitbox centred on the entity's translation.
#[derive(Component, Debug, Clone, Copy)]
pub struct Hitbox {
    pub half_size: Vec2,
}

impl Hitbox {
    #[inline]
    pub fn square(half: f32) -> Self {
        Self { half_size: Vec2::splat(half) }
    }

    #[inline]
    pub fn bounds(&self, center: Vec2) -> Rect {
        Rect::from_center_half_size(center, self.half_size)
    }
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Health {
    pub hp: i32,
    pub max: i32,
}

impl Health {
    #[inline]
    pub fn full(max: i32) -> Self {
        Self { hp: max, max }
    }

    #[inline]
    pub fn is_depleted(&self) -> bool {
        self.hp <= 0
    }

    #[inline]
    pub fn heal(&mut self, amount: i32) {
        self.hp = (self.hp + amount).min(self.max);
    }
}
