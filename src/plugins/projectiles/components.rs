use bevy::prelude::*;

use super::messages::BulletKind;

#[derive(Component, Debug, Clone)]
pub struct Bullet {
    pub kind: BulletKind,
    pub damage: i32,
}

impl Bullet {
    #[inline]
    pub fn reset_for_fire(&mut self, damage: i32) {
        self.damage = damage;
    }
}
