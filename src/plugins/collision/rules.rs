//! Collision rules: what happens when two categories overlap.

use std::fmt;
use std::sync::Arc;

use bevy::prelude::*;
use thiserror::Error;

use crate::common::category::Category;

use super::resolver::CollisionBody;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CollisionError {
    #[error("collision callback for {a:?}/{b:?} failed: {reason}")]
    Callback { a: Category, b: Category, reason: String },
    #[error("a category never collides with itself ({0:?})")]
    SelfPair(Category),
}

/// Unordered pair of categories; `(a, b)` and `(b, a)` are the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CategoryPair(Category, Category);

impl CategoryPair {
    pub fn new(a: Category, b: Category) -> Self {
        if a <= b { Self(a, b) } else { Self(b, a) }
    }

    #[inline]
    pub fn is_self_pair(self) -> bool {
        self.0 == self.1
    }
}

/// Outcome of one overlap, oriented to the rule: side A is always the rule's
/// `a` category.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    pub entity_a: Entity,
    pub entity_b: Entity,
    pub category_a: Category,
    pub category_b: Category,
    pub damage_to_a: i32,
    pub damage_to_b: i32,
    pub score: u64,
    pub deactivate_a: bool,
    pub deactivate_b: bool,
}

/// What a custom callback sees: both bodies (oriented to the rule) and the
/// result the static fields would have produced.
#[derive(Debug, Clone, Copy)]
pub struct Contact {
    pub a: CollisionBody,
    pub b: CollisionBody,
    pub base: CollisionResult,
}

pub type CustomResolve =
    Arc<dyn Fn(&Contact) -> Result<Option<CollisionResult>, CollisionError> + Send + Sync>;

#[derive(Clone)]
pub struct CollisionRule {
    pub a: Category,
    pub b: Category,
    pub damage_to_a: i32,
    pub damage_to_b: i32,
    pub deactivate_a: bool,
    pub deactivate_b: bool,
    pub score: u64,
    pub custom: Option<CustomResolve>,
    pub enabled: bool,
}

impl fmt::Debug for CollisionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollisionRule")
            .field("a", &self.a)
            .field("b", &self.b)
            .field("damage_to_a", &self.damage_to_a)
            .field("damage_to_b", &self.damage_to_b)
            .field("deactivate_a", &self.deactivate_a)
            .field("deactivate_b", &self.deactivate_b)
            .field("score", &self.score)
            .field("custom", &self.custom.is_some())
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl CollisionRule {
    pub fn new(a: Category, b: Category) -> Self {
        Self {
            a,
            b,
            damage_to_a: 0,
            damage_to_b: 0,
            deactivate_a: false,
            deactivate_b: false,
            score: 0,
            custom: None,
            enabled: true,
        }
    }

    pub fn damage_to_a(mut self, amount: i32) -> Self {
        self.damage_to_a = amount;
        self
    }

    pub fn damage_to_b(mut self, amount: i32) -> Self {
        self.damage_to_b = amount;
        self
    }

    pub fn deactivate_a(mut self) -> Self {
        self.deactivate_a = true;
        self
    }

    pub fn deactivate_b(mut self) -> Self {
        self.deactivate_b = true;
        self
    }

    pub fn score(mut self, score: u64) -> Self {
        self.score = score;
        self
    }

    pub fn resolve_with(
        mut self,
        f: impl Fn(&Contact) -> Result<Option<CollisionResult>, CollisionError> + Send + Sync + 'static,
    ) -> Self {
        self.custom = Some(Arc::new(f));
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    #[inline]
    pub fn pair(&self) -> CategoryPair {
        CategoryPair::new(self.a, self.b)
    }

    /// Result built from the static fields only.
    pub fn static_result(&self, a: &CollisionBody, b: &CollisionBody) -> CollisionResult {
        CollisionResult {
            entity_a: a.entity,
            entity_b: b.entity,
            category_a: self.a,
            category_b: self.b,
            damage_to_a: self.damage_to_a,
            damage_to_b: self.damage_to_b,
            score: self.score,
            deactivate_a: self.deactivate_a,
            deactivate_b: self.deactivate_b,
        }
    }
}

/// Bullet on side A: its payload becomes the damage to side B.
fn bullet_strikes_b(contact: &Contact) -> Result<Option<CollisionResult>, CollisionError> {
    if contact.a.damage <= 0 {
        return Err(CollisionError::Callback {
            a: contact.a.category,
            b: contact.b.category,
            reason: format!("bullet {:?} carries no damage", contact.a.entity),
        });
    }
    Ok(Some(CollisionResult { damage_to_b: contact.a.damage, ..contact.base }))
}

/// Bullet on side B: its payload becomes the damage to side A.
fn bullet_strikes_a(contact: &Contact) -> Result<Option<CollisionResult>, CollisionError> {
    if contact.b.damage <= 0 {
        return Err(CollisionError::Callback {
            a: contact.a.category,
            b: contact.b.category,
            reason: format!("bullet {:?} carries no damage", contact.b.entity),
        });
    }
    Ok(Some(CollisionResult { damage_to_a: contact.b.damage, ..contact.base }))
}

/// Rule table for the game's categories.
///
/// | A            | B           | outcome                                   |
/// |--------------|-------------|-------------------------------------------|
/// | PlayerBullet | Enemy       | bullet spent, payload damage, 10 points   |
/// | PlayerBullet | Boss        | bullet spent, payload damage, 20 points   |
/// | Player       | EnemyBullet | payload damage to player, bullet spent    |
/// | Player       | BossBullet  | payload damage to player, bullet spent    |
/// | Player       | Enemy       | ram: 1 to player, 3 to enemy              |
/// | Player       | Boss        | ram: 1 to player                          |
/// | Player       | Item        | item collected                            |
pub fn default_rules() -> Vec<CollisionRule> {
    use Category::*;
    vec![
        CollisionRule::new(PlayerBullet, Enemy).deactivate_a().score(10).resolve_with(bullet_strikes_b),
        CollisionRule::new(PlayerBullet, Boss).deactivate_a().score(20).resolve_with(bullet_strikes_b),
        CollisionRule::new(Player, EnemyBullet).deactivate_b().resolve_with(bullet_strikes_a),
        CollisionRule::new(Player, BossBullet).deactivate_b().resolve_with(bullet_strikes_a),
        CollisionRule::new(Player, Enemy).damage_to_a(1).damage_to_b(3),
        CollisionRule::new(Player, Boss).damage_to_a(1),
        CollisionRule::new(Player, Item).deactivate_b(),
    ]
}
