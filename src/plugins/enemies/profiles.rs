//! Per-type enemy data. One concrete entity shape; capabilities are optional
//! fields rather than subclasses.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::common::category::Category;
use crate::plugins::items::ItemKind;
use crate::plugins::pool::PoolKey;
use crate::plugins::projectiles::BulletKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Inferior,
    Fighter,
    Gunship,
    Boss,
}

impl PoolKey for EnemyKind {
    fn all() -> &'static [Self] {
        &[EnemyKind::Inferior, EnemyKind::Fighter, EnemyKind::Gunship, EnemyKind::Boss]
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MovementPattern {
    /// Straight down.
    Dive,
    /// Down while oscillating horizontally.
    Weave { amplitude: f32, frequency: f32 },
    /// Down until `stop_at` (fraction of playfield height from the top), then hold.
    Hover { stop_at: f32 },
    /// Down until `stop_at`, then sweep side to side.
    Strafe { stop_at: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Aim {
    Down,
    AtPlayer,
    /// `count` bullets fanned over `arc` radians around straight down.
    Spread { count: u32, arc: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weapon {
    pub interval: f32,
    pub bullet: BulletKind,
    pub damage: i32,
    /// Multiplier on `Tunables::enemy_bullet_speed`.
    pub speed_scale: f32,
    pub aim: Aim,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyProfile {
    pub category: Category,
    pub health: i32,
    pub speed: f32,
    pub half_size: Vec2,
    /// Bonus awarded on kill.
    pub score: u64,
    pub movement: MovementPattern,
    pub weapon: Option<Weapon>,
    pub drop: Option<ItemKind>,
    pub color: Color,
}

impl EnemyKind {
    pub fn profile(self) -> EnemyProfile {
        match self {
            EnemyKind::Inferior => EnemyProfile {
                category: Category::Enemy,
                health: 1,
                speed: 90.0,
                half_size: Vec2::splat(14.0),
                score: 100,
                movement: MovementPattern::Dive,
                weapon: None,
                drop: None,
                color: Color::srgb(0.85, 0.3, 0.3),
            },
            EnemyKind::Fighter => EnemyProfile {
                category: Category::Enemy,
                health: 2,
                speed: 110.0,
                half_size: Vec2::splat(16.0),
                score: 200,
                movement: MovementPattern::Weave { amplitude: 60.0, frequency: 0.5 },
                weapon: Some(Weapon {
                    interval: 2.2,
                    bullet: BulletKind::Enemy,
                    damage: 1,
                    speed_scale: 0.8,
                    aim: Aim::AtPlayer,
                }),
                drop: Some(ItemKind::Coin),
                color: Color::srgb(0.95, 0.55, 0.2),
            },
            EnemyKind::Gunship => EnemyProfile {
                category: Category::Enemy,
                health: 6,
                speed: 70.0,
                half_size: Vec2::splat(24.0),
                score: 500,
                movement: MovementPattern::Hover { stop_at: 0.3 },
                weapon: Some(Weapon {
                    interval: 1.1,
                    bullet: BulletKind::Enemy,
                    damage: 1,
                    speed_scale: 0.75,
                    aim: Aim::Down,
                }),
                drop: Some(ItemKind::Power),
                color: Color::srgb(0.7, 0.3, 0.85),
            },
            EnemyKind::Boss => EnemyProfile {
                category: Category::Boss,
                health: 120,
                speed: 60.0,
                half_size: Vec2::new(64.0, 40.0),
                score: 5000,
                movement: MovementPattern::Strafe { stop_at: 0.22 },
                weapon: Some(Weapon {
                    interval: 0.9,
                    bullet: BulletKind::Boss,
                    damage: 2,
                    speed_scale: 0.7,
                    aim: Aim::Spread { count: 7, arc: 1.2 },
                }),
                drop: Some(ItemKind::Repair),
                color: Color::srgb(0.9, 0.15, 0.45),
            },
        }
    }
}

/// World-space y at which hovering/strafing enemies stop descending.
#[inline]
pub fn stop_line(stop_at: f32, playfield: Rect) -> f32 {
    playfield.max.y - playfield.height() * stop_at
}

/// Velocity for this tick. `age` is seconds since spawn; `strafe_dir` is ±1.
pub fn pattern_velocity(
    pattern: MovementPattern,
    speed: f32,
    age: f32,
    pos: Vec2,
    strafe_dir: f32,
    playfield: Rect,
) -> Vec2 {
    match pattern {
        MovementPattern::Dive => Vec2::new(0.0, -speed),
        MovementPattern::Weave { amplitude, frequency } => {
            let w = std::f32::consts::TAU * frequency;
            Vec2::new(amplitude * w * (w * age).cos(), -speed)
        }
        MovementPattern::Hover { stop_at } => {
            if pos.y > stop_line(stop_at, playfield) {
                Vec2::new(0.0, -speed)
            } else {
                Vec2::ZERO
            }
        }
        MovementPattern::Strafe { stop_at } => {
            if pos.y > stop_line(stop_at, playfield) {
                Vec2::new(0.0, -speed)
            } else {
                Vec2::new(strafe_dir * speed, 0.0)
            }
        }
    }
}

/// Bullet directions for one volley (unit vectors).
pub fn volley_directions(aim: Aim, from: Vec2, player: Option<Vec2>) -> Vec<Vec2> {
    match aim {
        Aim::Down => vec![Vec2::NEG_Y],
        Aim::AtPlayer => {
            let dir = player
                .map(|p| (p - from).normalize_or_zero())
                .filter(|d| *d != Vec2::ZERO)
                .unwrap_or(Vec2::NEG_Y);
            vec![dir]
        }
        Aim::Spread { count, arc } => {
            let count = count.max(1);
            if count == 1 {
                return vec![Vec2::NEG_Y];
            }
            let step = arc / (count - 1) as f32;
            (0..count)
                .map(|i| {
                    let angle = -arc * 0.5 + step * i as f32;
                    Vec2::from_angle(angle).rotate(Vec2::NEG_Y)
                })
                .collect()
        }
    }
}
