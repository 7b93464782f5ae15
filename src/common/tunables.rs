//! Tunable gameplay constants.
//!
//! Formation data is authored in a fixed *reference space* (origin top-left,
//! y down). Everything in the ECS lives in world space (origin at the centre of
//! the playfield, y up). `Tunables::to_world` is the single conversion point.

use std::path::PathBuf;

use bevy::prelude::*;

/// Environment variable that overrides `Tunables::formation_path`.
pub const FORMATIONS_ENV: &str = "SHOOTER_FORMATIONS";

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    pub reference_size: Vec2,
    pub playfield_size: Vec2,

    pub player_speed: f32,
    pub player_max_health: i32,
    pub player_invulnerable_secs: f32,
    pub player_fire_interval: f32,
    pub bullet_speed: f32,
    pub enemy_bullet_speed: f32,

    pub boss_warning_secs: f32,
    pub collision_check_budget: usize,

    pub enemy_pool_per_kind: usize,
    pub boss_pool: usize,
    pub bullet_pool_per_kind: usize,
    pub item_pool_per_kind: usize,

    pub formation_path: PathBuf,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            reference_size: Vec2::new(1280.0, 720.0),
            playfield_size: Vec2::new(1280.0, 720.0),
            player_speed: 420.0,
            player_max_health: 5,
            player_invulnerable_secs: 1.2,
            player_fire_interval: 0.12,
            bullet_speed: 900.0,
            enemy_bullet_speed: 320.0,
            boss_warning_secs: 3.0,
            collision_check_budget: 4096,
            enemy_pool_per_kind: 32,
            boss_pool: 2,
            bullet_pool_per_kind: 256,
            item_pool_per_kind: 24,
            formation_path: PathBuf::from("assets/data/formations.json"),
        }
    }
}

impl Tunables {
    /// Defaults with the formation path taken from `SHOOTER_FORMATIONS` when set.
    pub fn from_env() -> Self {
        let mut tunables = Self::default();
        if let Ok(path) = std::env::var(FORMATIONS_ENV) {
            tunables.formation_path = PathBuf::from(path);
        }
        tunables
    }

    /// Map a reference-space point to world space.
    #[inline]
    pub fn to_world(&self, reference: Vec2) -> Vec2 {
        let norm = reference / self.reference_size;
        Vec2::new(
            (norm.x - 0.5) * self.playfield_size.x,
            (0.5 - norm.y) * self.playfield_size.y,
        )
    }

    /// Visible playfield in world space.
    #[inline]
    pub fn playfield(&self) -> Rect {
        Rect::from_center_size(Vec2::ZERO, self.playfield_size)
    }
}
