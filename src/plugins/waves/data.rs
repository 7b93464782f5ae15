//! Formation / level data.
//!
//! ```json
//! {
//!   "formations": { "<id>": { "name": "...", "enemies": [{ "type": "inferior", "x": 100, "y": -50, "delay": 0 }] } },
//!   "levels":     { "<id>": { "waves": ["<formation id>", ...], "waveDelay": 3.0 } },
//!   "sequence":   ["<level id>", ...]
//! }
//! ```
//! Positions are in reference space. `sequence` is optional; without it levels
//! play in id order.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::plugins::enemies::EnemyKind;

const BUILTIN_FORMATIONS: &str = include_str!("../../../assets/data/formations.json");

#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read formation data from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed formation data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("formation `{formation}` has a negative or non-finite spawn delay")]
    BadSpawnDelay { formation: String },
    #[error("level `{level}` has a negative or non-finite wave delay")]
    BadWaveDelay { level: String },
    #[error("level sequence names unknown level `{0}`")]
    UnknownSequenceLevel(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemySpawn {
    #[serde(rename = "type")]
    pub kind: EnemyKind,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub delay: f32,
}

impl EnemySpawn {
    #[inline]
    pub fn reference_position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Formation {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub enemies: Vec<EnemySpawn>,
    #[serde(default)]
    pub boss: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub waves: Vec<String>,
    #[serde(rename = "waveDelay", default)]
    pub wave_delay: f32,
}

/// Boss waves are recognized by id prefix, or by an explicit `boss` flag.
#[inline]
pub fn is_boss_formation(id: &str, formation: &Formation) -> bool {
    formation.boss || id.starts_with("boss")
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FormationLibrary {
    #[serde(default)]
    pub formations: BTreeMap<String, Formation>,
    #[serde(default)]
    pub levels: BTreeMap<String, Level>,
    #[serde(default)]
    pub sequence: Vec<String>,
}

impl FormationLibrary {
    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        let library: Self = serde_json::from_str(json)?;
        library.validate()?;
        Ok(library)
    }

    pub fn from_path(path: &Path) -> Result<Self, DataError> {
        let json = std::fs::read_to_string(path).map_err(|source| DataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// The data file compiled into the binary.
    pub fn builtin() -> Result<Self, DataError> {
        Self::from_json_str(BUILTIN_FORMATIONS)
    }

    /// Load `path`, falling back to the built-in data (and then to an empty
    /// library) with a warning instead of failing startup.
    pub fn load_or_fallback(path: &Path) -> Self {
        let library = match Self::from_path(path) {
            Ok(library) => library,
            Err(err) => {
                warn!("{err}; using built-in formations");
                match Self::builtin() {
                    Ok(library) => library,
                    Err(err) => {
                        error!("built-in formations unusable: {err}");
                        return Self::default();
                    }
                }
            }
        };

        for (level, formation) in library.dangling_references() {
            warn!("level `{level}` references unknown formation `{formation}`; it will be skipped");
        }
        info!(
            "loaded {} formations, {} levels",
            library.formations.len(),
            library.levels.len()
        );
        library
    }

    fn validate(&self) -> Result<(), DataError> {
        for (id, formation) in &self.formations {
            if formation.enemies.iter().any(|e| !e.delay.is_finite() || e.delay < 0.0) {
                return Err(DataError::BadSpawnDelay { formation: id.clone() });
            }
        }
        for (id, level) in &self.levels {
            if !level.wave_delay.is_finite() || level.wave_delay < 0.0 {
                return Err(DataError::BadWaveDelay { level: id.clone() });
            }
        }
        if let Some(missing) = self.sequence.iter().find(|id| !self.levels.contains_key(*id)) {
            return Err(DataError::UnknownSequenceLevel(missing.clone()));
        }
        Ok(())
    }

    /// `(level, formation)` pairs where a level names a formation that does not exist.
    pub fn dangling_references(&self) -> Vec<(String, String)> {
        self.levels
            .iter()
            .flat_map(|(level_id, level)| {
                level
                    .waves
                    .iter()
                    .filter(|f| !self.formations.contains_key(*f))
                    .map(move |f| (level_id.clone(), f.clone()))
            })
            .collect()
    }

    /// Play order of levels.
    pub fn level_order(&self) -> Vec<String> {
        if self.sequence.is_empty() {
            self.levels.keys().cloned().collect()
        } else {
            self.sequence.clone()
        }
    }

    pub fn formation(&self, id: &str) -> Option<&Formation> {
        self.formations.get(id)
    }

    pub fn level(&self, id: &str) -> Option<&Level> {
        self.levels.get(id)
    }

    pub fn formation_ids(&self) -> impl Iterator<Item = &str> {
        self.formations.keys().map(String::as_str)
    }

    pub fn level_ids(&self) -> impl Iterator<Item = &str> {
        self.levels.keys().map(String::as_str)
    }
}
