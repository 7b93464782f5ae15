//! Global state machine.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameState {
    #[default]
    InGame,
    GameOver,
    Victory,
    /// One-frame stop between sessions so `OnExit`/`OnEnter(InGame)` run on an
    /// in-place restart.
    Restarting,
}
