use thiserror::Error;

use crate::{CellCount, Coord};

/// Rejected board parameters. No board is ever built from these.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Board must be at least 1x1")]
    EmptyBoard,
    #[error("Board sides are limited to {max} cells", max = Coord::MAX)]
    TooLarge,
    #[error("Board needs at least one mine")]
    NoMines,
    #[error("Too many mines: {mines} requested but the board only has {cells} cells")]
    TooManyMines { mines: CellCount, cells: CellCount },
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Invalid coordinates ({row}, {col})")]
    InvalidCoords { row: Coord, col: Coord },
    #[error("Saved game state does not describe a reachable board")]
    InconsistentState,
}

pub type Result<T> = core::result::Result<T, GameError>;

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Malformed session settings: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
