#![no_std]

extern crate alloc;

use alloc::vec::Vec;
use core::ops::Index;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

pub use action::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use settings::*;
pub use snapshot::*;
pub use tile::*;
pub use types::*;

mod action;
mod engine;
mod error;
mod generator;
mod settings;
mod snapshot;
mod tile;
mod types;

/// Starts a game with a random seed and a safe first click. Mines are placed on the first reveal.
pub fn new_game(width: Coord, height: Coord, mines: CellCount) -> Result<PlayEngine> {
    let config = GameConfig::new(width, height, mines)?;
    PlayEngine::new(SessionConfig::new(config))
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub width: Coord,
    pub height: Coord,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(width: Coord, height: Coord, mines: CellCount) -> Self {
        Self {
            width,
            height,
            mines,
        }
    }

    pub fn new(
        width: Coord,
        height: Coord,
        mines: CellCount,
    ) -> core::result::Result<Self, ConfigError> {
        let config = Self::new_unchecked(width, height, mines);
        config.validate()?;
        Ok(config)
    }

    pub const fn beginner() -> Self {
        Self::new_unchecked(9, 9, 10)
    }

    pub const fn intermediate() -> Self {
        Self::new_unchecked(16, 16, 40)
    }

    pub const fn expert() -> Self {
        Self::new_unchecked(30, 16, 99)
    }

    /// Checks `width, height > 0` and `0 < mines < width * height`.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyBoard);
        }
        if self.mines == 0 {
            return Err(ConfigError::NoMines);
        }
        let cells = self.total_cells();
        if self.mines >= cells {
            return Err(ConfigError::TooManyMines {
                mines: self.mines,
                cells,
            });
        }
        Ok(())
    }

    /// Board shape as `(rows, cols)`.
    pub const fn shape(&self) -> Coord2 {
        (self.height, self.width)
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.width, self.height)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::beginner()
    }
}

/// Mine positions of one board together with the precomputed neighbour counts.
///
/// Serialised as the bare mine mask. Deserialising rebuilds the counts through
/// [`MineLayout::from_mine_mask`], so a saved layout gets the same checks as a new one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MineMask", into = "MineMask")]
pub struct MineLayout {
    mine_mask: Array2<bool>,
    adjacency: Array2<u8>,
    mine_count: CellCount,
}

impl MineLayout {
    /// Builds a layout from a `(rows, cols)` shaped mask.
    pub fn from_mine_mask(mine_mask: Array2<bool>) -> Result<Self> {
        let (rows, cols) = mine_mask.dim();
        let (Ok(height), Ok(width)) = (Coord::try_from(rows), Coord::try_from(cols)) else {
            return Err(ConfigError::TooLarge.into());
        };
        let mine_count = mine_mask.iter().filter(|&&is_mine| is_mine).count() as CellCount;
        GameConfig::new(width, height, mine_count)?;

        let shape = (height, width);
        let adjacency = Array2::from_shape_fn((rows, cols), |(row, col)| {
            NeighborIter::new((row as Coord, col as Coord), shape)
                .filter(|&pos| mine_mask[pos.to_nd_index()])
                .count() as u8
        });

        Ok(Self {
            mine_mask,
            adjacency,
            mine_count,
        })
    }

    /// Builds a layout of the given `(rows, cols)` shape with mines at `mine_coords`.
    pub fn from_mine_coords(shape: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Array2<bool> = Array2::default(shape.to_nd_index());

        for &(row, col) in mine_coords {
            if row >= shape.0 || col >= shape.1 {
                return Err(GameError::InvalidCoords { row, col });
            }
            mine_mask[(row, col).to_nd_index()] = true;
        }

        Self::from_mine_mask(mine_mask)
    }

    pub fn game_config(&self) -> GameConfig {
        let (height, width) = self.shape();
        GameConfig::new_unchecked(width, height, self.mine_count)
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let shape = self.shape();
        if coords.0 < shape.0 && coords.1 < shape.1 {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords {
                row: coords.0,
                col: coords.1,
            })
        }
    }

    /// Board shape as `(rows, cols)`.
    pub fn shape(&self) -> Coord2 {
        let (rows, cols) = self.mine_mask.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn total_cells(&self) -> CellCount {
        self.mine_mask.len() as CellCount
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.adjacency[coords.to_nd_index()]
    }

    /// All mine positions in row-major order.
    pub fn mine_positions(&self) -> Vec<Coord2> {
        self.mine_mask
            .indexed_iter()
            .filter(|&(_, &is_mine)| is_mine)
            .map(|((row, col), _)| (row as Coord, col as Coord))
            .collect()
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.shape())
    }
}

#[derive(Serialize, Deserialize)]
struct MineMask {
    mine_mask: Array2<bool>,
}

impl TryFrom<MineMask> for MineLayout {
    type Error = GameError;

    fn try_from(mask: MineMask) -> Result<Self> {
        Self::from_mine_mask(mask.mine_mask)
    }
}

impl From<MineLayout> for MineMask {
    fn from(layout: MineLayout) -> Self {
        Self {
            mine_mask: layout.mine_mask,
        }
    }
}

impl Index<Coord2> for MineLayout {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords.to_nd_index()]
    }
}

/// What a flag action did to its target cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FlagResult {
    /// State of the target cell after the call.
    pub new_state: CellState,
    pub flags_remaining: CellCount,
    pub changed: bool,
}

impl FlagResult {
    pub const fn has_update(&self) -> bool {
        self.changed
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevealOutcome {
    Continue,
    Win,
    Lose,
}

/// Cells changed by a reveal, in the order they were opened, and how the game stands after it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RevealResult {
    pub newly_revealed: Vec<Coord2>,
    pub outcome: RevealOutcome,
}

impl RevealResult {
    pub const fn unchanged() -> Self {
        Self {
            newly_revealed: Vec::new(),
            outcome: RevealOutcome::Continue,
        }
    }

    pub fn has_update(&self) -> bool {
        !self.newly_revealed.is_empty()
    }

    /// Merges two results of the same action, used when one input opens several cells.
    pub fn merge(mut self, other: Self) -> Self {
        use RevealOutcome::*;

        self.newly_revealed.extend(other.newly_revealed);
        self.outcome = match (self.outcome, other.outcome) {
            (Lose, _) | (_, Lose) => Lose,
            (Win, _) | (_, Win) => Win,
            (Continue, Continue) => Continue,
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_invalid_combinations() {
        assert_eq!(GameConfig::new(0, 5, 1), Err(ConfigError::EmptyBoard));
        assert_eq!(GameConfig::new(5, 0, 1), Err(ConfigError::EmptyBoard));
        assert_eq!(GameConfig::new(5, 5, 0), Err(ConfigError::NoMines));
        assert_eq!(
            GameConfig::new(3, 3, 9),
            Err(ConfigError::TooManyMines { mines: 9, cells: 9 })
        );
        assert!(GameConfig::new(3, 3, 8).is_ok());
    }

    #[test]
    fn presets_are_valid() {
        for config in [
            GameConfig::beginner(),
            GameConfig::intermediate(),
            GameConfig::expert(),
        ] {
            assert_eq!(config.validate(), Ok(()));
        }
        assert_eq!(GameConfig::expert().shape(), (16, 30));
    }

    #[test]
    fn layout_precomputes_adjacency() {
        let layout = MineLayout::from_mine_coords((3, 4), &[(0, 0), (1, 2)]).unwrap();

        assert_eq!(layout.mine_count(), 2);
        assert_eq!(layout.safe_cell_count(), 10);
        assert_eq!(layout.adjacent_mine_count((0, 1)), 2);
        assert_eq!(layout.adjacent_mine_count((2, 3)), 1);
        assert_eq!(layout.adjacent_mine_count((2, 0)), 0);
        assert_eq!(layout.mine_positions(), [(0, 0), (1, 2)]);
        assert_eq!(layout.game_config(), GameConfig::new_unchecked(4, 3, 2));
    }

    #[test]
    fn layout_rejects_out_of_bounds_mines() {
        assert_eq!(
            MineLayout::from_mine_coords((2, 2), &[(2, 0)]),
            Err(GameError::InvalidCoords { row: 2, col: 0 })
        );
    }

    #[test]
    fn layout_rejects_full_and_empty_boards() {
        assert_eq!(
            MineLayout::from_mine_coords((1, 2), &[(0, 0), (0, 1)]),
            Err(ConfigError::TooManyMines { mines: 2, cells: 2 }.into())
        );
        assert_eq!(
            MineLayout::from_mine_coords((2, 2), &[]),
            Err(ConfigError::NoMines.into())
        );
    }

    #[test]
    fn layout_survives_a_json_round_trip() {
        let layout = MineLayout::from_mine_coords((3, 4), &[(0, 0), (1, 2)]).unwrap();

        let json = serde_json::to_value(&layout).unwrap();
        let restored: MineLayout = serde_json::from_value(json).unwrap();

        assert_eq!(restored, layout);
    }

    #[test]
    fn saved_layout_counts_are_recomputed() {
        let layout = MineLayout::from_mine_coords((2, 2), &[(0, 0)]).unwrap();
        let mut json = serde_json::to_value(&layout).unwrap();
        json["mine_count"] = serde_json::json!(0);
        json["adjacency"] = serde_json::json!({"v": 1, "dim": [2, 2], "data": [0, 0, 0, 0]});

        let restored: MineLayout = serde_json::from_value(json).unwrap();

        assert_eq!(restored.mine_count(), 1);
        assert_eq!(restored.adjacent_mine_count((1, 1)), 1);
        assert_eq!(restored.safe_cell_count(), 3);
    }

    #[test]
    fn saved_layout_without_mines_is_rejected() {
        let layout = MineLayout::from_mine_coords((2, 2), &[(0, 0)]).unwrap();
        let mut json = serde_json::to_value(&layout).unwrap();
        json["mine_mask"]["data"] = serde_json::json!([false, false, false, false]);

        let err = serde_json::from_value::<MineLayout>(json).unwrap_err();

        assert!(alloc::format!("{err}").contains("at least one mine"), "{err}");
    }

    #[test]
    fn saved_layout_full_of_mines_is_rejected() {
        let layout = MineLayout::from_mine_coords((2, 2), &[(0, 0)]).unwrap();
        let mut json = serde_json::to_value(&layout).unwrap();
        json["mine_mask"]["data"] = serde_json::json!([true, true, true, true]);

        assert!(serde_json::from_value::<MineLayout>(json).is_err());
    }

    #[test]
    fn merged_reveal_prefers_losing() {
        let won = RevealResult {
            newly_revealed: alloc::vec![(0, 0)],
            outcome: RevealOutcome::Win,
        };
        let lost = RevealResult {
            newly_revealed: alloc::vec![(1, 1)],
            outcome: RevealOutcome::Lose,
        };

        let merged = won.merge(lost);

        assert_eq!(merged.outcome, RevealOutcome::Lose);
        assert_eq!(merged.newly_revealed, [(0, 0), (1, 1)]);
    }
}
