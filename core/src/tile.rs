use serde::{Deserialize, Serialize};

/// Canonical player-visible state stored by the gameplay engine.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    Hidden,
    Revealed,
    Flagged,
}

impl CellState {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }
}

/// What the presentation layer may know about one cell.
///
/// `adjacent_mine_count` is only filled in for revealed cells. `is_mine` is filled in for revealed
/// cells, and for every cell once the game is over.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellView {
    pub state: CellState,
    pub adjacent_mine_count: Option<u8>,
    pub is_mine: Option<bool>,
}

impl CellView {
    /// A flag resting on a safe cell after the game ended.
    pub const fn is_misflagged(&self) -> bool {
        matches!(
            (self.state, self.is_mine),
            (CellState::Flagged, Some(false))
        )
    }
}
