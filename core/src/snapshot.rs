use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Read-only picture of the board for rendering.
///
/// Mine data of hidden cells is withheld until the game is over.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: EngineState,
    pub cells: Array2<CellView>,
}

impl Snapshot {
    pub fn from_engine(engine: &PlayEngine) -> Self {
        let game_over = engine.is_finished();
        let layout = engine.mine_layout();

        let cells = Array2::from_shape_fn(engine.size().to_nd_index(), |(row, col)| {
            let coords = (row as Coord, col as Coord);
            let state = engine.cell_state(coords);
            let revealed = state == CellState::Revealed;
            let Some(layout) = layout else {
                return CellView {
                    state,
                    ..CellView::default()
                };
            };

            CellView {
                state,
                adjacent_mine_count: revealed.then(|| layout.adjacent_mine_count(coords)),
                is_mine: (revealed || game_over).then(|| layout.contains_mine(coords)),
            }
        });

        Self {
            state: engine.state(),
            cells,
        }
    }

    /// Board shape as `(rows, cols)`.
    pub fn size(&self) -> Coord2 {
        let (rows, cols) = self.cells.dim();
        (rows as Coord, cols as Coord)
    }

    pub fn get(&self, coords: Coord2) -> Option<&CellView> {
        self.cells.get(coords.to_nd_index())
    }
}

/// Counters the shell shows next to the board. Elapsed time is the shell's own business.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub state: EngineState,
    pub flags_remaining: CellCount,
    pub mine_total: CellCount,
    pub revealed_count: CellCount,
}

impl Status {
    pub fn from_engine(engine: &PlayEngine) -> Self {
        Self {
            state: engine.state(),
            flags_remaining: engine.flags_remaining(),
            mine_total: engine.total_mines(),
            revealed_count: engine.revealed_count(),
        }
    }
}
