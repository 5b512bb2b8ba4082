use alloc::vec::Vec;
use ndarray::Array2;
use rand::prelude::*;
use rand::rngs::SmallRng;

use super::*;

/// Generation strategy that can optionally keep the starting cell (and its neighbours) clear, but
/// other than that is purely random.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomMineLayoutGenerator {
    seed: u64,
    start: Option<Coord2>,
    safe_start: SafeStart,
}

impl RandomMineLayoutGenerator {
    pub fn new(seed: u64, start: Option<Coord2>, safe_start: SafeStart) -> Self {
        Self {
            seed,
            start,
            safe_start,
        }
    }

    /// Works out which policy fits on the board, degrading `AlwaysZero` when the board is too
    /// crowded to keep a whole neighbourhood clear.
    fn effective_policy(&self, config: &GameConfig, start: Coord2) -> SafeStart {
        use SafeStart::*;

        match self.safe_start {
            Random => Random,
            SimpleSafe => SimpleSafe,
            AlwaysZero => {
                let zone = 1 + NeighborIter::new(start, config.shape()).count() as CellCount;
                if config.mines + zone > config.total_cells() {
                    log::warn!(
                        "Cannot keep {} cells around the start clear with {} mines, fallback to simple safe",
                        zone,
                        config.mines
                    );
                    SimpleSafe
                } else {
                    AlwaysZero
                }
            }
        }
    }
}

impl MineLayoutGenerator for RandomMineLayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout> {
        config.validate()?;
        let shape = config.shape();
        let mut excluded: Array2<bool> = Array2::default(shape.to_nd_index());

        if let Some(start) = self.start {
            if start.0 >= shape.0 || start.1 >= shape.1 {
                return Err(GameError::InvalidCoords {
                    row: start.0,
                    col: start.1,
                });
            }
            match self.effective_policy(&config, start) {
                SafeStart::Random => {}
                SafeStart::SimpleSafe => {
                    excluded[start.to_nd_index()] = true;
                }
                SafeStart::AlwaysZero => {
                    excluded[start.to_nd_index()] = true;
                    for coords in NeighborIter::new(start, shape) {
                        excluded[coords.to_nd_index()] = true;
                    }
                }
            }
        }

        let mut candidates: Vec<usize> = excluded
            .iter()
            .enumerate()
            .filter(|&(_, &is_excluded)| !is_excluded)
            .map(|(index, _)| index)
            .collect();
        let mines = usize::from(config.mines);

        // partial Fisher-Yates, only the first `mines` slots get shuffled
        let mut rng = SmallRng::seed_from_u64(self.seed);
        for slot in 0..mines {
            let pick = rng.random_range(slot..candidates.len());
            candidates.swap(slot, pick);
        }

        let mut mine_mask: Array2<bool> = Array2::default(shape.to_nd_index());
        for &index in &candidates[..mines] {
            mine_mask[from_flat_index(index, config.width).to_nd_index()] = true;
        }

        log::debug!(
            "Generated {}x{} board with {} mines (seed {:#x})",
            config.width,
            config.height,
            config.mines,
            self.seed
        );
        MineLayout::from_mine_mask(mine_mask)
    }
}
