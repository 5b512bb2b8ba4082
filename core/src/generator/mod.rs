use serde::{Deserialize, Serialize};

use crate::*;
pub use random::*;

mod random;

pub trait MineLayoutGenerator {
    fn generate(self, config: GameConfig) -> Result<MineLayout>;
}

/// How much of the board around the first revealed cell is kept free of mines.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SafeStart {
    /// Mines may land anywhere, the first click can lose.
    Random,
    /// The first revealed cell is never a mine.
    #[default]
    SimpleSafe,
    /// The first revealed cell and its neighbours are mine free, so the first click cascades.
    AlwaysZero,
}
