use serde::{Deserialize, Serialize};

use crate::*;

/// A single player input, as translated by the shell from a pointer event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Primary click on a hidden cell.
    Open,
    /// Secondary click on a hidden cell.
    Flag,
    /// Secondary click on a flagged cell.
    Unflag,
    /// Open all neighbours of a satisfied number.
    Chord,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    Reveal(RevealResult),
    Flag(FlagResult),
}

impl ActionOutcome {
    pub fn has_update(&self) -> bool {
        match self {
            Self::Reveal(result) => result.has_update(),
            Self::Flag(result) => result.has_update(),
        }
    }
}

impl PlayEngine {
    pub fn apply(&mut self, coords: Coord2, action: Action) -> Result<ActionOutcome> {
        Ok(match action {
            Action::Open => ActionOutcome::Reveal(self.reveal(coords)?),
            Action::Chord => ActionOutcome::Reveal(self.chord_reveal(coords)?),
            Action::Flag => ActionOutcome::Flag(self.place_flag(coords)?),
            Action::Unflag => ActionOutcome::Flag(self.remove_flag(coords)?),
        })
    }
}
