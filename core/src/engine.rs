use alloc::collections::VecDeque;
use alloc::vec;
use alloc::vec::Vec;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
/// - NotStarted -> Active (first reveal places the mines)
/// - Active -> Won
/// - Active -> Lost
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    #[default]
    NotStarted,
    Active,
    Won,
    Lost,
}

impl EngineState {
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    pub const fn is_finished(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// The board engine: owns the mine layout and the player-visible state of every cell.
///
/// All actions run to completion before returning. Hosts driving it from several threads must
/// serialise the calls themselves.
///
/// A deserialised engine is checked against its layout and the state machine, and rejected with
/// [`GameError::InconsistentState`] if no sequence of actions could have produced it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EngineRecord")]
pub struct PlayEngine {
    session: SessionConfig,
    seed: u64,
    mine_layout: Option<MineLayout>,
    board: Array2<CellState>,
    revealed_count: CellCount,
    flagged_count: CellCount,
    state: EngineState,
    triggered_mine: Option<Coord2>,
}

#[derive(Deserialize)]
struct EngineRecord {
    session: SessionConfig,
    seed: u64,
    mine_layout: Option<MineLayout>,
    board: Array2<CellState>,
    revealed_count: CellCount,
    flagged_count: CellCount,
    state: EngineState,
    triggered_mine: Option<Coord2>,
}

impl TryFrom<EngineRecord> for PlayEngine {
    type Error = GameError;

    fn try_from(record: EngineRecord) -> Result<Self> {
        let game = record.session.game;
        game.validate()?;
        if record.board.dim() != game.shape().to_nd_index().into() {
            return Err(GameError::InconsistentState);
        }

        let count = |wanted: CellState| {
            record.board.iter().filter(|&&cell| cell == wanted).count() as CellCount
        };
        let revealed = count(CellState::Revealed);
        let flagged = count(CellState::Flagged);
        if revealed != record.revealed_count
            || flagged != record.flagged_count
            || flagged > game.mines
        {
            return Err(GameError::InconsistentState);
        }

        let consistent = match (&record.mine_layout, record.state) {
            (None, EngineState::NotStarted) => revealed == 0 && flagged == 0,
            (None, _) | (Some(_), EngineState::NotStarted) => false,
            (Some(layout), _) if layout.game_config() != game => false,
            (Some(layout), state) => {
                let struck: Vec<Coord2> = layout
                    .mine_positions()
                    .into_iter()
                    .filter(|&pos| record.board[pos.to_nd_index()] == CellState::Revealed)
                    .collect();
                let safe_revealed = revealed - struck.len() as CellCount;
                match state {
                    EngineState::Lost => {
                        struck.len() == 1 && record.triggered_mine == struck.first().copied()
                    }
                    EngineState::Won => {
                        struck.is_empty() && safe_revealed == layout.safe_cell_count()
                    }
                    _ => struck.is_empty() && safe_revealed < layout.safe_cell_count(),
                }
            }
        };
        if !consistent || (record.state != EngineState::Lost && record.triggered_mine.is_some()) {
            return Err(GameError::InconsistentState);
        }

        Ok(Self {
            session: record.session,
            seed: record.seed,
            mine_layout: record.mine_layout,
            board: record.board,
            revealed_count: record.revealed_count,
            flagged_count: record.flagged_count,
            state: record.state,
            triggered_mine: record.triggered_mine,
        })
    }
}

impl PlayEngine {
    /// Creates a game whose mines are only placed once the first cell is revealed, keeping that
    /// cell clear according to `session.safe_start`.
    pub fn new(session: SessionConfig) -> Result<Self> {
        session.game.validate()?;
        let seed = session.resolve_seed();
        log::debug!(
            "New {}x{} game with {} mines, safe start {:?}",
            session.game.width,
            session.game.height,
            session.game.mines,
            session.safe_start
        );
        Ok(Self {
            session,
            seed,
            mine_layout: None,
            board: Array2::default(session.game.shape().to_nd_index()),
            revealed_count: 0,
            flagged_count: 0,
            state: EngineState::NotStarted,
            triggered_mine: None,
        })
    }

    /// Creates an already started game on a fixed layout.
    pub fn with_layout(mine_layout: MineLayout) -> Self {
        let shape = mine_layout.shape();
        Self {
            session: SessionConfig::new(mine_layout.game_config())
                .with_safe_start(SafeStart::Random),
            seed: 0,
            mine_layout: Some(mine_layout),
            board: Array2::default(shape.to_nd_index()),
            revealed_count: 0,
            flagged_count: 0,
            state: EngineState::Active,
            triggered_mine: None,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    pub fn config(&self) -> GameConfig {
        self.session.game
    }

    /// Board shape as `(rows, cols)`.
    pub fn size(&self) -> Coord2 {
        self.session.game.shape()
    }

    pub fn total_mines(&self) -> CellCount {
        self.session.game.mines
    }

    pub fn flags_placed(&self) -> CellCount {
        self.flagged_count
    }

    pub fn flags_remaining(&self) -> CellCount {
        self.total_mines().saturating_sub(self.flagged_count)
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<CellState> {
        let coords = self.validate_coords(coords)?;
        Ok(self.board[coords.to_nd_index()])
    }

    /// The mine that ended the game, if it was lost.
    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    /// Every mine position, for end-of-game display. Hidden while the game is running.
    pub fn mine_positions(&self) -> Option<Vec<Coord2>> {
        if !self.state.is_finished() {
            return None;
        }
        self.mine_layout.as_ref().map(MineLayout::mine_positions)
    }

    pub(crate) fn cell_state(&self, coords: Coord2) -> CellState {
        self.board[coords.to_nd_index()]
    }

    pub(crate) fn mine_layout(&self) -> Option<&MineLayout> {
        self.mine_layout.as_ref()
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let (rows, cols) = self.size();
        if coords.0 < rows && coords.1 < cols {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords {
                row: coords.0,
                col: coords.1,
            })
        }
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealResult> {
        let coords = self.validate_coords(coords)?;
        log::trace!("reveal {:?}", coords);

        if self.state.is_finished() || self.cell_state(coords) != CellState::Hidden {
            return Ok(RevealResult::unchanged());
        }

        if self.state.is_ready() {
            self.start(coords)?;
        }

        Ok(self.reveal_single_cell(coords))
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagResult> {
        let coords = self.validate_coords(coords)?;

        match self.cell_state(coords) {
            CellState::Flagged => self.remove_flag(coords),
            _ => self.place_flag(coords),
        }
    }

    /// Flags a hidden cell. Capped at one flag per mine.
    pub fn place_flag(&mut self, coords: Coord2) -> Result<FlagResult> {
        let coords = self.validate_coords(coords)?;
        log::trace!("flag {:?}", coords);

        let can_flag = matches!(self.state, EngineState::Active)
            && self.cell_state(coords) == CellState::Hidden;
        if !can_flag {
            return Ok(self.flag_result(coords, false));
        }
        if self.flagged_count >= self.total_mines() {
            log::trace!("flag cap of {} reached", self.total_mines());
            return Ok(self.flag_result(coords, false));
        }

        self.board[coords.to_nd_index()] = CellState::Flagged;
        self.flagged_count += 1;
        Ok(self.flag_result(coords, true))
    }

    pub fn remove_flag(&mut self, coords: Coord2) -> Result<FlagResult> {
        let coords = self.validate_coords(coords)?;
        log::trace!("unflag {:?}", coords);

        let can_unflag = matches!(self.state, EngineState::Active)
            && self.cell_state(coords) == CellState::Flagged;
        if !can_unflag {
            return Ok(self.flag_result(coords, false));
        }

        self.board[coords.to_nd_index()] = CellState::Hidden;
        self.flagged_count -= 1;
        Ok(self.flag_result(coords, true))
    }

    /// Reveals every hidden neighbour of a revealed number whose flag count matches it. Anything
    /// else, hidden cells included, is left alone.
    pub fn chord_reveal(&mut self, coords: Coord2) -> Result<RevealResult> {
        let coords = self.validate_coords(coords)?;
        log::trace!("chord {:?}", coords);

        if self.state.is_finished() {
            return Ok(RevealResult::unchanged());
        }

        match self.cell_state(coords) {
            CellState::Hidden | CellState::Flagged => Ok(RevealResult::unchanged()),
            CellState::Revealed => {
                let Some(layout) = self.mine_layout.as_ref() else {
                    return Ok(RevealResult::unchanged());
                };
                let count = layout.adjacent_mine_count(coords);
                let neighbors: Vec<_> = layout.iter_neighbors(coords).collect();
                let flagged = neighbors
                    .iter()
                    .filter(|&&pos| self.cell_state(pos) == CellState::Flagged)
                    .count();
                if count == 0 || usize::from(count) != flagged {
                    return Ok(RevealResult::unchanged());
                }

                let mut result = RevealResult::unchanged();
                for pos in neighbors {
                    if self.state.is_finished() {
                        break;
                    }
                    result = result.merge(self.reveal_single_cell(pos));
                }
                Ok(result)
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_engine(self)
    }

    pub fn status(&self) -> Status {
        Status::from_engine(self)
    }

    fn start(&mut self, first_reveal: Coord2) -> Result<()> {
        let layout =
            RandomMineLayoutGenerator::new(self.seed, Some(first_reveal), self.session.safe_start)
                .generate(self.session.game)?;
        self.mine_layout = Some(layout);
        self.state = EngineState::Active;
        log::debug!("Game started at {:?}", first_reveal);
        Ok(())
    }

    fn reveal_single_cell(&mut self, coords: Coord2) -> RevealResult {
        let Some(layout) = self.mine_layout.as_ref() else {
            return RevealResult::unchanged();
        };
        if self.board[coords.to_nd_index()] != CellState::Hidden {
            return RevealResult::unchanged();
        }

        if layout.contains_mine(coords) {
            self.board[coords.to_nd_index()] = CellState::Revealed;
            self.revealed_count += 1;
            self.triggered_mine = Some(coords);
            self.end_game(false);
            return RevealResult {
                newly_revealed: vec![coords],
                outcome: RevealOutcome::Lose,
            };
        }

        // a zero cell has no mine neighbours, so the fill never reaches a mine
        let mut newly_revealed = Vec::new();
        let mut to_visit = VecDeque::from([coords]);
        while let Some(visit_coords) = to_visit.pop_front() {
            if self.board[visit_coords.to_nd_index()] != CellState::Hidden {
                continue;
            }

            self.board[visit_coords.to_nd_index()] = CellState::Revealed;
            self.revealed_count += 1;
            newly_revealed.push(visit_coords);

            if layout.adjacent_mine_count(visit_coords) == 0 {
                to_visit.extend(
                    layout
                        .iter_neighbors(visit_coords)
                        .filter(|&pos| self.board[pos.to_nd_index()] == CellState::Hidden),
                );
            }
        }

        let outcome = if self.revealed_count == layout.safe_cell_count() {
            self.end_game(true);
            RevealOutcome::Win
        } else {
            RevealOutcome::Continue
        };

        RevealResult {
            newly_revealed,
            outcome,
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_finished() {
            return;
        }

        self.state = if won {
            EngineState::Won
        } else {
            EngineState::Lost
        };
        log::debug!(
            "Game over: {:?} after revealing {} cells",
            self.state,
            self.revealed_count
        );
    }

    fn flag_result(&self, coords: Coord2, changed: bool) -> FlagResult {
        FlagResult {
            new_state: self.cell_state(coords),
            flags_remaining: self.flags_remaining(),
            changed,
        }
    }
}
