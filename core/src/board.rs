use alloc::vec::Vec;
use core::fmt;
use core::hash::{Hash, Hasher};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Where the next mark may go.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Forced {
    /// Any open macro-cell is eligible.
    #[default]
    Any,
    /// Only this macro-cell is eligible; it is always open.
    Macro(Pos),
}

/// Full game state: nine macro-cells, the forced macro-cell, the side to move and the cached result.
///
/// Cloning produces a deep, independent copy. Equality and hashing cover the cells, the forced macro-cell, the side
/// to move and the result; the last move is informational only.
#[derive(Clone, Debug)]
pub struct Board {
    macros: Array2<MacroCell>,
    next_player: Player,
    forced: Forced,
    result: Outcome,
    last_move: Option<Coord>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            macros: Array2::default([SIDE as usize, SIDE as usize]),
            next_player: Player::First,
            forced: Forced::Any,
            result: Outcome::Open,
            last_move: None,
        }
    }

    /// Rebuilds a board from raw cell owners in flat index order, re-deriving every cached status.
    ///
    /// Only states that alternating play could reach are accepted: decided macro-cells and a won meta-board must
    /// each have a single completing mark, and the mark counts must agree with the side to move. A finished game
    /// keeps the last mover as `next_player`, the way [`Board::play`] leaves it.
    pub fn from_parts(
        owners: &[Player; CELL_COUNT as usize],
        next_player: Player,
        forced: Forced,
        last_move: Option<Coord>,
    ) -> Result<Self> {
        if next_player.is_neutral() {
            return Err(GameError::InvalidBoardState);
        }

        let mut macros: Array2<MacroCell> = Array2::default([SIDE as usize, SIDE as usize]);
        for (macro_pos, chunk) in Pos::all().zip(owners.chunks_exact(9)) {
            let mut cell_owners = [Player::Neutral; 9];
            cell_owners.copy_from_slice(chunk);
            macros[macro_pos.to_nd_index()] = MacroCell::from_owners(cell_owners)?;
        }

        let mut board = Self {
            macros,
            next_player,
            forced,
            result: Outcome::Open,
            last_move,
        };

        board.result = board.derive_result();
        if let Some(winner) = board.result.winner() {
            let frozen = Pos::all().filter(|&pos| board.macro_status(pos).mark() == winner).any(|last| {
                line_winners(|pos| if pos == last { Player::Neutral } else { board.macro_status(pos).mark() })
                    .next()
                    .is_none()
            });
            if !frozen {
                log::debug!("rejected board: play continued after {winner:?} won");
                return Err(GameError::InvalidBoardState);
            }
        }

        let count = |player: Player| owners.iter().filter(|&&owner| owner == player).count() as isize;
        let lead = count(Player::First) - count(Player::Second);
        // the turn only passes while the game is open
        let (expected_lead, last_mover) = match (next_player, board.result.is_decided()) {
            (Player::First, false) => (0, Player::Second),
            (Player::Second, false) => (1, Player::First),
            (player, true) => (if player == Player::First { 1 } else { 0 }, player),
            (Player::Neutral, false) => return Err(GameError::InvalidBoardState),
        };
        if lead != expected_lead {
            log::debug!("rejected board: X leads by {lead} with {next_player:?} to move");
            return Err(GameError::InvalidBoardState);
        }

        if let Forced::Macro(pos) = forced {
            if !board.macro_cell(pos).is_open() {
                return Err(GameError::InvalidBoardState);
            }
        }
        if let Some(coord) = last_move {
            if board.cell(coord) != last_mover || board.forced_after(coord) != forced {
                return Err(GameError::InvalidBoardState);
            }
        }

        Ok(board)
    }

    pub fn next_player(&self) -> Player {
        self.next_player
    }

    pub fn forced(&self) -> Forced {
        self.forced
    }

    pub fn result(&self) -> Outcome {
        self.result
    }

    /// The winner, or `Neutral` while the game is ongoing or drawn.
    pub fn won_by(&self) -> Player {
        self.result.mark()
    }

    pub fn is_done(&self) -> bool {
        self.result.is_decided()
    }

    pub fn last_move(&self) -> Option<Coord> {
        self.last_move
    }

    pub fn macro_cell(&self, pos: Pos) -> &MacroCell {
        &self.macros[pos.to_nd_index()]
    }

    pub fn macro_status(&self, pos: Pos) -> Outcome {
        self.macro_cell(pos).status()
    }

    pub fn cell(&self, coord: Coord) -> Player {
        self.macro_cell(coord.macro_pos()).owner(coord.inner())
    }

    /// Owners of all 81 cells in flat index order.
    pub fn cells(&self) -> [Player; CELL_COUNT as usize] {
        let mut owners = [Player::Neutral; CELL_COUNT as usize];
        for (slot, coord) in owners.iter_mut().zip(Coord::all()) {
            *slot = self.cell(coord);
        }
        owners
    }

    pub fn is_eligible(&self, pos: Pos) -> bool {
        self.result.is_open()
            && self.macro_cell(pos).is_open()
            && match self.forced {
                Forced::Any => true,
                Forced::Macro(forced) => forced == pos,
            }
    }

    pub fn eligible_macros(&self) -> impl Iterator<Item = Pos> + '_ {
        Pos::all().filter(|&pos| self.is_eligible(pos))
    }

    /// The single eligible macro-cell, if there is exactly one.
    pub fn unique_forced_macro(&self) -> Option<Pos> {
        let mut eligible = self.eligible_macros();
        let pos = eligible.next()?;
        eligible.next().is_none().then_some(pos)
    }

    /// Resolves a short-form move inside the single eligible macro-cell.
    pub fn short_coord(&self, inner_row: u8, inner_col: u8) -> Result<Coord> {
        let macro_pos = self.unique_forced_macro().ok_or(GameError::InvalidCoords)?;
        Coord::in_macro(macro_pos, inner_row, inner_col)
    }

    pub fn is_legal(&self, coord: Coord) -> bool {
        self.is_eligible(coord.macro_pos()) && self.macro_cell(coord.macro_pos()).can_place(coord.inner())
    }

    pub fn available_moves(&self) -> Vec<Coord> {
        self.eligible_macros()
            .flat_map(|macro_pos| {
                self.macro_cell(macro_pos)
                    .empty_cells()
                    .map(move |inner| Coord::from_parts(macro_pos, inner))
            })
            .collect()
    }

    pub fn play(&mut self, coord: Coord) -> Result<PlayOutcome> {
        if self.result.is_decided() {
            log::trace!("rejected {coord}: game already ended");
            return Err(GameError::AlreadyEnded);
        }
        if !self.is_eligible(coord.macro_pos()) {
            log::trace!("rejected {coord}: macro-cell not eligible");
            return Err(GameError::IllegalMove);
        }

        let player = self.next_player;
        let macro_outcome = self.macros[coord.macro_pos().to_nd_index()].place(coord.inner(), player)?;
        log::debug!("{player:?} plays {coord}");

        self.result = self.derive_result();
        self.forced = self.forced_after(coord);
        self.last_move = Some(coord);

        if self.result.is_decided() {
            log::info!("game over: {:?}", self.result);
            return Ok(PlayOutcome::GameOver(self.result));
        }

        self.next_player = player.swapped();
        Ok(if macro_outcome.is_decided() {
            log::debug!("macro-cell {:?} resolved: {macro_outcome:?}", coord.macro_pos());
            PlayOutcome::MacroDecided(macro_outcome)
        } else {
            PlayOutcome::Placed
        })
    }

    /// Recomputes the meta-board result from the macro-cell statuses, ignoring the cache.
    pub fn derive_result(&self) -> Outcome {
        if let Some(winner) = line_winners(|pos| self.macro_status(pos).mark()).next() {
            Outcome::Won(winner)
        } else if self.macros.iter().all(|cell| cell.status().is_decided()) {
            Outcome::Drawn
        } else {
            Outcome::Open
        }
    }

    /// Copy of the board with the roles of both players swapped.
    pub fn flip(&self) -> Self {
        Self {
            macros: self.macros.map(MacroCell::flipped),
            next_player: self.next_player.swapped(),
            forced: self.forced,
            result: self.result.flipped(),
            last_move: self.last_move,
        }
    }

    fn forced_after(&self, coord: Coord) -> Forced {
        if self.macro_cell(coord.inner()).is_open() {
            Forced::Macro(coord.inner())
        } else {
            Forced::Any
        }
    }
}

impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.macros == other.macros
            && self.next_player == other.next_player
            && self.forced == other.forced
            && self.result == other.result
    }
}

impl Eq for Board {}

impl Hash for Board {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.macros.hash(state);
        self.next_player.hash(state);
        self.forced.hash(state);
        self.result.hash(state);
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in 0..SIDE * SIDE {
            if y > 0 && y % SIDE == 0 {
                writeln!(f, "---+---+---")?;
            }
            for x in 0..SIDE * SIDE {
                if x > 0 && x % SIDE == 0 {
                    write!(f, "|")?;
                }
                let coord = Coord::from_parts(
                    Pos::new_unchecked(y / SIDE, x / SIDE),
                    Pos::new_unchecked(y % SIDE, x % SIDE),
                );
                write!(f, "{}", self.cell(coord).symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
