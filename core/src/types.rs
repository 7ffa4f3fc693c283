use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

/// Side length of a macro-cell, and of the meta-board.
pub const SIDE: u8 = 3;

/// Total number of cells on the full board.
pub const CELL_COUNT: u8 = 81;

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

/// Position inside a 3×3 grid, used both for macro-cells on the meta-board and for cells inside a macro-cell.
///
/// Instances are always in range.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Pos {
    row: u8,
    col: u8,
}

impl Pos {
    pub(crate) const fn new_unchecked(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    pub fn new(row: u8, col: u8) -> Result<Self> {
        if row < SIDE && col < SIDE {
            Ok(Self::new_unchecked(row, col))
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    /// Row-major index in `0..9`.
    pub fn from_index(index: u8) -> Result<Self> {
        if index < SIDE * SIDE {
            Ok(Self::new_unchecked(index / SIDE, index % SIDE))
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub const fn row(self) -> u8 {
        self.row
    }

    pub const fn col(self) -> u8 {
        self.col
    }

    pub const fn index(self) -> u8 {
        self.row * SIDE + self.col
    }

    /// All nine positions in row-major order.
    pub fn all() -> impl Iterator<Item = Pos> + Clone {
        (0..SIDE * SIDE).map(|index| Self::new_unchecked(index / SIDE, index % SIDE))
    }
}

impl ToNdIndex for Pos {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.row.into(), self.col.into()]
    }
}

impl TryFrom<u8> for Pos {
    type Error = GameError;

    fn try_from(index: u8) -> Result<Self> {
        Self::from_index(index)
    }
}

impl From<Pos> for u8 {
    fn from(pos: Pos) -> Self {
        pos.index()
    }
}

/// The eight winning lines of a 3×3 grid: rows, columns and both diagonals.
pub(crate) const LINES: [[Pos; 3]; 8] = {
    const fn p(row: u8, col: u8) -> Pos {
        Pos::new_unchecked(row, col)
    }
    [
        [p(0, 0), p(0, 1), p(0, 2)],
        [p(1, 0), p(1, 1), p(1, 2)],
        [p(2, 0), p(2, 1), p(2, 2)],
        [p(0, 0), p(1, 0), p(2, 0)],
        [p(0, 1), p(1, 1), p(2, 1)],
        [p(0, 2), p(1, 2), p(2, 2)],
        [p(0, 0), p(1, 1), p(2, 2)],
        [p(0, 2), p(1, 1), p(2, 0)],
    ]
};

/// One of the 81 cells, addressed by its macro-cell and its position inside that macro-cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Coord {
    macro_pos: Pos,
    inner: Pos,
}

impl Coord {
    pub const fn from_parts(macro_pos: Pos, inner: Pos) -> Self {
        Self { macro_pos, inner }
    }

    pub fn new(macro_row: u8, macro_col: u8, inner_row: u8, inner_col: u8) -> Result<Self> {
        Ok(Self::from_parts(
            Pos::new(macro_row, macro_col)?,
            Pos::new(inner_row, inner_col)?,
        ))
    }

    /// Short form: the macro-cell is implied by the caller, usually from [`Board::unique_forced_macro`].
    pub fn in_macro(macro_pos: Pos, inner_row: u8, inner_col: u8) -> Result<Self> {
        Ok(Self::from_parts(macro_pos, Pos::new(inner_row, inner_col)?))
    }

    /// Flat index `macro * 9 + inner`, both parts row-major.
    pub fn from_index(index: u8) -> Result<Self> {
        if index >= CELL_COUNT {
            return Err(GameError::InvalidCoords);
        }
        Ok(Self::from_parts(
            Pos::from_index(index / 9)?,
            Pos::from_index(index % 9)?,
        ))
    }

    /// Column and row on the full 9×9 grid.
    pub fn from_global(x: u8, y: u8) -> Result<Self> {
        if x >= SIDE * SIDE || y >= SIDE * SIDE {
            return Err(GameError::InvalidCoords);
        }
        Self::new(y / SIDE, x / SIDE, y % SIDE, x % SIDE)
    }

    pub const fn index(self) -> u8 {
        self.macro_pos.index() * 9 + self.inner.index()
    }

    pub const fn global(self) -> (u8, u8) {
        (
            self.macro_pos.col * SIDE + self.inner.col,
            self.macro_pos.row * SIDE + self.inner.row,
        )
    }

    pub const fn macro_pos(self) -> Pos {
        self.macro_pos
    }

    pub const fn inner(self) -> Pos {
        self.inner
    }

    pub const fn macro_row(self) -> u8 {
        self.macro_pos.row
    }

    pub const fn macro_col(self) -> u8 {
        self.macro_pos.col
    }

    pub const fn inner_row(self) -> u8 {
        self.inner.row
    }

    pub const fn inner_col(self) -> u8 {
        self.inner.col
    }

    pub fn all() -> impl Iterator<Item = Coord> {
        Pos::all().flat_map(|macro_pos| Pos::all().map(move |inner| Self::from_parts(macro_pos, inner)))
    }
}

impl TryFrom<u8> for Coord {
    type Error = GameError;

    fn try_from(index: u8) -> Result<Self> {
        Self::from_index(index)
    }
}

impl From<Coord> for u8 {
    fn from(coord: Coord) -> Self {
        coord.index()
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y) = self.global();
        write!(f, "{x},{y}")
    }
}
