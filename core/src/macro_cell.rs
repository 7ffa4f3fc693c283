use core::ops::Index;
use ndarray::Array2;

use crate::*;

/// A 3×3 sub-board with its cached result.
///
/// The status is re-derived after every placement and never set directly. Once it leaves [`Outcome::Open`] the
/// cells are frozen.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MacroCell {
    cells: Array2<Player>,
    status: Outcome,
}

impl Default for MacroCell {
    fn default() -> Self {
        Self {
            cells: Array2::default([SIDE as usize, SIDE as usize]),
            status: Outcome::Open,
        }
    }
}

impl MacroCell {
    /// Builds a macro-cell from raw owners in row-major order, deriving its status.
    ///
    /// Fails unless the cells could have frozen: a won cell must have some winning mark whose removal leaves no
    /// complete line, otherwise play would have continued past the win.
    pub fn from_owners(owners: [Player; 9]) -> Result<Self> {
        let mut cell = Self::default();
        for (pos, owner) in Pos::all().zip(owners) {
            cell.cells[pos.to_nd_index()] = owner;
        }

        if let Some(winner) = cell.derive_status().winner() {
            let frozen = Pos::all().filter(|&pos| cell[pos] == winner).any(|last| {
                line_winners(|pos| if pos == last { Player::Neutral } else { cell[pos] })
                    .next()
                    .is_none()
            });
            if !frozen {
                return Err(GameError::InvalidBoardState);
            }
        }

        cell.status = cell.derive_status();
        Ok(cell)
    }

    pub fn owner(&self, pos: Pos) -> Player {
        self.cells[pos.to_nd_index()]
    }

    pub fn status(&self) -> Outcome {
        self.status
    }

    pub fn is_open(&self) -> bool {
        self.status.is_open()
    }

    pub fn owners(&self) -> [Player; 9] {
        let mut owners = [Player::Neutral; 9];
        for (slot, pos) in owners.iter_mut().zip(Pos::all()) {
            *slot = self[pos];
        }
        owners
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        Pos::all().filter(|&pos| self[pos].is_neutral())
    }

    pub fn can_place(&self, pos: Pos) -> bool {
        self.status.is_open() && self[pos].is_neutral()
    }

    pub fn place(&mut self, pos: Pos, player: Player) -> Result<Outcome> {
        if player.is_neutral() || !self.can_place(pos) {
            return Err(GameError::IllegalMove);
        }

        self.cells[pos.to_nd_index()] = player;
        self.status = self.derive_status();
        Ok(self.status)
    }

    /// Recomputes the status from the cells alone, ignoring the cache.
    pub fn derive_status(&self) -> Outcome {
        if let Some(winner) = line_winners(|pos| self[pos]).next() {
            Outcome::Won(winner)
        } else if self.cells.iter().all(|owner| !owner.is_neutral()) {
            Outcome::Drawn
        } else {
            Outcome::Open
        }
    }

    pub(crate) fn flipped(&self) -> Self {
        Self {
            cells: self.cells.mapv(Player::swapped),
            status: self.status.flipped(),
        }
    }
}

impl Index<Pos> for MacroCell {
    type Output = Player;

    fn index(&self, pos: Pos) -> &Self::Output {
        &self.cells[pos.to_nd_index()]
    }
}

/// Owners of every complete line in a 3×3 grid, neutral lines excluded.
pub(crate) fn line_winners(owner: impl Fn(Pos) -> Player) -> impl Iterator<Item = Player> {
    LINES.into_iter().filter_map(move |[a, b, c]| {
        let player = owner(a);
        (!player.is_neutral() && owner(b) == player && owner(c) == player).then_some(player)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(row: u8, col: u8) -> Pos {
        Pos::new(row, col).unwrap()
    }

    #[test]
    fn diagonal_wins_the_macro_cell() {
        let mut cell = MacroCell::default();

        assert_eq!(cell.place(pos(0, 0), Player::First), Ok(Outcome::Open));
        assert_eq!(cell.place(pos(0, 1), Player::Second), Ok(Outcome::Open));
        assert_eq!(cell.place(pos(1, 1), Player::First), Ok(Outcome::Open));
        assert_eq!(cell.place(pos(0, 2), Player::Second), Ok(Outcome::Open));
        assert_eq!(
            cell.place(pos(2, 2), Player::First),
            Ok(Outcome::Won(Player::First))
        );
        assert_eq!(cell.status(), cell.derive_status());
    }

    #[test]
    fn full_cell_without_line_is_drawn() {
        use Player::*;
        let mut cell = MacroCell::default();
        let moves = [
            ((0, 0), First),
            ((0, 1), Second),
            ((0, 2), First),
            ((1, 1), Second),
            ((1, 0), First),
            ((1, 2), Second),
            ((2, 1), First),
            ((2, 0), Second),
        ];
        for ((row, col), player) in moves {
            assert_eq!(cell.place(pos(row, col), player), Ok(Outcome::Open));
        }

        assert_eq!(cell.place(pos(2, 2), First), Ok(Outcome::Drawn));
    }

    #[test]
    fn decided_cell_is_frozen() {
        use Player::*;
        let owners = [Second, Second, Second, Neutral, Neutral, Neutral, Neutral, Neutral, Neutral];
        let mut cell = MacroCell::from_owners(owners).unwrap();

        assert_eq!(cell.status(), Outcome::Won(Second));
        assert_eq!(cell.place(pos(2, 2), First), Err(GameError::IllegalMove));
        assert!(cell.owner(pos(2, 2)).is_neutral());
    }

    #[test]
    fn place_rejects_occupied_cell_and_neutral_player() {
        let mut cell = MacroCell::default();
        cell.place(pos(1, 1), Player::First).unwrap();

        assert_eq!(
            cell.place(pos(1, 1), Player::Second),
            Err(GameError::IllegalMove)
        );
        assert_eq!(
            cell.place(pos(0, 0), Player::Neutral),
            Err(GameError::IllegalMove)
        );
        assert_eq!(cell.owner(pos(1, 1)), Player::First);
        assert_eq!(cell.empty_cells().count(), 8);
    }

    #[test]
    fn from_owners_rejects_two_winners() {
        use Player::*;
        let owners = [First, First, First, Second, Second, Second, Neutral, Neutral, Neutral];

        assert_eq!(
            MacroCell::from_owners(owners),
            Err(GameError::InvalidBoardState)
        );
    }

    #[test]
    fn from_owners_rejects_marks_placed_after_the_win() {
        use Player::*;
        let full_of_x = [First; 9];
        let two_rows = [First, First, First, Second, Second, Neutral, First, First, First];

        assert_eq!(MacroCell::from_owners(full_of_x), Err(GameError::InvalidBoardState));
        assert_eq!(MacroCell::from_owners(two_rows), Err(GameError::InvalidBoardState));
    }

    #[test]
    fn from_owners_accepts_a_win_with_one_completing_mark() {
        use Player::*;
        // the corner closes both the top row and the left column
        let fork = [First, First, First, First, Second, Second, First, Second, Second];

        let cell = MacroCell::from_owners(fork).unwrap();

        assert_eq!(cell.status(), Outcome::Won(First));
    }

    #[test]
    fn copy_is_independent() {
        let mut cell = MacroCell::default();
        cell.place(pos(0, 0), Player::First).unwrap();
        let copy = cell.clone();

        cell.place(pos(2, 2), Player::Second).unwrap();

        assert_eq!(copy.owner(pos(2, 2)), Player::Neutral);
        assert_ne!(copy, cell);
        assert_eq!(copy.owners()[0], Player::First);
    }
}
