use core::time::Duration;

use crate::*;
pub use random::*;
pub use rollout::*;

mod random;
mod rollout;

/// Move-selection collaborator.
///
/// A bot always receives its own copy of the board and may play on it freely. The budget is advisory: the engine
/// does not enforce it, the driver does.
pub trait Bot {
    /// Picks one of `board.available_moves()`, or `None` when there is none.
    fn select_move(&mut self, board: Board, budget: Duration) -> Option<Coord>;
}
