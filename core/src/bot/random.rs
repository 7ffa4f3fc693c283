use rand::prelude::*;

use super::*;

/// Picks uniformly among the legal moves.
#[derive(Clone, Debug)]
pub struct RandomBot {
    rng: SmallRng,
}

impl RandomBot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Bot for RandomBot {
    fn select_move(&mut self, board: Board, _budget: Duration) -> Option<Coord> {
        let moves = board.available_moves();
        if moves.is_empty() {
            log::warn!("No legal move left, result: {:?}", board.result());
            return None;
        }
        Some(moves[self.rng.random_range(0..moves.len())])
    }
}
