use alloc::vec;
use rand::prelude::*;
use web_time::Instant;

use super::*;

const DEFAULT_MAX_ROUNDS: u32 = 100_000;

#[derive(Copy, Clone, Debug, Default)]
struct MoveStats {
    /// Two points per win, one per draw, from the mover's side.
    points: u32,
    visits: u32,
}

impl MoveStats {
    fn rate(self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            f64::from(self.points) / f64::from(self.visits)
        }
    }
}

/// Flat Monte-Carlo search: every candidate gets random playouts in rounds until the budget runs out, and the best
/// average wins.
///
/// At least one round is always played, so a zero budget still yields a move.
#[derive(Clone, Debug)]
pub struct RolloutBot {
    rng: SmallRng,
    max_rounds: u32,
}

impl RolloutBot {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds.max(1);
        self
    }

    fn playout(&mut self, mut board: Board) -> Outcome {
        while !board.is_done() {
            let moves = board.available_moves();
            let coord = moves[self.rng.random_range(0..moves.len())];
            if let Err(err) = board.play(coord) {
                log::warn!("Playout stopped on {coord}: {err}");
                break;
            }
        }
        board.result()
    }
}

impl Bot for RolloutBot {
    fn select_move(&mut self, board: Board, budget: Duration) -> Option<Coord> {
        let deadline = Instant::now().checked_add(budget);
        let mover = board.next_player();
        let moves = board.available_moves();

        let Some(&first) = moves.first() else {
            log::warn!("No legal move left, result: {:?}", board.result());
            return None;
        };
        if moves.len() == 1 {
            return Some(first);
        }

        let mut children = vec![];
        for &coord in &moves {
            let mut child = board.clone();
            if child.play(coord).ok()? == PlayOutcome::GameOver(Outcome::Won(mover)) {
                log::debug!("Winning move {coord}");
                return Some(coord);
            }
            children.push(child);
        }

        let mut stats = vec![MoveStats::default(); moves.len()];
        let mut rounds = 0;
        loop {
            for (child, stat) in children.iter().zip(stats.iter_mut()) {
                stat.points += match self.playout(child.clone()) {
                    Outcome::Won(winner) if winner == mover => 2,
                    Outcome::Drawn => 1,
                    _ => 0,
                };
                stat.visits += 1;
            }
            rounds += 1;

            let out_of_time = deadline.is_some_and(|deadline| Instant::now() >= deadline);
            if out_of_time || rounds >= self.max_rounds {
                break;
            }
        }
        log::debug!("{rounds} rollout rounds over {} moves", moves.len());

        let (best, _) = moves
            .iter()
            .zip(&stats)
            .max_by(|(_, a), (_, b)| a.rate().total_cmp(&b.rate()))?;
        Some(*best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn takes_an_immediate_win() {
        // X holds macro-cells 0 and 4 and is forced into 8, where (8, 8) completes the diagonal.
        let moves = [
            (0, 4),
            (4, 0),
            (0, 8),
            (8, 0),
            (0, 0),
            (8, 4),
            (4, 3),
            (3, 4),
            (4, 5),
            (5, 4),
            (4, 4),
            (7, 8),
            (8, 2),
            (2, 8),
            (8, 5),
            (5, 8),
        ];
        let mut board = Board::new();
        for (macro_index, inner_index) in moves {
            let coord = Coord::from_parts(
                Pos::from_index(macro_index).unwrap(),
                Pos::from_index(inner_index).unwrap(),
            );
            board.play(coord).unwrap();
        }

        let mut bot = RolloutBot::new(3).with_max_rounds(1);
        let coord = bot.select_move(board, Duration::ZERO).unwrap();

        assert_eq!(coord, Coord::new(2, 2, 2, 2).unwrap());
    }

    #[test]
    fn zero_budget_still_returns_a_legal_move() {
        let mut board = Board::new();
        board.play(Coord::new(1, 1, 0, 2).unwrap()).unwrap();
        let mut bot = RolloutBot::new(9).with_max_rounds(2);

        let coord = bot.select_move(board.clone(), Duration::ZERO).unwrap();

        assert!(board.is_legal(coord));
        assert_eq!(coord.macro_pos(), Pos::new(0, 2).unwrap());
    }

    #[test]
    fn search_does_not_touch_the_callers_board() {
        let board = Board::new();
        let before = board.clone();
        let mut bot = RolloutBot::new(5).with_max_rounds(1);

        bot.select_move(board.clone(), Duration::from_millis(1));

        assert_eq!(board, before);
        assert_eq!(board.available_moves().len(), 81);
    }
}
