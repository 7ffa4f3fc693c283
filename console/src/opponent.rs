use core::time::Duration;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use sttt_core::{Board, Bot, Coord};
use thiserror::Error;

/// Extra time granted on top of the budget before a bot is declared out of time.
const GRACE: Duration = Duration::from_millis(500);

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum OpponentError {
    #[error("bot did not answer within its time budget")]
    TimedOut,
    #[error("bot found no move")]
    NoMove,
    #[error("bot thread is gone")]
    Disconnected,
}

/// Runs a bot on its own thread so the driver can stop waiting once the budget is spent.
///
/// After a timeout the worker may still deliver the stale reply, so callers end the game instead of asking again.
pub struct BotWorker {
    requests: Sender<(Board, Duration)>,
    replies: Receiver<Option<Coord>>,
}

impl BotWorker {
    pub fn spawn(mut bot: Box<dyn Bot + Send>) -> Self {
        let (requests, request_rx) = mpsc::channel::<(Board, Duration)>();
        let (reply_tx, replies) = mpsc::channel();

        thread::spawn(move || {
            for (board, budget) in request_rx {
                if reply_tx.send(bot.select_move(board, budget)).is_err() {
                    break;
                }
            }
            log::trace!("bot worker finished");
        });

        Self { requests, replies }
    }

    /// Hands the bot a copy of `board` and waits for its choice.
    pub fn request(&self, board: Board, budget: Duration) -> Result<Coord, OpponentError> {
        self.requests
            .send((board, budget))
            .map_err(|_| OpponentError::Disconnected)?;

        match self.replies.recv_timeout(budget.saturating_add(GRACE)) {
            Ok(Some(coord)) => Ok(coord),
            Ok(None) => Err(OpponentError::NoMove),
            Err(RecvTimeoutError::Timeout) => Err(OpponentError::TimedOut),
            Err(RecvTimeoutError::Disconnected) => Err(OpponentError::Disconnected),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sttt_core::RandomBot;

    struct SleepyBot;

    impl Bot for SleepyBot {
        fn select_move(&mut self, board: Board, budget: Duration) -> Option<Coord> {
            thread::sleep(budget + GRACE * 2);
            board.available_moves().first().copied()
        }
    }

    #[test]
    fn answers_with_a_legal_move() {
        let worker = BotWorker::spawn(Box::new(RandomBot::new(1)));
        let board = Board::new();

        let coord = worker.request(board.clone(), Duration::ZERO).unwrap();

        assert!(board.is_legal(coord));
    }

    #[test]
    fn slow_bot_times_out() {
        let worker = BotWorker::spawn(Box::new(SleepyBot));

        assert_eq!(
            worker.request(Board::new(), Duration::from_millis(10)),
            Err(OpponentError::TimedOut)
        );
    }
}
