use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Illegal move")]
    IllegalMove,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("Neutral player has no opponent")]
    InvalidOperand,
    #[error("Board parts are inconsistent")]
    InvalidBoardState,
}

impl GameError {
    /// Both a rejected target cell and a move on a finished board count as illegal moves.
    pub const fn is_illegal_move(self) -> bool {
        matches!(self, Self::IllegalMove | Self::AlreadyEnded)
    }
}

pub type Result<T> = core::result::Result<T, GameError>;
