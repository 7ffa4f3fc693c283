#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use board::*;
pub use bot::*;
pub use error::*;
pub use macro_cell::*;
pub use player::*;
pub use types::*;

mod board;
mod bot;
mod error;
mod macro_cell;
mod player;
mod types;

/// Resolution of a macro-cell, or of the whole game on the meta-board.
///
/// `Won` only ever carries [`Player::First`] or [`Player::Second`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    #[default]
    Open,
    Won(Player),
    Drawn,
}

impl Outcome {
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    pub const fn is_decided(self) -> bool {
        !self.is_open()
    }

    pub const fn winner(self) -> Option<Player> {
        match self {
            Self::Won(player) => Some(player),
            Self::Open | Self::Drawn => None,
        }
    }

    /// The mark this outcome leaves on the meta-board; drawn and open cells count for nobody.
    pub const fn mark(self) -> Player {
        match self {
            Self::Won(player) => player,
            Self::Open | Self::Drawn => Player::Neutral,
        }
    }

    pub const fn flipped(self) -> Self {
        match self {
            Self::Won(player) => Self::Won(player.swapped()),
            other => other,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlayOutcome {
    /// The mark was placed and its macro-cell stays open.
    Placed,
    /// The mark won or filled its macro-cell.
    MacroDecided(Outcome),
    /// The move ended the game.
    GameOver(Outcome),
}

impl PlayOutcome {
    pub const fn is_game_over(self) -> bool {
        matches!(self, Self::GameOver(_))
    }
}
