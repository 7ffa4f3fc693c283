use serde::{Deserialize, Serialize};

use crate::*;

/// Owner of a cell, or the side to move.
///
/// `Neutral` doubles as "empty cell" and "no winner"; it never holds the turn.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    First,
    Second,
    #[default]
    Neutral,
}

impl Player {
    pub fn opponent(self) -> Result<Player> {
        match self {
            Self::First => Ok(Self::Second),
            Self::Second => Ok(Self::First),
            Self::Neutral => Err(GameError::InvalidOperand),
        }
    }

    /// Like [`Player::opponent`] but maps `Neutral` to itself, for perspective flips.
    pub const fn swapped(self) -> Player {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
            Self::Neutral => Self::Neutral,
        }
    }

    pub const fn is_neutral(self) -> bool {
        matches!(self, Self::Neutral)
    }

    pub const fn symbol(self) -> char {
        match self {
            Self::First => 'X',
            Self::Second => 'O',
            Self::Neutral => ' ',
        }
    }

    pub const fn from_symbol(symbol: char) -> Option<Player> {
        match symbol {
            'X' => Some(Self::First),
            'O' => Some(Self::Second),
            ' ' => Some(Self::Neutral),
            _ => None,
        }
    }
}
