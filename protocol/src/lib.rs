//! JSON transport for boards.
//!
//! The message carries only what [`Board::from_parts`] needs; every cached status is re-derived on decode, so a
//! message can never smuggle in an inconsistent board.

use serde::{Deserialize, Serialize};
use sttt_core::*;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Rejected board: {0}")]
    Game(#[from] GameError),
    #[error("Expected {expected} cells, got {actual}")]
    BadLength { expected: usize, actual: usize },
    #[error("Unknown symbol {0:?}")]
    BadSymbol(String),
    #[error("Declared result {declared:?} does not match the cells ({actual:?})")]
    ResultMismatch { declared: Outcome, actual: Outcome },
}

pub type Result<T> = core::result::Result<T, ProtocolError>;

const DRAW: &str = "draw";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardMessage {
    /// One symbol per cell in flat index order: `"X"`, `"O"` or `" "`.
    pub cells: Vec<String>,
    pub next_player: String,
    /// Macro-cell index the next move is forced into, `null` when any open macro-cell is eligible.
    pub forced: Option<u8>,
    pub last_move: Option<u8>,
    /// `"X"`, `"O"`, `"draw"`, or `null` while the game goes on.
    pub result: Option<String>,
}

pub fn encode(board: &Board) -> BoardMessage {
    BoardMessage {
        cells: board
            .cells()
            .iter()
            .map(|owner| owner.symbol().to_string())
            .collect(),
        next_player: board.next_player().symbol().to_string(),
        forced: match board.forced() {
            Forced::Any => None,
            Forced::Macro(pos) => Some(pos.index()),
        },
        last_move: board.last_move().map(Coord::index),
        result: match board.result() {
            Outcome::Open => None,
            Outcome::Won(player) => Some(player.symbol().to_string()),
            Outcome::Drawn => Some(DRAW.to_string()),
        },
    }
}

pub fn decode(message: &BoardMessage) -> Result<Board> {
    let expected = usize::from(CELL_COUNT);
    if message.cells.len() != expected {
        return Err(ProtocolError::BadLength {
            expected,
            actual: message.cells.len(),
        });
    }

    let mut owners = [Player::Neutral; CELL_COUNT as usize];
    for (slot, symbol) in owners.iter_mut().zip(&message.cells) {
        *slot = parse_player(symbol)?;
    }

    let next_player = parse_player(&message.next_player)?;
    let forced = match message.forced {
        None => Forced::Any,
        Some(index) => Forced::Macro(Pos::from_index(index)?),
    };
    let last_move = message.last_move.map(Coord::from_index).transpose()?;

    let board = Board::from_parts(&owners, next_player, forced, last_move)?;

    let declared = match message.result.as_deref() {
        None => Outcome::Open,
        Some(DRAW) => Outcome::Drawn,
        Some(symbol) => match parse_player(symbol)? {
            Player::Neutral => return Err(ProtocolError::BadSymbol(symbol.to_string())),
            player => Outcome::Won(player),
        },
    };
    if declared != board.result() {
        log::warn!("Board message declares {declared:?} but cells give {:?}", board.result());
        return Err(ProtocolError::ResultMismatch {
            declared,
            actual: board.result(),
        });
    }

    Ok(board)
}

pub fn to_json(board: &Board) -> Result<String> {
    Ok(serde_json::to_string(&encode(board))?)
}

pub fn to_json_pretty(board: &Board) -> Result<String> {
    Ok(serde_json::to_string_pretty(&encode(board))?)
}

pub fn from_json(json: &str) -> Result<Board> {
    decode(&serde_json::from_str(json)?)
}

fn parse_player(symbol: &str) -> Result<Player> {
    let mut chars = symbol.chars();
    match (chars.next().and_then(Player::from_symbol), chars.next()) {
        (Some(player), None) => Ok(player),
        _ => Err(ProtocolError::BadSymbol(symbol.to_string())),
    }
}
