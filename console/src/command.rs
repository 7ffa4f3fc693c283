use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("invalid command {0:?}, type help for a list")]
    Unknown(String),
    #[error("not a number: {0:?}")]
    BadNumber(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `x,y` on the full 9×9 grid.
    Play { x: u8, y: u8 },
    /// `x;y` inside the only playable macro-cell.
    PlayShort { x: u8, y: u8 },
    Undo,
    Time(u64),
    Save(PathBuf),
    Moves,
    Settings,
    Help,
    Exit,
}

pub const HELP: &str = "\
\t<x>,<y>      play at those coordinates
\t<x>;<y>      play at those coordinates within the current macro-cell
\tundo         take back your last move and the bot's reply
\ttime <ms>    change the bot's time budget
\tsave <path>  write the board as JSON
\tmoves        list the legal moves
\tsettings     show the session settings
\texit         leave the game";

fn number<T: FromStr>(text: &str) -> Result<T, CommandError> {
    text.trim()
        .parse()
        .map_err(|_| CommandError::BadNumber(text.trim().to_string()))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = line.split_once(' ').unwrap_or((line, ""));

        Ok(match word {
            "undo" => Self::Undo,
            "exit" | "quit" => Self::Exit,
            "moves" => Self::Moves,
            "settings" => Self::Settings,
            "help" => Self::Help,
            "time" => Self::Time(number(rest)?),
            "save" if !rest.trim().is_empty() => Self::Save(PathBuf::from(rest.trim())),
            _ => {
                if let Some((x, y)) = line.split_once(',') {
                    Self::Play {
                        x: number(x)?,
                        y: number(y)?,
                    }
                } else if let Some((x, y)) = line.split_once(';') {
                    Self::PlayShort {
                        x: number(x)?,
                        y: number(y)?,
                    }
                } else {
                    return Err(CommandError::Unknown(line.to_string()));
                }
            }
        })
    }
}
