use core::time::Duration;
use std::fs;
use std::io::{BufRead, Write};
use sttt_core::*;

use crate::command::{Command, HELP};
use crate::opponent::BotWorker;
use crate::settings::GameSettings;

/// How a console session ended.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GameEnd {
    Finished(Outcome),
    /// The given player lost by timing out or answering with an illegal move.
    Forfeit(Player),
    Quit,
}

fn describe(outcome: Outcome) -> String {
    match outcome {
        Outcome::Won(player) => format!("Game won by {}", player.symbol()),
        Outcome::Drawn => "Game ended in a draw".to_string(),
        Outcome::Open => "Game in progress".to_string(),
    }
}

/// Human (X) against a bot (O) on a text terminal, with undo history.
pub struct ConsoleGame<R, W> {
    input: R,
    output: W,
    settings: GameSettings,
    opponent: BotWorker,
    human: Player,
    board: Board,
    history: Vec<Board>,
}

impl<R: BufRead, W: Write> ConsoleGame<R, W> {
    pub fn new(input: R, output: W, settings: GameSettings, board: Board) -> Self {
        let opponent = BotWorker::spawn(settings.make_bot(0));
        Self {
            input,
            output,
            settings,
            opponent,
            human: Player::First,
            board,
            history: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn run(&mut self) -> anyhow::Result<GameEnd> {
        let bot = self.human.opponent()?;
        writeln!(self.output, "You ({}) vs bot ({})", self.human.symbol(), bot.symbol())?;
        writeln!(self.output, "{HELP}")?;

        if !self.board.is_done() && self.board.next_player() != self.human {
            if let Some(end) = self.bot_turn()? {
                return Ok(end);
            }
        }
        if self.board.is_done() {
            return self.finish();
        }

        let mut line = String::new();
        loop {
            writeln!(self.output, "Current board:\n{}", self.board)?;
            write!(self.output, "> ")?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                return Ok(GameEnd::Quit);
            }

            let command = match line.parse::<Command>() {
                Ok(command) => command,
                Err(err) => {
                    writeln!(self.output, "{err}")?;
                    continue;
                }
            };

            match command {
                Command::Play { x, y } => match Coord::from_global(x, y) {
                    Ok(coord) => {
                        if let Some(end) = self.human_turn(coord)? {
                            return Ok(end);
                        }
                    }
                    Err(err) => writeln!(self.output, "{err}: x and y must be below 9")?,
                },
                Command::PlayShort { x, y } => match self.board.short_coord(y, x) {
                    Ok(coord) => {
                        if let Some(end) = self.human_turn(coord)? {
                            return Ok(end);
                        }
                    }
                    Err(err) => writeln!(
                        self.output,
                        "{err}: short coordinates need a single playable macro-cell and values below 3"
                    )?,
                },
                Command::Undo => match self.history.pop() {
                    Some(previous) => {
                        log::debug!("undo to {:?}", previous.last_move());
                        self.board = previous;
                    }
                    None => writeln!(self.output, "no history")?,
                },
                Command::Time(millis) => {
                    self.settings.time_budget = Duration::from_millis(millis);
                    writeln!(self.output, "bot time budget is now {millis}ms")?;
                }
                Command::Save(path) => {
                    let json = sttt_protocol::to_json_pretty(&self.board)?;
                    match fs::write(&path, json) {
                        Ok(()) => writeln!(self.output, "saved to {}", path.display())?,
                        Err(err) => {
                            log::error!("Could not save board to {}: {err}", path.display());
                            writeln!(self.output, "could not save: {err}")?;
                        }
                    }
                }
                Command::Moves => {
                    let moves: Vec<String> = self
                        .board
                        .available_moves()
                        .iter()
                        .map(Coord::to_string)
                        .collect();
                    writeln!(self.output, "{}", moves.join(" "))?;
                }
                Command::Settings => {
                    writeln!(self.output, "{}", serde_json::to_string(&self.settings)?)?;
                }
                Command::Help => writeln!(self.output, "{HELP}")?,
                Command::Exit => return Ok(GameEnd::Quit),
            }
        }
    }

    fn human_turn(&mut self, coord: Coord) -> anyhow::Result<Option<GameEnd>> {
        if !self.board.is_legal(coord) {
            let moves: Vec<String> = self
                .board
                .available_moves()
                .iter()
                .map(Coord::to_string)
                .collect();
            writeln!(self.output, "invalid move, choose one of {}", moves.join(" "))?;
            return Ok(None);
        }

        self.history.push(self.board.clone());
        self.board.play(coord)?;
        writeln!(self.output, "move on {coord}")?;
        if self.board.is_done() {
            return self.finish().map(Some);
        }

        self.bot_turn()
    }

    fn bot_turn(&mut self) -> anyhow::Result<Option<GameEnd>> {
        let bot = self.board.next_player();
        let reply = self
            .opponent
            .request(self.board.clone(), self.settings.time_budget);

        let coord = match reply {
            Ok(coord) => coord,
            Err(err) => {
                log::warn!("Bot forfeits: {err}");
                writeln!(self.output, "{err}, bot forfeits")?;
                return Ok(Some(GameEnd::Forfeit(bot)));
            }
        };

        if let Err(err) = self.board.play(coord) {
            log::warn!("Bot answered {coord}: {err}");
            writeln!(self.output, "bot played {coord}: {err}, bot forfeits")?;
            return Ok(Some(GameEnd::Forfeit(bot)));
        }
        writeln!(self.output, "bot moves {coord}")?;

        if self.board.is_done() {
            return self.finish().map(Some);
        }
        Ok(None)
    }

    fn finish(&mut self) -> anyhow::Result<GameEnd> {
        writeln!(self.output, "{}\n{}", self.board, describe(self.board.result()))?;
        Ok(GameEnd::Finished(self.board.result()))
    }
}

/// Bot against bot until the game ends, printing every move.
pub fn watch(board: Board, settings: &GameSettings, output: &mut impl Write) -> anyhow::Result<GameEnd> {
    let bots = [settings.make_bot(0), settings.make_bot(1)];
    watch_bots(board, bots, settings.time_budget, output)
}

fn watch_bots(
    mut board: Board,
    [first, second]: [Box<dyn Bot + Send>; 2],
    budget: Duration,
    output: &mut impl Write,
) -> anyhow::Result<GameEnd> {
    let first = BotWorker::spawn(first);
    let second = BotWorker::spawn(second);

    while !board.is_done() {
        let mover = board.next_player();
        let worker = if mover == Player::First { &first } else { &second };

        let coord = match worker.request(board.clone(), budget) {
            Ok(coord) => coord,
            Err(err) => {
                writeln!(output, "{} {err}, forfeits", mover.symbol())?;
                return Ok(GameEnd::Forfeit(mover));
            }
        };
        if let Err(err) = board.play(coord) {
            log::warn!("{mover:?} answered {coord}: {err}");
            writeln!(output, "{} played {coord}: {err}, forfeits", mover.symbol())?;
            return Ok(GameEnd::Forfeit(mover));
        }
        writeln!(output, "{} moves {coord}\n{board}", mover.symbol())?;
    }

    writeln!(output, "{}", describe(board.result()))?;
    Ok(GameEnd::Finished(board.result()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::BotKind;

    fn settings() -> GameSettings {
        GameSettings {
            time_budget: Duration::from_millis(200),
            bot: BotKind::Random,
            seed: 3,
        }
    }

    fn run_script(script: &str) -> (GameEnd, Board, String) {
        let mut output = Vec::new();
        let mut game = ConsoleGame::new(script.as_bytes(), &mut output, settings(), Board::new());
        let end = game.run().unwrap();
        let board = game.board().clone();
        drop(game);
        (end, board, String::from_utf8(output).unwrap())
    }

    #[test]
    fn human_move_gets_a_bot_reply() {
        let (end, board, output) = run_script("4,4\nexit\n");

        assert_eq!(end, GameEnd::Quit);
        assert_eq!(board.cell(Coord::from_global(4, 4).unwrap()), Player::First);
        assert_eq!(board.next_player(), Player::First);
        assert!(output.contains("move on 4,4"));
        assert!(output.contains("bot moves"));
        // the bot had to answer inside the center macro-cell
        let reply = board.last_move().unwrap();
        assert_eq!(reply.macro_pos(), Pos::new(1, 1).unwrap());
    }

    #[test]
    fn undo_restores_the_board_before_the_human_move() {
        let (_, board, output) = run_script("0,0\nundo\nundo\n");

        assert_eq!(board, Board::new());
        assert!(output.contains("no history"));
    }

    #[test]
    fn short_form_needs_a_single_macro_cell() {
        let (_, board, output) = run_script("1;1\n");

        assert_eq!(board, Board::new());
        assert!(output.contains("short coordinates need a single playable macro-cell"));
    }

    #[test]
    fn short_form_plays_in_the_forced_macro_cell() {
        let mut output = Vec::new();
        let mut board = Board::new();
        board.play(Coord::new(0, 0, 2, 2).unwrap()).unwrap();
        board.play(Coord::new(2, 2, 0, 1).unwrap()).unwrap();

        let mut game = ConsoleGame::new("2;0\n".as_bytes(), &mut output, settings(), board);
        game.run().unwrap();

        assert_eq!(game.board().cell(Coord::new(0, 1, 0, 2).unwrap()), Player::First);
    }

    #[test]
    fn illegal_and_unknown_input_is_reported() {
        let (end, board, output) = run_script("9,0\njump\n0,0\n0,0\n");

        assert_eq!(end, GameEnd::Quit);
        assert!(output.contains("x and y must be below 9"));
        assert!(output.contains("invalid command"));
        assert!(output.contains("invalid move, choose one of"));
        assert_eq!(board.cell(Coord::from_global(0, 0).unwrap()), Player::First);
    }

    #[test]
    fn time_command_updates_settings() {
        let mut output = Vec::new();
        let mut game = ConsoleGame::new("time 50\n".as_bytes(), &mut output, settings(), Board::new());

        game.run().unwrap();

        assert_eq!(game.settings().time_budget, Duration::from_millis(50));
    }

    #[test]
    fn watch_plays_to_the_end() {
        let mut output = Vec::new();

        let end = watch(Board::new(), &settings(), &mut output).unwrap();

        assert!(matches!(end, GameEnd::Finished(outcome) if outcome.is_decided()));
        assert!(String::from_utf8(output).unwrap().contains("X moves"));
    }

    /// Answers with the cell that was just played.
    struct EchoBot;

    impl Bot for EchoBot {
        fn select_move(&mut self, board: Board, _budget: Duration) -> Option<Coord> {
            board.last_move()
        }
    }

    #[test]
    fn watch_forfeits_an_illegal_reply() {
        let mut output = Vec::new();
        let bots: [Box<dyn Bot + Send>; 2] = [Box::new(RandomBot::new(5)), Box::new(EchoBot)];

        let end = watch_bots(Board::new(), bots, Duration::from_millis(200), &mut output).unwrap();

        assert_eq!(end, GameEnd::Forfeit(Player::Second));
        let output = String::from_utf8(output).unwrap();
        assert!(output.contains("X moves"));
        assert!(output.contains("O played"));
        assert!(output.contains("forfeits"));
    }
}
