use anyhow::Context;
use clap::Parser;
use core::time::Duration;
use std::fs;
use std::io;
use std::path::PathBuf;
use sttt_core::Board;
use tracing_subscriber::filter::LevelFilter;

use crate::game::ConsoleGame;
use crate::settings::{BotKind, GameSettings};

mod command;
mod game;
mod opponent;
mod settings;

/// Play Ultimate Tic-Tac-Toe against a bot
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Bot time budget per move, in milliseconds
    #[arg(short, long, default_value_t = 5000)]
    time: u64,

    /// Which bot to play against
    #[arg(short, long, value_enum, default_value_t = BotKind::Rollout)]
    bot: BotKind,

    /// Resume from a board saved with `save`
    #[arg(short, long)]
    load: Option<PathBuf>,

    /// Let two bots play each other
    #[arg(short, long)]
    watch: bool,
}

fn init_logging(verbose: &clap_verbosity_flag::Verbosity) {
    let level = match verbose.log_level_filter() {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.verbose);

    let settings = GameSettings {
        time_budget: Duration::from_millis(args.time),
        bot: args.bot,
        seed: args.seed.unwrap_or_else(rand::random),
    };
    log::debug!("settings: {settings:?}");

    let board = match &args.load {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Could not read {}", path.display()))?;
            sttt_protocol::from_json(&json)
                .with_context(|| format!("Could not load board from {}", path.display()))?
        }
        None => Board::new(),
    };

    if args.watch {
        let end = game::watch(board, &settings, &mut io::stdout().lock())?;
        log::info!("session ended: {end:?}");
        return Ok(());
    }

    let mut session = ConsoleGame::new(io::stdin().lock(), io::stdout().lock(), settings, board);
    let end = session.run()?;
    log::info!("session ended: {end:?}, settings: {:?}", session.settings());
    log::debug!("final board:\n{}", session.board());
    Ok(())
}
