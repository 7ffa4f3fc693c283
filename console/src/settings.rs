use clap::ValueEnum;
use core::time::Duration;
use serde::{Deserialize, Serialize};
use sttt_core::{Bot, RandomBot, RolloutBot};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BotKind {
    /// Uniformly random legal moves
    Random,
    /// Random playouts until the time budget runs out
    Rollout,
}

/// Runtime knobs of a session, adjustable while playing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    pub time_budget: Duration,
    pub bot: BotKind,
    pub seed: u64,
}

impl GameSettings {
    /// Builds a bot; `stream` keeps two bots of one session from sharing a random sequence.
    pub fn make_bot(&self, stream: u64) -> Box<dyn Bot + Send> {
        let seed = self.seed.wrapping_add(stream);
        match self.bot {
            BotKind::Random => Box::new(RandomBot::new(seed)),
            BotKind::Rollout => Box::new(RolloutBot::new(seed)),
        }
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            time_budget: Duration::from_millis(5000),
            bot: BotKind::Rollout,
            seed: 0,
        }
    }
}
