//! Match configuration - JSON file plus command-line overrides

use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use clap::{Args, ValueEnum};
use serde::{Deserialize, Serialize};

use network_core::{AiConfig, GameRules, MachinePlayer, Player, RandomPlayer, Side};

/// Kind of player taking one side
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    /// Alpha-beta search
    Machine,
    /// Uniformly random legal moves
    Random,
}

/// One player's configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub kind: PlayerKind,
    pub ai: AiConfig,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            kind: PlayerKind::Machine,
            ai: AiConfig::default(),
        }
    }
}

impl PlayerConfig {
    /// Build a player for `side`. A seed in the AI config wins over `seed`.
    pub fn build(&self, side: Side, seed: Option<u64>) -> Box<dyn Player> {
        let seed = self.ai.seed.or(seed);
        match self.kind {
            PlayerKind::Machine => {
                let ai = AiConfig {
                    seed,
                    ..self.ai.clone()
                };
                Box::new(MachinePlayer::with_ai(side, ai.build_ai()))
            }
            PlayerKind::Random => Box::new(RandomPlayer::new(side, seed.unwrap_or_else(rand::random))),
        }
    }

    pub fn describe(&self) -> String {
        match self.kind {
            PlayerKind::Machine => format!("machine(depth={})", self.ai.depth),
            PlayerKind::Random => "random".to_string(),
        }
    }
}

/// Everything needed to play one game or a series
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Player taking black (in even-numbered games of a match)
    pub black: PlayerConfig,
    /// Player taking white (in even-numbered games of a match)
    pub white: PlayerConfig,
    #[serde(flatten)]
    pub rules: GameRules,
    /// Games in a match
    pub games: usize,
    /// Base seed; per-game seeds are derived from it
    pub seed: Option<u64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            black: PlayerConfig::default(),
            white: PlayerConfig::default(),
            rules: GameRules::default(),
            games: 10,
            seed: None,
        }
    }
}

impl MatchConfig {
    /// Load from JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }

    /// Machine players need a search depth of at least 1
    pub fn validate(&self) -> Result<()> {
        for (name, player) in [("black", &self.black), ("white", &self.white)] {
            if player.kind == PlayerKind::Machine {
                ensure!(player.ai.depth >= 1, "{} search depth must be at least 1", name);
            }
        }
        Ok(())
    }

    /// Seed for the player in `slot` (0 = black config, 1 = white config) of
    /// game `game_index`
    pub fn player_seed(&self, game_index: usize, slot: u64) -> Option<u64> {
        self.seed
            .map(|s| s.wrapping_add(game_index as u64 * 2).wrapping_add(slot))
    }
}

// ============================================================================
// SHARED ARGUMENTS
// ============================================================================

/// Options shared by `play` and `match`
#[derive(Args, Debug)]
pub struct GameArgs {
    /// Match configuration JSON file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Player kind for black
    #[arg(long, value_enum)]
    pub black: Option<PlayerKind>,

    /// Player kind for white
    #[arg(long, value_enum)]
    pub white: Option<PlayerKind>,

    /// Search depth for every machine player
    #[arg(long)]
    pub depth: Option<u32>,

    /// Move cap before a game is drawn
    #[arg(long)]
    pub max_moves: Option<usize>,

    /// Side making the first move
    #[arg(long)]
    pub opener: Option<Side>,
}

impl GameArgs {
    /// Config file (or defaults) with command-line values applied on top
    pub fn resolve(&self, seed: Option<u64>) -> Result<MatchConfig> {
        let mut config = match &self.config {
            Some(path) => MatchConfig::load(path)?,
            None => MatchConfig::default(),
        };

        if let Some(kind) = self.black {
            config.black.kind = kind;
        }
        if let Some(kind) = self.white {
            config.white.kind = kind;
        }
        if let Some(depth) = self.depth {
            config.black.ai.depth = depth;
            config.white.ai.depth = depth;
        }
        if let Some(max_moves) = self.max_moves {
            config.rules.max_moves = max_moves;
        }
        if let Some(opener) = self.opener {
            config.rules.opener = opener;
        }
        if seed.is_some() {
            config.seed = seed;
        }

        config.validate()?;
        Ok(config)
    }
}
