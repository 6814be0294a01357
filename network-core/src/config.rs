//! AI configuration

use std::path::Path;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::ai::AlphaBetaAI;
use crate::eval::Heuristics;
use crate::game::Side;
use crate::player::MachinePlayer;

/// Search depth used when none is configured
pub const DEFAULT_DEPTH: u32 = 3;

/// AI configuration for a machine player
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Search depth in plies, at least 1
    pub depth: u32,
    /// Heuristics for evaluation
    pub heuristics: Heuristics,
    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            depth: DEFAULT_DEPTH,
            heuristics: Heuristics::default(),
            seed: None,
        }
    }
}

impl AiConfig {
    /// Create config for alpha-beta at given depth
    pub fn alpha_beta(depth: u32) -> Self {
        Self {
            depth,
            ..Default::default()
        }
    }

    /// Set search depth
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    /// Set custom heuristics
    pub fn with_heuristics(mut self, heuristics: Heuristics) -> Self {
        self.heuristics = heuristics;
        self
    }

    /// Set random seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Build the search engine this config describes
    pub fn build_ai(&self) -> AlphaBetaAI {
        let rng = match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        AlphaBetaAI::with_rng(self.depth, self.heuristics.clone(), rng)
    }

    /// Build a machine player for `side` on an empty board
    pub fn build_player(&self, side: Side) -> MachinePlayer {
        MachinePlayer::with_ai(side, self.build_ai())
    }

    /// Load from JSON file. A depth of 0 is rejected.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse from JSON text. A depth of 0 is rejected.
    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        anyhow::ensure!(config.depth >= 1, "search depth must be at least 1");
        Ok(config)
    }
}
