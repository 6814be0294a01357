//! Network Core - Game engine and AI
//!
//! This crate provides the core game logic for Network:
//! - Board geometry (8x8 grid, eight line-of-sight directions)
//! - Board state, move legality and chip bookkeeping
//! - Path enumeration and network detection
//! - Position evaluation
//! - Alpha-beta AI and the player adapter around it
//! - A referee that plays complete games

pub mod board;
pub mod error;
pub mod game;
pub mod network;
pub mod eval;
pub mod ai;
pub mod config;
pub mod player;
pub mod referee;

// Re-exports for convenient access
pub use board::{Direction, Square, BOARD_SIZE, DIRECTIONS, MAX_CHIPS, NETWORK_LENGTH};
pub use error::ParseError;
pub use game::{AppliedMove, BoardState, Chip, GameResult, Move, Side};
pub use network::{count_networks, find_network, Path};
pub use eval::{evaluate, Heuristics, WIN_VALUE};
pub use ai::{AlphaBetaAI, SearchStats};
pub use config::AiConfig;
pub use player::{MachinePlayer, Player, RandomPlayer};
pub use referee::{play_game, GameEnd, GameRecord, GameRules, PlayedMove};
