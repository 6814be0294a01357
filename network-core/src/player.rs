//! Players as seen by a game harness
//!
//! Each player keeps its own copy of the board. The harness tells it about
//! the opponent's moves through `opponent_move` and asks for its own through
//! `choose_move`.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use crate::ai::{AlphaBetaAI, SearchStats};
use crate::config::DEFAULT_DEPTH;
use crate::eval::Heuristics;
use crate::game::{BoardState, Move, Side};

/// Turn-taking contract between a player and the harness driving it
pub trait Player {
    /// Color this player moves for
    fn side(&self) -> Side;

    /// The player's view of the board
    fn board(&self) -> &BoardState;

    /// Pick a move, record it on the internal board and return it.
    /// `None` only when no legal move exists.
    fn choose_move(&mut self) -> Option<Move>;

    /// Record `mv` as this player's own move if legal; the board is
    /// untouched otherwise
    fn force_move(&mut self, mv: Move) -> bool;

    /// Record `mv` as the opponent's move if legal; the board is untouched
    /// otherwise
    fn opponent_move(&mut self, mv: Move) -> bool;
}

fn apply_if_valid(board: &mut BoardState, side: Side, mv: Move) -> bool {
    let valid = board.is_valid_move(side, mv);
    if valid {
        board.do_move(side, mv);
    }
    valid
}

// ============================================================================
// MACHINE PLAYER
// ============================================================================

/// Search-backed player
#[derive(Debug)]
pub struct MachinePlayer<R = ChaCha8Rng> {
    side: Side,
    board: BoardState,
    ai: AlphaBetaAI<R>,
}

impl MachinePlayer<ChaCha8Rng> {
    /// Machine player searching `DEFAULT_DEPTH` plies
    pub fn new(side: Side) -> Self {
        Self::with_depth(side, DEFAULT_DEPTH)
    }

    pub fn with_depth(side: Side, depth: u32) -> Self {
        Self::with_ai(side, AlphaBetaAI::new(depth, Heuristics::default()))
    }
}

impl<R: Rng> MachinePlayer<R> {
    pub fn with_ai(side: Side, ai: AlphaBetaAI<R>) -> Self {
        Self {
            side,
            board: BoardState::new(),
            ai,
        }
    }

    /// `choose_move` that also reports the search counters
    pub fn choose_move_with_stats(&mut self) -> (Option<Move>, SearchStats) {
        let (mv, stats) = self.ai.search_with_stats(&mut self.board, self.side);
        if let Some(mv) = mv {
            debug_assert!(self.board.is_valid_move(self.side, mv), "search chose illegal {}", mv);
            self.board.do_move(self.side, mv);
        }
        (mv, stats)
    }
}

impl<R: Rng> Player for MachinePlayer<R> {
    fn side(&self) -> Side {
        self.side
    }

    fn board(&self) -> &BoardState {
        &self.board
    }

    fn choose_move(&mut self) -> Option<Move> {
        self.choose_move_with_stats().0
    }

    fn force_move(&mut self, mv: Move) -> bool {
        apply_if_valid(&mut self.board, self.side, mv)
    }

    fn opponent_move(&mut self, mv: Move) -> bool {
        apply_if_valid(&mut self.board, self.side.opponent(), mv)
    }
}

// ============================================================================
// RANDOM PLAYER
// ============================================================================

/// Plays a uniformly random legal move. Baseline opponent for matches.
#[derive(Debug)]
pub struct RandomPlayer {
    side: Side,
    board: BoardState,
    rng: ChaCha8Rng,
}

impl RandomPlayer {
    pub fn new(side: Side, seed: u64) -> Self {
        Self {
            side,
            board: BoardState::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

impl Player for RandomPlayer {
    fn side(&self) -> Side {
        self.side
    }

    fn board(&self) -> &BoardState {
        &self.board
    }

    fn choose_move(&mut self) -> Option<Move> {
        let moves = self.board.valid_moves(self.side);
        let mv = *moves.choose(&mut self.rng)?;
        self.board.do_move(self.side, mv);
        Some(mv)
    }

    fn force_move(&mut self, mv: Move) -> bool {
        apply_if_valid(&mut self.board, self.side, mv)
    }

    fn opponent_move(&mut self, mv: Move) -> bool {
        apply_if_valid(&mut self.board, self.side.opponent(), mv)
    }
}
